use crate::datadock_node::config::NodeConfig;
use crate::error::{DataDockError, DataDockResult};
use crate::schema::{infer_schema, TypeTag};
use crate::search::{search, SearchMatch};
use crate::store::{DocStore, FileMeta, StoreStats, ValidationReport};
use crate::transform::transform;
use log::{info, warn};
use serde::Serialize;
use serde_json::{Map, Value};

/// Result of validating a single JSON payload.
///
/// Validation succeeds for any payload that parsed as JSON; the outcome
/// reports the payload's type and an inferred schema. A `schema_name` is
/// echoed back but not enforced.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub data_type: String,
    pub schema: Option<String>,
    pub inferred_schema: Value,
}

/// A node that manages a directory of JSON documents.
///
/// Wraps a [`DocStore`] and exposes the operations shared by the HTTP
/// server and the batch CLI: document CRUD, schema inference, transforms,
/// search, merge, backup, and store-wide validation.
pub struct DataDockNode {
    store: DocStore,
    config: NodeConfig,
}

impl DataDockNode {
    /// Create a node, opening (and if needed creating) its data directory.
    pub fn new(config: NodeConfig) -> DataDockResult<Self> {
        let store = DocStore::new(config.data_dir.clone())?;
        info!("Node initialized with data directory {}", store.root().display());
        Ok(Self { store, config })
    }

    /// The node's configuration.
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Direct access to the underlying document store.
    pub fn store(&self) -> &DocStore {
        &self.store
    }

    /// List stored documents with their metadata.
    pub fn list_files(&self) -> DataDockResult<Vec<FileMeta>> {
        self.store.list()
    }

    /// Read a document's content.
    pub fn get_file(&self, name: &str) -> DataDockResult<Value> {
        self.store.read(name)
    }

    /// Create a new document; fails if the name is taken.
    pub fn create_file(&self, name: &str, data: &Value) -> DataDockResult<()> {
        self.store.create(name, data)?;
        info!("Created file {}", name);
        Ok(())
    }

    /// Replace an existing document's content.
    pub fn update_file(&self, name: &str, data: &Value) -> DataDockResult<()> {
        self.store.update(name, data)?;
        info!("Updated file {}", name);
        Ok(())
    }

    /// Delete a document.
    pub fn delete_file(&self, name: &str) -> DataDockResult<()> {
        self.store.delete(name)?;
        info!("Deleted file {}", name);
        Ok(())
    }

    /// Store raw uploaded bytes as a document, overwriting any existing
    /// document with the same name. Returns the upload size in bytes.
    ///
    /// # Errors
    ///
    /// [`DataDockError::InvalidInput`] when the filename does not end in
    /// `.json` or the bytes are not valid JSON.
    pub fn upload_file(&self, name: &str, bytes: &[u8]) -> DataDockResult<usize> {
        if !name.ends_with(".json") {
            return Err(DataDockError::InvalidInput(
                "Only JSON files are allowed".to_string(),
            ));
        }
        let data: Value = serde_json::from_slice(bytes)
            .map_err(|_| DataDockError::InvalidInput("Invalid JSON file".to_string()))?;
        self.store.write(name, &data)?;
        info!("Uploaded file {} ({} bytes)", name, bytes.len());
        Ok(bytes.len())
    }

    /// Infer the schema of a stored document.
    pub fn infer_file_schema(&self, name: &str) -> DataDockResult<Value> {
        Ok(infer_schema(&self.store.read(name)?))
    }

    /// Validate a JSON payload and describe its shape.
    pub fn validate(&self, data: &Value, schema_name: Option<&str>) -> ValidationOutcome {
        ValidationOutcome {
            valid: true,
            data_type: TypeTag::of(data).as_str().to_string(),
            schema: schema_name.map(String::from),
            inferred_schema: infer_schema(data),
        }
    }

    /// Apply a transform operation to a stored document and write the
    /// result to the output document.
    ///
    /// The output is only written when the whole transform succeeds; a
    /// failed transform leaves the store untouched.
    pub fn transform_file(
        &self,
        input: &str,
        output: &str,
        operation: &str,
        parameters: &Map<String, Value>,
    ) -> DataDockResult<()> {
        let source = self.store.read(input)?;
        let transformed = transform(&source, operation, parameters)?;
        self.store.write(output, &transformed)?;
        info!("Transformed {} -> {} with operation {}", input, output, operation);
        Ok(())
    }

    /// Search all stored documents for a query string.
    ///
    /// Documents that fail to read are skipped with a warning so one
    /// corrupt file cannot break the search.
    pub fn search(&self, query: &str, field: Option<&str>) -> DataDockResult<Vec<SearchMatch>> {
        let mut documents = Vec::new();
        for meta in self.store.list()? {
            match self.store.read(&meta.filename) {
                Ok(value) => documents.push((meta.filename, value)),
                Err(e) => warn!("Skipping {} during search: {}", meta.filename, e),
            }
        }
        Ok(search(&documents, query, field))
    }

    /// Aggregate statistics for the store.
    pub fn stats(&self) -> DataDockResult<StoreStats> {
        self.store.stats()
    }

    /// Merge all documents into one array document. Returns the number
    /// of documents merged.
    pub fn merge(&self, output: &str) -> DataDockResult<usize> {
        let count = self.store.merge(output)?;
        info!("Merged {} files into {}", count, output);
        Ok(count)
    }

    /// Create a timestamped backup of a document. Returns the backup
    /// filename.
    pub fn backup(&self, name: &str) -> DataDockResult<String> {
        let backup_name = self.store.backup(name)?;
        info!("Created backup {}", backup_name);
        Ok(backup_name)
    }

    /// Parse every stored document and report the invalid ones.
    pub fn validate_store(&self) -> DataDockResult<ValidationReport> {
        self.store.validate_all()
    }
}
