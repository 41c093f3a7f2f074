//! Filesystem-backed store for a flat directory of JSON documents.
//!
//! Every document is a top-level `.json` file inside the store root.
//! Writes go through a temporary file in the same directory and are
//! renamed into place, so readers never observe a half-written document.

use crate::error::{DataDockError, DataDockResult};
use chrono::{DateTime, Utc};
use log::warn;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const BACKUP_DIR: &str = "backups";

/// Metadata for one stored document.
#[derive(Debug, Clone, Serialize)]
pub struct FileMeta {
    pub filename: String,
    pub size_bytes: u64,
    pub size_kb: f64,
    pub modified: DateTime<Utc>,
}

/// Aggregate statistics over the whole store.
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub total_files: usize,
    pub total_size_bytes: u64,
    pub total_size_kb: f64,
    pub total_size_mb: f64,
    /// Document counts grouped by filename prefix before the first `_`;
    /// filenames without an underscore count as `other`.
    pub file_categories: BTreeMap<String, u64>,
}

/// Outcome of validating every document in the store.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub total_files: usize,
    pub valid_files: usize,
    pub invalid_files: usize,
    /// Filenames that failed to parse
    pub errors: Vec<String>,
}

/// A directory of JSON documents with atomic writes.
pub struct DocStore {
    root: PathBuf,
}

impl DocStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> DataDockResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The directory this store reads and writes.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a document with this name currently exists.
    pub fn exists(&self, name: &str) -> bool {
        validate_name(name).is_ok() && self.root.join(name).is_file()
    }

    /// Read and parse a document.
    ///
    /// # Errors
    ///
    /// [`DataDockError::NotFound`] when no such document exists and
    /// [`DataDockError::InvalidInput`] when the file is not valid JSON.
    pub fn read(&self, name: &str) -> DataDockResult<Value> {
        let path = self.document_path(name)?;
        if !path.is_file() {
            return Err(DataDockError::NotFound(name.to_string()));
        }
        let contents = fs::read_to_string(&path)?;
        serde_json::from_str(&contents).map_err(|e| {
            DataDockError::InvalidInput(format!("invalid JSON in {}: {}", name, e))
        })
    }

    /// Write a document, replacing any existing content.
    ///
    /// The value is serialized as pretty-printed JSON into a temporary
    /// file in the store directory, then renamed over the target path.
    pub fn write(&self, name: &str, value: &Value) -> DataDockResult<()> {
        let path = self.document_path(name)?;
        write_atomic(&self.root, &path, value)
    }

    /// Create a new document, failing if the name is already taken.
    pub fn create(&self, name: &str, value: &Value) -> DataDockResult<()> {
        let path = self.document_path(name)?;
        if path.is_file() {
            return Err(DataDockError::Conflict(name.to_string()));
        }
        write_atomic(&self.root, &path, value)
    }

    /// Replace an existing document, failing if it does not exist.
    pub fn update(&self, name: &str, value: &Value) -> DataDockResult<()> {
        let path = self.document_path(name)?;
        if !path.is_file() {
            return Err(DataDockError::NotFound(name.to_string()));
        }
        write_atomic(&self.root, &path, value)
    }

    /// Delete a document.
    pub fn delete(&self, name: &str) -> DataDockResult<()> {
        let path = self.document_path(name)?;
        if !path.is_file() {
            return Err(DataDockError::NotFound(name.to_string()));
        }
        fs::remove_file(&path)?;
        Ok(())
    }

    /// List every document in the store, sorted by filename.
    ///
    /// Only top-level regular files ending in `.json` are reported;
    /// subdirectories (including the backup directory) are ignored.
    pub fn list(&self) -> DataDockResult<Vec<FileMeta>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let filename = match path.file_name().and_then(|n| n.to_str()) {
                Some(n) => n.to_string(),
                None => continue,
            };
            let metadata = entry.metadata()?;
            let size_bytes = metadata.len();
            let modified = DateTime::<Utc>::from(metadata.modified()?);
            files.push(FileMeta {
                filename,
                size_bytes,
                size_kb: round2(size_bytes as f64 / 1024.0),
                modified,
            });
        }
        files.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(files)
    }

    /// Compute aggregate statistics for the store.
    pub fn stats(&self) -> DataDockResult<StoreStats> {
        let listing = self.list()?;
        let total_files = listing.len();
        let total_size_bytes: u64 = listing.iter().map(|meta| meta.size_bytes).sum();
        let mut file_categories = BTreeMap::new();
        for meta in &listing {
            let stem = meta.filename.strip_suffix(".json").unwrap_or(&meta.filename);
            *file_categories.entry(category_for(stem)).or_insert(0) += 1;
        }
        Ok(StoreStats {
            total_files,
            total_size_bytes,
            total_size_kb: round2(total_size_bytes as f64 / 1024.0),
            total_size_mb: round2(total_size_bytes as f64 / (1024.0 * 1024.0)),
            file_categories,
        })
    }

    /// Merge every readable document into a single array document.
    ///
    /// Array documents contribute their elements; any other document is
    /// appended as one element. The output document itself is skipped
    /// when re-merging, and unreadable documents are skipped with a
    /// warning. Returns the number of documents merged.
    pub fn merge(&self, output: &str) -> DataDockResult<usize> {
        validate_name(output)?;
        let mut merged = Vec::new();
        let mut count = 0;
        for meta in self.list()? {
            if meta.filename == output {
                continue;
            }
            match self.read(&meta.filename) {
                Ok(Value::Array(items)) => {
                    merged.extend(items);
                    count += 1;
                }
                Ok(other) => {
                    merged.push(other);
                    count += 1;
                }
                Err(e) => warn!("Skipping {} during merge: {}", meta.filename, e),
            }
        }
        self.write(output, &Value::Array(merged))?;
        Ok(count)
    }

    /// Copy a document into the backup directory under a timestamped name.
    ///
    /// Returns the backup filename, e.g. `users_backup_20260825_161530.json`.
    pub fn backup(&self, name: &str) -> DataDockResult<String> {
        let value = self.read(name)?;
        let stem = name.strip_suffix(".json").unwrap_or(name);
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        let backup_name = format!("{}_backup_{}.json", stem, timestamp);
        let backup_dir = self.root.join(BACKUP_DIR);
        fs::create_dir_all(&backup_dir)?;
        write_atomic(&backup_dir, &backup_dir.join(&backup_name), &value)?;
        Ok(backup_name)
    }

    /// Parse every document and report which ones are invalid.
    pub fn validate_all(&self) -> DataDockResult<ValidationReport> {
        let listing = self.list()?;
        let total_files = listing.len();
        let mut valid_files = 0;
        let mut errors = Vec::new();
        for meta in listing {
            match self.read(&meta.filename) {
                Ok(_) => valid_files += 1,
                Err(_) => errors.push(meta.filename),
            }
        }
        Ok(ValidationReport {
            total_files,
            valid_files,
            invalid_files: errors.len(),
            errors,
        })
    }

    fn document_path(&self, name: &str) -> DataDockResult<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }
}

/// Reject names that could escape the store or bypass the `.json` layout.
fn validate_name(name: &str) -> DataDockResult<()> {
    if name.is_empty() {
        return Err(DataDockError::InvalidInput(
            "filename must not be empty".to_string(),
        ));
    }
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(DataDockError::InvalidInput(format!(
            "filename {} must not contain path separators or '..'",
            name
        )));
    }
    if name == ".json" || !name.ends_with(".json") {
        return Err(DataDockError::InvalidInput(format!(
            "filename {} must end in .json",
            name
        )));
    }
    Ok(())
}

fn write_atomic(dir: &Path, path: &Path, value: &Value) -> DataDockResult<()> {
    let text = serde_json::to_string_pretty(value)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(text.as_bytes())?;
    tmp.persist(path).map_err(|e| DataDockError::Io(e.error))?;
    Ok(())
}

fn category_for(stem: &str) -> String {
    match stem.split_once('_') {
        Some((prefix, _)) => prefix.to_string(),
        None => "other".to_string(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
