use clap::{Parser, Subcommand};
use datadock::{load_node_config, DataDockError, DataDockNode};
use log::{error, info, warn};
use serde_json::{Map, Value};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the node configuration file
    #[arg(short, long, default_value = "config/node_config.json")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate one document, or every document in the store
    Validate {
        /// Document to validate (validates the whole store when omitted)
        #[arg(long, short)]
        file: Option<String>,
    },
    /// List all stored documents with their metadata
    List {},
    /// Show aggregate statistics for the store
    Stats {},
    /// Merge every document into a single array document
    Merge {
        /// Name of the output document
        #[arg(long, short, required = true)]
        output: String,
    },
    /// Create a timestamped backup of a document
    Backup {
        /// Document to back up
        #[arg(required = true)]
        name: String,
    },
    /// Apply a transform operation to a document
    Transform {
        /// Input document name
        #[arg(short, long, required = true)]
        input: String,

        /// Output document name
        #[arg(short, long, required = true)]
        output: String,

        /// Operation to apply (filter, map, or sort)
        #[arg(long, required = true)]
        operation: String,

        /// Operation parameters in JSON format
        #[arg(short, long, default_value = "{}")]
        parameters: String,
    },
    /// Infer and print the schema of a document
    Schema {
        /// Document to inspect
        #[arg(long, short, required = true)]
        file: String,
    },
    /// Search all documents for a query string
    Search {
        /// Text to search for
        #[arg(short, long, required = true)]
        query: String,

        /// Restrict matching to one top-level field
        #[arg(long)]
        field: Option<String>,
    },
}

fn handle_validate(
    file: Option<String>,
    node: &DataDockNode,
) -> Result<(), Box<dyn std::error::Error>> {
    match file {
        Some(name) => match node.get_file(&name) {
            Ok(value) => {
                let outcome = node.validate(&value, None);
                info!("✓ {} is valid {}", name, outcome.data_type);
                Ok(())
            }
            Err(DataDockError::InvalidInput(msg)) => {
                error!("✗ {} is invalid: {}", name, msg);
                Ok(())
            }
            Err(e) => Err(e.into()),
        },
        None => {
            let report = node.validate_store()?;
            info!(
                "Validation complete: {}/{} files valid",
                report.valid_files, report.total_files
            );
            for name in &report.errors {
                warn!("  ✗ invalid: {}", name);
            }
            Ok(())
        }
    }
}

fn handle_list(node: &DataDockNode) -> Result<(), Box<dyn std::error::Error>> {
    let files = node.list_files()?;
    info!("Found {} JSON files:", files.len());
    for meta in files {
        info!(
            "  - {} ({} KB, modified {})",
            meta.filename,
            meta.size_kb,
            meta.modified.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    Ok(())
}

fn handle_stats(node: &DataDockNode) -> Result<(), Box<dyn std::error::Error>> {
    let stats = node.stats()?;
    info!("Store statistics:");
    info!("  Total files: {}", stats.total_files);
    info!(
        "  Total size: {} bytes ({} KB / {} MB)",
        stats.total_size_bytes, stats.total_size_kb, stats.total_size_mb
    );
    info!("  Categories:");
    for (category, count) in &stats.file_categories {
        info!("    {}: {}", category, count);
    }
    Ok(())
}

fn handle_merge(output: String, node: &DataDockNode) -> Result<(), Box<dyn std::error::Error>> {
    let count = node.merge(&output)?;
    info!("Merged {} files into {}", count, output);
    Ok(())
}

fn handle_backup(name: String, node: &DataDockNode) -> Result<(), Box<dyn std::error::Error>> {
    let backup_name = node.backup(&name)?;
    info!("Backup created: {}", backup_name);
    Ok(())
}

fn handle_transform(
    input: String,
    output: String,
    operation: String,
    parameters: String,
    node: &DataDockNode,
) -> Result<(), Box<dyn std::error::Error>> {
    let parameters: Map<String, Value> = match serde_json::from_str(&parameters)? {
        Value::Object(map) => map,
        _ => return Err("parameters must be a JSON object".into()),
    };
    node.transform_file(&input, &output, &operation, &parameters)?;
    info!("Transformed {} -> {} with operation {}", input, output, operation);
    Ok(())
}

fn handle_schema(file: String, node: &DataDockNode) -> Result<(), Box<dyn std::error::Error>> {
    let schema = node.infer_file_schema(&file)?;
    info!("Schema for {}:", file);
    info!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn handle_search(
    query: String,
    field: Option<String>,
    node: &DataDockNode,
) -> Result<(), Box<dyn std::error::Error>> {
    let results = node.search(&query, field.as_deref())?;
    info!("Found {} matches for '{}'", results.len(), query);
    for result in &results {
        info!("  - {}: {}", result.file, result.data);
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    // Load node configuration
    info!("Loading config from: {}", cli.config);
    let config = load_node_config(Some(&cli.config))?;

    // Initialize node
    let node = DataDockNode::new(config)?;

    // Process command
    match cli.command {
        Commands::Validate { file } => handle_validate(file, &node)?,
        Commands::List {} => handle_list(&node)?,
        Commands::Stats {} => handle_stats(&node)?,
        Commands::Merge { output } => handle_merge(output, &node)?,
        Commands::Backup { name } => handle_backup(name, &node)?,
        Commands::Transform {
            input,
            output,
            operation,
            parameters,
        } => handle_transform(input, output, operation, parameters, &node)?,
        Commands::Schema { file } => handle_schema(file, &node)?,
        Commands::Search { query, field } => handle_search(query, field, &node)?,
    }

    Ok(())
}
