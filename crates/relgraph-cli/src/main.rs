//! relgraph command-line driver
//!
//! Resolves a metadata snapshot against an optional configuration overlay
//! and prints the resulting entities, relations and diagnostics.

mod formatter;
mod loader;

use clap::Parser;
use formatter::OutputFormat;
use loader::CliError;
use relgraph_core::Resolver;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// relgraph command-line driver
#[derive(Parser, Debug)]
#[command(name = "relgraph")]
#[command(version, about = "Resolve relational metadata into an entity/relation graph")]
pub struct Args {
    /// Metadata snapshot (JSON)
    #[arg(short, long)]
    pub metadata: PathBuf,

    /// Configuration overlay (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", value_enum)]
    pub format: OutputFormat,

    /// Run the account-entity detection convention
    #[arg(long)]
    pub detect_account: bool,

    /// Log every pass at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("relgraph={0},relgraph_core={0}", level)));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    match run(args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

/// Resolve and print. Returns whether the model is free of errors.
fn run(args: Args) -> Result<bool, CliError> {
    let metadata = loader::load_metadata(&args.metadata)?;
    let mut config = loader::load_configuration(args.config.as_deref())?;
    if args.detect_account {
        config.conventions.account_detection = true;
    }

    let resolution = Resolver::new(config)?.resolve(&metadata)?;
    let formatter = formatter::create_formatter(args.format);

    println!("{}", formatter.format_resolution(&resolution)?);
    if args.format == OutputFormat::Table {
        eprintln!("{}", formatter.format_report(&resolution.report));
    }

    info!(success = resolution.is_success(), "Done");
    Ok(resolution.is_success())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn snapshot() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"{
                "tables": [
                    {
                        "name": "PARENT_TABLE",
                        "columns": [{ "name": "id", "jdbc_type": "INTEGER", "nullable": false }],
                        "primary_keys": ["id"]
                    },
                    {
                        "name": "CHILD_TABLE",
                        "columns": [
                            { "name": "id", "jdbc_type": "INTEGER", "nullable": false },
                            { "name": "version", "jdbc_type": "INTEGER" }
                        ],
                        "primary_keys": ["id"]
                    }
                ]
            }"#,
        )
        .unwrap();
        file
    }

    fn args(metadata: &NamedTempFile, config: Option<&NamedTempFile>) -> Args {
        Args {
            metadata: metadata.path().to_path_buf(),
            config: config.map(|c| c.path().to_path_buf()),
            format: OutputFormat::Json,
            detect_account: false,
            verbose: false,
        }
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["relgraph", "--metadata", "db.json", "--format", "json"]);
        assert_eq!(args.metadata, PathBuf::from("db.json"));
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_run_success() {
        let metadata = snapshot();
        assert!(run(args(&metadata, None)).unwrap());
    }

    #[test]
    fn test_run_reports_consistency_errors() {
        let metadata = snapshot();
        let mut config = NamedTempFile::new().unwrap();
        config
            .write_all(
                br#"{
                    "entities": [{
                        "table_name": "CHILD_TABLE",
                        "inheritance": { "parent_entity": "ParentTable", "strategy": "JOINED" }
                    }]
                }"#,
            )
            .unwrap();
        assert!(!run(args(&metadata, Some(&config))).unwrap());
    }

    #[test]
    fn test_run_missing_metadata() {
        let err = run(Args {
            metadata: PathBuf::from("/nonexistent/metadata.json"),
            config: None,
            format: OutputFormat::Table,
            detect_account: false,
            verbose: false,
        })
        .unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }
}
