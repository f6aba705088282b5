//! imrec - bibliographic document reconciliation
//!
//! Reads a merged multi-provider document export, selects a canonical DOI
//! per record, flags suspicious records, classifies reviews and writes the
//! reconciled table as CSV.

mod config;

use std::path::PathBuf;

use clap::Parser;
use imrec_core::{run_document_pipeline, DocumentInputs};
use imrec_io::{read_csv, write_csv};
use tracing_subscriber::EnvFilter;

use config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "imrec")]
#[command(about = "Reconcile bibliographic document records from several providers")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// Output CSV (defaults to outputs.dir/outputs.file_name)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Reference CSV with curated flags (overrides files.document_reference_csv)
    #[arg(short, long)]
    reference: Option<PathBuf>,

    /// Log filter, e.g. "info" or "imrec_core=debug"
    #[arg(long)]
    log_level: Option<String>,
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let config = AppConfig::load(&cli.config)?;
    config.document.validate()?;

    let document = read_csv(&config.document_path()?, &config.io)?;
    let mut inputs = DocumentInputs::new(document);
    if let Some(path) = cli.reference.clone().or_else(|| config.reference_path()) {
        inputs = inputs.with_reference(read_csv(&path, &config.io)?);
    }

    let output = run_document_pipeline(inputs, &config.document)?;

    let out_path = cli.out.unwrap_or_else(|| config.output_path());
    write_csv(&output, &out_path, &config.io)?;
    tracing::info!("Done: {}", out_path.display());
    Ok(())
}
