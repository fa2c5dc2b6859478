//! `ironorchestra` command line entry point.

use anyhow::Result;
use clap::Parser;
use ironorchestra::config::{ConvertConfig, DEFAULT_OUTPUT, INPUT_ENV};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ironorchestra")]
#[command(about = "Convert FIX Orchestra field definitions into OpenAPI property schemas")]
#[command(version)]
#[command(after_help = format!("The input repository is read from ${INPUT_ENV}, or OrchestraFIXLatest.xml in the current directory."))]
struct Cli {
    /// Output YAML file
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = ConvertConfig {
        output: cli.output,
        ..ConvertConfig::from_env()
    };

    let report = ironorchestra::convert(&config)?;
    tracing::info!(
        "done: {} fields ({} enumerations), {} warnings",
        report.fields,
        report.enums,
        report.warnings.len()
    );

    Ok(())
}
