//! ExamArchive catalog generator
//!
//! Builds `papers.json`, the catalog the ExamArchive site browses, from the
//! authored subject maps and the archive of scanned question-paper PDFs.

mod config;
mod constants;
mod error;
mod generator;
mod loader;
mod matcher;
mod models;
mod scanner;

use clap::Parser;
use config::{Config, Overrides};
use generator::CatalogSummary;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "examarchive-catalog")]
#[command(about = "Generate the ExamArchive papers.json catalog", long_about = None)]
#[command(version)]
struct Cli {
    /// Site root; relative paths resolve against it
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Config file (default: <root>/archive.toml, if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the fyug/ and cbcs/ map folders
    #[arg(long)]
    maps: Option<PathBuf>,

    /// Root of the PDF archive
    #[arg(long)]
    papers: Option<PathBuf>,

    /// Catalog file to write
    #[arg(long)]
    output: Option<PathBuf>,

    /// Match and report only; do not write the catalog
    #[arg(long)]
    check: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Log only warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Entry point for the catalog generator.
///
/// 1. Loads every map file under `maps/{fyug,cbcs}/`
/// 2. Scans the PDF archive
/// 3. Matches file names to paper codes and groups variants by year
/// 4. Replaces the catalog in one write, only if every step succeeded
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let result = run(cli).await;
    if let Err(ref e) = result {
        eprintln!("Error: {e}");
    }
    ExitCode::from(exit_status(&result))
}

/// Process exit status for a finished run: 0 on success, 1 on any error
fn exit_status<T>(result: &error::Result<T>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

async fn run(cli: Cli) -> error::Result<CatalogSummary> {
    let overrides = Overrides {
        config: cli.config,
        maps_dir: cli.maps,
        papers_dir: cli.papers,
        output: cli.output,
    };
    let config = Config::load(&cli.root, overrides)?;

    println!("Site root: {}", config.site_root.display());
    println!("Maps: {}", config.maps_dir.display());
    println!("Papers: {}", config.papers_dir.display());

    let summary = generator::generate_catalog(&config, !cli.check).await?;
    for line in report_lines(&summary, &config.output) {
        println!("{line}");
    }

    Ok(summary)
}

/// Closing report printed after a successful run
fn report_lines(summary: &CatalogSummary, output: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    let matched = summary.pdfs_found - summary.pdfs_without_year - summary.unmatched_pdfs.len();
    lines.push(format!("Matched {} of {} PDFs", matched, summary.pdfs_found));
    if summary.pdfs_without_year > 0 {
        lines.push(format!(
            "Skipped {} PDFs without a year",
            summary.pdfs_without_year
        ));
    }
    if !summary.unmatched_pdfs.is_empty() {
        lines.push(format!(
            "{} PDFs matched no paper code (run with --verbose to list them)",
            summary.unmatched_pdfs.len()
        ));
    }
    if !summary.unmatched_codes.is_empty() {
        lines.push(format!(
            "{} of {} declared papers have no PDF yet",
            summary.unmatched_codes.len(),
            summary.map_entries
        ));
    }

    if summary.written {
        lines.push(format!("\n✓ Generated {} records", summary.records));
        lines.push(format!("Catalog written to {}", output.display()));
    } else {
        lines.push(format!(
            "\n✓ Check passed: {} records would be generated",
            summary.records
        ));
    }

    lines
}
