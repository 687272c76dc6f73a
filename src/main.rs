// Entry point and high-level flow.
//
// One linear pass over the catalog export:
// - load the CSV and print a missing-values report,
// - run the cleaning steps,
// - write the cleaned CSV plus a text and JSON summary of what changed.
mod clean;
mod config;
mod error;
mod loader;
mod output;
mod types;
mod util;

use anyhow::Result;
use clap::Parser;
use config::CleanConfig;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use types::{CleaningSummary, Table};

/// Clean the catalog titles export.
///
/// Runs with no arguments against the fixed file names in the working
/// directory; the flags only exist to point it somewhere else.
#[derive(Parser, Debug)]
#[command(name = "catalog_clean", version, about)]
struct Cli {
    /// Input CSV
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Cleaned CSV
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Text summary; a `.json` twin is written next to it
    #[arg(short, long)]
    summary: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> CleanConfig {
        let mut cfg = CleanConfig::default();
        if let Some(p) = self.input {
            cfg.input = p;
        }
        if let Some(p) = self.output {
            cfg.output = p;
        }
        if let Some(p) = self.summary {
            cfg.summary = p;
        }
        cfg
    }
}

/// Load the CSV and print the basic missing-values report.
fn handle_load(cfg: &CleanConfig) -> Result<Table> {
    let table = loader::load_table(&cfg.input)?;
    let (rows, cols) = table.shape();
    println!(
        "Loaded dataset... ({} rows, {} columns)\n",
        util::format_int(rows),
        util::format_int(cols)
    );
    println!("Missing values per column:\n");
    let counts = output::missing_counts(&table);
    output::preview_table_rows(&counts, counts.len());
    Ok(table)
}

/// Write the cleaned table and both summary files, then preview a few rows.
fn handle_export(cfg: &CleanConfig, table: &Table, summary: &CleaningSummary) -> Result<()> {
    output::write_outputs(cfg, table, summary)?;

    println!("Cleaned sample:\n");
    output::preview_table_rows(&output::preview_rows(table, cfg.preview_rows), cfg.preview_rows);
    println!(
        "Final rows & columns: ({}, {})",
        util::format_int(summary.final_rows),
        util::format_int(summary.final_cols)
    );
    println!("Output file: {}", cfg.output.display());
    println!("Summary file: {}", cfg.summary.display());
    Ok(())
}

fn run(cfg: &CleanConfig) -> Result<()> {
    let table = handle_load(cfg)?;
    let (original_rows, original_cols) = table.shape();

    let (cleaned, actions) = clean::run_pipeline(table, cfg);
    let (final_rows, final_cols) = cleaned.shape();
    info!(final_rows, final_cols, "cleaning finished");

    let summary = CleaningSummary {
        original_rows,
        original_cols,
        final_rows,
        final_cols,
        actions,
    };
    handle_export(cfg, &cleaned, &summary)
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let cfg = Cli::parse().into_config();
    run(&cfg)
}
