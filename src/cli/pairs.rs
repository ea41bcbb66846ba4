use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::cli::report::{write_report, RunSummary};
use crate::cli::{DistanceArgs, OutputFormat};
use crate::config::Config;
use crate::matching::Reconciler;
use crate::parsing::{accessions, distance};

#[derive(Args, Debug)]
pub struct MatchArgs {
    /// Accession list: one per line, or a table with an `accession` column
    #[arg(short, long, required = true)]
    pub accessions: PathBuf,

    #[command(flatten)]
    pub distances: DistanceArgs,
}

/// Execute match subcommand
///
/// # Errors
///
/// Returns an error if either input cannot be loaded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: MatchArgs, format: OutputFormat, mut config: Config) -> anyhow::Result<()> {
    args.distances.apply(&mut config);
    config.validate()?;

    let known = accessions::load_accessions(&args.accessions)
        .with_context(|| format!("Failed to load accessions {}", args.accessions.display()))?;
    info!(
        "Loaded {} accessions from {}",
        known.len(),
        args.accessions.display()
    );

    let table_path = config.require_distance_table()?;
    let table = distance::load_distance_table(table_path, &config.distance_table)
        .with_context(|| format!("Failed to load distance table {}", table_path.display()))?;

    let reconciler = Reconciler::new(&known, config.matching.mode);
    let links = reconciler.reconcile(&table);

    let summary = RunSummary {
        accessions: Some(known.len()),
        distance_rows: Some(table.len()),
        skipped_rows: Some(table.skipped_rows),
        links: Some(links.len()),
        match_mode: Some(reconciler.mode()),
        ..RunSummary::default()
    };
    write_report(
        &mut std::io::stdout().lock(),
        format,
        None,
        Some(&links),
        &summary,
    )?;
    summary.emit();
    Ok(())
}
