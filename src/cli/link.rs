use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::cli::report::{write_report, RunSummary};
use crate::cli::resolve::resolve_line_list;
use crate::cli::{DistanceArgs, LineListArgs, OutputFormat, RegistryArgs};
use crate::config::Config;
use crate::core::types::Accession;
use crate::matching::Reconciler;
use crate::parsing::{distance, LoadError};

#[derive(Args, Debug)]
pub struct LinkArgs {
    #[command(flatten)]
    pub line_list: LineListArgs,

    #[command(flatten)]
    pub registry: RegistryArgs,

    #[command(flatten)]
    pub distances: DistanceArgs,
}

impl LinkArgs {
    pub fn apply(&self, config: &mut Config) {
        self.line_list.apply(config);
        self.registry.apply(config);
        self.distances.apply(config);
    }
}

/// Execute link subcommand
///
/// # Errors
///
/// Returns an error if the configuration is incomplete, either input cannot
/// be loaded, or any identifier fails to resolve.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: LinkArgs, format: OutputFormat, mut config: Config) -> anyhow::Result<()> {
    args.apply(&mut config);
    config.validate()?;

    // Catch a mistyped table path before spending requests on the registry
    let table_path = config.require_distance_table()?;
    if !table_path.is_file() {
        return Err(LoadError::FileNotFound(table_path.to_path_buf()))
            .context("Failed to load distance table");
    }

    let (identifiers, resolutions) = resolve_line_list(&config)?;

    let table = distance::load_distance_table(table_path, &config.distance_table)
        .with_context(|| format!("Failed to load distance table {}", table_path.display()))?;
    info!(
        "Loaded {} distance rows from {}",
        table.len(),
        table_path.display()
    );

    let accessions: Vec<Accession> = resolutions.iter().map(|r| r.accession.clone()).collect();
    let reconciler = Reconciler::new(&accessions, config.matching.mode);
    let links = reconciler.reconcile(&table);

    let summary = RunSummary {
        identifiers: Some(identifiers),
        accessions: Some(resolutions.len()),
        distance_rows: Some(table.len()),
        skipped_rows: Some(table.skipped_rows),
        links: Some(links.len()),
        match_mode: Some(reconciler.mode()),
    };
    write_report(
        &mut std::io::stdout().lock(),
        format,
        Some(&resolutions),
        Some(&links),
        &summary,
    )?;
    summary.emit();
    Ok(())
}
