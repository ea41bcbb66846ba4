use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::cli::report::{write_report, RunSummary};
use crate::cli::{LineListArgs, OutputFormat, RegistryArgs};
use crate::config::Config;
use crate::core::types::Resolution;
use crate::parsing::biosample::PositionalRecordParser;
use crate::parsing::linelist;
use crate::registry::client::EntrezClient;
use crate::registry::Resolver;

#[derive(Args, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub line_list: LineListArgs,

    #[command(flatten)]
    pub registry: RegistryArgs,
}

impl ResolveArgs {
    pub fn apply(&self, config: &mut Config) {
        self.line_list.apply(config);
        self.registry.apply(config);
    }
}

/// Execute resolve subcommand
///
/// # Errors
///
/// Returns an error if the configuration is incomplete, the line list cannot
/// be loaded, or any identifier fails to resolve.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ResolveArgs, format: OutputFormat, mut config: Config) -> anyhow::Result<()> {
    args.apply(&mut config);
    config.validate()?;

    let (identifiers, resolutions) = resolve_line_list(&config)?;

    let summary = RunSummary {
        identifiers: Some(identifiers),
        accessions: Some(resolutions.len()),
        ..RunSummary::default()
    };
    write_report(
        &mut std::io::stdout().lock(),
        format,
        Some(&resolutions),
        None,
        &summary,
    )?;
    summary.emit();
    Ok(())
}

/// Load the line list and resolve every kept identifier
///
/// Returns the number of identifiers kept and their resolutions.
pub(crate) fn resolve_line_list(config: &Config) -> anyhow::Result<(usize, Vec<Resolution>)> {
    let email = config.require_email()?;
    let path = config.require_line_list()?;

    let identifiers = linelist::load_identifiers(path, &config.line_list)
        .with_context(|| format!("Failed to load line list {}", path.display()))?;
    info!(
        "Loaded {} identifiers from {}",
        identifiers.len(),
        path.display()
    );
    if identifiers.is_empty() {
        eprintln!(
            "Warning: no '{}' values start with '{}'; nothing to resolve.",
            config.line_list.column, config.line_list.prefix
        );
    }

    let client = EntrezClient::new(&config.registry, email)?;
    let resolver = Resolver::new(client, PositionalRecordParser::biosample_v1());
    let resolutions = resolver
        .resolve_all(&identifiers)
        .context("Failed to resolve line-list identifiers")?;

    Ok((identifiers.len(), resolutions))
}
