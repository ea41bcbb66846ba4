//! Command-line interface for linelist-linker.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **link**: Resolve line-list identifiers and match them against a distance table
//! - **resolve**: Only resolve line-list identifiers to accessions
//! - **match**: Match a list of known accessions against a distance table (offline)
//! - **config**: Print the effective configuration
//!
//! ## Usage
//!
//! ```text
//! # Full run with the default text report
//! linelist-linker link --line-list cases.xlsx --distances SNP_distances.tsv \
//!     --email someone@example.org
//!
//! # Same run, settings taken from a file, CSV output
//! linelist-linker --config outbreak.toml --format csv link
//!
//! # Resolve once, then match offline against several tables
//! linelist-linker --format tsv resolve --line-list cases.xlsx > resolved.tsv
//! linelist-linker match --accessions resolved.tsv --distances SNP_distances.tsv
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use crate::matching::MatchMode;

pub mod config;
pub mod link;
pub mod pairs;
pub mod report;
pub mod resolve;

#[derive(Parser)]
#[command(name = "linelist-linker")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Link outbreak line-list samples to BioSample accessions and SNP-distance neighbours")]
#[command(
    long_about = "linelist-linker reads sample identifiers from an outbreak line list, resolves each one to a BioSample accession through NCBI E-utilities, and reports which rows of a pairwise SNP-distance table involve those samples.\n\nSettings come from built-in defaults, an optional TOML file (--config), and command-line flags, in increasing order of precedence."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve line-list identifiers and report distance-table links
    Link(link::LinkArgs),

    /// Resolve line-list identifiers to accessions
    Resolve(resolve::ResolveArgs),

    /// Match known accessions against a distance table, without network access
    #[command(name = "match")]
    Match(pairs::MatchArgs),

    /// Inspect the effective configuration
    Config(config::ConfigArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
    Csv,
}

/// Line-list overrides
#[derive(Args, Debug, Default)]
pub struct LineListArgs {
    /// Line-list file (xlsx, xls, xlsb, ods, csv, or tsv)
    #[arg(short, long)]
    pub line_list: Option<PathBuf>,

    /// Header of the identifier column [default: WGS_id]
    #[arg(long)]
    pub column: Option<String>,

    /// Keep only identifiers starting with this prefix [default: PNU]
    #[arg(long)]
    pub prefix: Option<String>,

    /// Worksheet to read [default: first sheet]
    #[arg(long)]
    pub sheet: Option<String>,
}

impl LineListArgs {
    pub fn apply(&self, config: &mut Config) {
        let target = &mut config.line_list;
        if let Some(path) = &self.line_list {
            target.path = Some(path.clone());
        }
        if let Some(column) = &self.column {
            target.column.clone_from(column);
        }
        if let Some(prefix) = &self.prefix {
            target.prefix.clone_from(prefix);
        }
        if let Some(sheet) = &self.sheet {
            target.sheet = Some(sheet.clone());
        }
    }
}

/// Registry overrides
#[derive(Args, Debug, Default)]
pub struct RegistryArgs {
    /// Contact email sent with every registry request
    #[arg(long, env = "LINELIST_LINKER_EMAIL")]
    pub email: Option<String>,

    /// E-utilities base URL
    #[arg(long)]
    pub registry_url: Option<String>,

    /// Retries for transient network failures [default: 3]
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Delay before the first retry, doubled for each further retry [default: 500]
    #[arg(long)]
    pub backoff_ms: Option<u64>,

    /// Per-request timeout in seconds [default: 30]
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl RegistryArgs {
    pub fn apply(&self, config: &mut Config) {
        let target = &mut config.registry;
        if let Some(email) = &self.email {
            target.email = Some(email.clone());
        }
        if let Some(url) = &self.registry_url {
            target.base_url.clone_from(url);
        }
        if let Some(n) = self.max_retries {
            target.max_retries = n;
        }
        if let Some(ms) = self.backoff_ms {
            target.backoff_ms = ms;
        }
        if let Some(secs) = self.timeout_secs {
            target.timeout_secs = secs;
        }
    }
}

/// Distance-table and matching overrides
#[derive(Args, Debug, Default)]
pub struct DistanceArgs {
    /// Pairwise distance table (tab-separated, optionally .gz)
    #[arg(short, long)]
    pub distances: Option<PathBuf>,

    /// Column holding the first accession [default: biosample_acc_1]
    #[arg(long)]
    pub acc1_column: Option<String>,

    /// Column holding the second accession [default: biosample_acc_2]
    #[arg(long)]
    pub acc2_column: Option<String>,

    /// Column holding the distance [default: compatible_distance]
    #[arg(long)]
    pub distance_column: Option<String>,

    /// Skip and count malformed rows (true) or abort on the first one (false) [default: true]
    #[arg(long, value_name = "BOOL")]
    pub skip_bad_rows: Option<bool>,

    /// Which sides of a distance row to check [default: first-side]
    #[arg(long, value_enum)]
    pub match_mode: Option<MatchMode>,
}

impl DistanceArgs {
    pub fn apply(&self, config: &mut Config) {
        let target = &mut config.distance_table;
        if let Some(path) = &self.distances {
            target.path = Some(path.clone());
        }
        if let Some(column) = &self.acc1_column {
            target.acc1_column.clone_from(column);
        }
        if let Some(column) = &self.acc2_column {
            target.acc2_column.clone_from(column);
        }
        if let Some(column) = &self.distance_column {
            target.distance_column.clone_from(column);
        }
        if let Some(skip) = self.skip_bad_rows {
            target.skip_bad_rows = skip;
        }
        if let Some(mode) = self.match_mode {
            config.matching.mode = mode;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::from_toml(
            "[line_list]\ncolumn = \"From File\"\nprefix = \"PNX\"\n[distance_table]\nskip_bad_rows = true\n",
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "linelist-linker",
            "link",
            "--column",
            "WGS id",
            "--skip-bad-rows",
            "false",
            "--match-mode",
            "symmetric",
            "--email",
            "someone@example.org",
        ])
        .unwrap();

        let Commands::Link(args) = cli.command else {
            panic!("expected link command");
        };
        args.apply(&mut config);

        assert_eq!(config.line_list.column, "WGS id");
        assert_eq!(config.line_list.prefix, "PNX");
        assert!(!config.distance_table.skip_bad_rows);
        assert_eq!(config.matching.mode, MatchMode::Symmetric);
        assert_eq!(config.registry.email.as_deref(), Some("someone@example.org"));
    }
}
