use clap::{Args, Subcommand};

use crate::cli::{DistanceArgs, LineListArgs, RegistryArgs};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration (defaults, file, and flags merged) as TOML
    Show(ShowArgs),
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub line_list: LineListArgs,

    #[command(flatten)]
    pub registry: RegistryArgs,

    #[command(flatten)]
    pub distances: DistanceArgs,
}

/// Execute config subcommand
///
/// # Errors
///
/// Returns an error if the merged configuration is invalid.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ConfigArgs, mut config: Config) -> anyhow::Result<()> {
    match args.command {
        ConfigCommands::Show(show) => {
            show.line_list.apply(&mut config);
            show.registry.apply(&mut config);
            show.distances.apply(&mut config);
            config.validate()?;
            print!("{}", config.to_toml()?);
        }
    }
    Ok(())
}
