use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use linelist_linker::cli;
use linelist_linker::config::Config;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("linelist_linker=debug,info")
    } else {
        EnvFilter::new("linelist_linker=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let config = Config::load_or_default(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        cli::Commands::Link(args) => {
            cli::link::run(args, cli.format, config)?;
        }
        cli::Commands::Resolve(args) => {
            cli::resolve::run(args, cli.format, config)?;
        }
        cli::Commands::Match(args) => {
            cli::pairs::run(args, cli.format, config)?;
        }
        cli::Commands::Config(args) => {
            cli::config::run(args, config)?;
        }
    }

    Ok(())
}
