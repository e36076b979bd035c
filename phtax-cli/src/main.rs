use anyhow::Context;
use clap::Parser;
use tracing::debug;

use phtax_cli::app;
use phtax_cli::cli::Cli;
use phtax_cli::config::Config;
use phtax_cli::logging;

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    logging::init_logging(
        cli.log_level.as_deref(),
        config.log_level.as_deref(),
        config.log_file.as_deref(),
    )?;
    debug!(?config, "Configuration loaded");

    let output = app::run(&cli, &config)?;
    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }

    Ok(())
}
