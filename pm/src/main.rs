use std::path::Path;

use clap::Parser;
use eyre::{Context, Result};
use log::debug;

use promptmerge::cli::Cli;
use promptmerge::config::Config;
use promptmerge::{Destination, DocumentLoader, compose, render, write};

fn setup_logging() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .try_init()?;
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(Path::new(".")).context("Failed to load configuration")?;
    debug!("main: config={:?}", config);

    let loader = DocumentLoader::from_config(&config);
    let merged = compose(&loader, &cli.template_name)
        .with_context(|| format!("Failed to compose template '{}'", cli.template_name))?;
    let text = render(&merged)?;

    let dest = Destination::from(cli.out);
    write(&text, &dest, &mut std::io::stdout().lock())?;

    Ok(())
}
