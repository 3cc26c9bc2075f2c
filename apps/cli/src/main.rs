//! FluentSitemap sample host.
//!
//! Plays the part of a web application: routes, controllers and literal
//! pages come from a `fluentsitemap.toml` manifest, and the sitemap document
//! is written to disk or stdout.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
