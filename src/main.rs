//! Slipstream - SharePoint installation source builder
//!
//! Copies SharePoint Server base media into a destination tree and layers the
//! service pack, a cumulative update, Office Web Apps and language packs onto
//! it, downloading and expanding updates from a YAML catalog.

use clap::Parser;

mod capability;
mod catalog;
mod cli;
mod commands;
mod common;
mod context;
mod error;
mod layering;
mod materialize;
mod media;
mod plan;
mod report;
mod temp;
mod ui;

#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build(args) => commands::build::run(cli.catalog, cli.verbose, args),
        Commands::List(args) => commands::list::run(cli.catalog, args),
        Commands::Version => commands::version::run(cli.catalog),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
