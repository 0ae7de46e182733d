//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - build: Build command arguments
//! - list: List command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod build;
pub mod completions;
pub mod list;

pub use build::BuildArgs;
pub use completions::CompletionsArgs;
pub use list::ListArgs;

/// Slipstream - SharePoint installation source builder
///
/// Layer service packs, cumulative updates and language packs onto SharePoint media.
#[derive(Parser, Debug)]
#[command(
    name = "slipstream",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Build slipstreamed SharePoint installation sources",
    long_about = "Slipstream copies SharePoint Server base media into a destination folder and \
                  layers the service pack, a cumulative update, Office Web Apps and language packs \
                  on top, so that a single setup.exe installs a fully patched farm.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  slipstream build                                  \x1b[90m# Detect media, prompt for a CU\x1b[0m\n   \
                  slipstream build --source D:\\ --prerequisites     \x1b[90m# Explicit media, with prerequisites\x1b[0m\n   \
                  slipstream build --cumulative-update \"April 2013\" \x1b[90m# Pick the CU up front\x1b[0m\n   \
                  slipstream build --language fr-fr --language de-de \x1b[90m# Add language packs\x1b[0m\n   \
                  slipstream list                                   \x1b[90m# Show what the catalog offers\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Update catalog (defaults to catalog.yaml next to the executable)
    #[arg(long, short = 'c', global = true, env = "SLIPSTREAM_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a slipstreamed installation source
    Build(BuildArgs),

    /// List products and updates in the catalog
    List(ListArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_list() {
        let cli = Cli::try_parse_from(["slipstream", "list"]).unwrap();
        assert!(matches!(cli.command, Commands::List(_)));
    }

    #[test]
    fn test_cli_parsing_build_defaults() {
        let cli = Cli::try_parse_from(["slipstream", "build"]).unwrap();
        match cli.command {
            Commands::Build(args) => {
                assert!(args.source.is_none());
                assert!(args.cumulative_update.is_none());
                assert!(args.languages.is_empty());
                assert!(!args.prerequisites);
                assert!(!args.no_prompt);
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_parsing_build_options() {
        let cli = Cli::try_parse_from([
            "slipstream",
            "build",
            "--source",
            "/media/cdrom",
            "--destination",
            "/srv/SP/2010",
            "--cumulative-update",
            "April 2013",
            "--language",
            "fr-fr",
            "-l",
            "de-de",
            "--prerequisites",
            "--no-prompt",
            "--retries",
            "5",
        ])
        .unwrap();
        match cli.command {
            Commands::Build(args) => {
                assert_eq!(args.source, Some(PathBuf::from("/media/cdrom")));
                assert_eq!(args.destination, Some(PathBuf::from("/srv/SP/2010")));
                assert_eq!(args.cumulative_update.as_deref(), Some("April 2013"));
                assert_eq!(args.languages, vec!["fr-fr", "de-de"]);
                assert!(args.prerequisites);
                assert!(args.no_prompt);
                assert_eq!(args.retries, 5);
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_parsing_version() {
        let cli = Cli::try_parse_from(["slipstream", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn test_cli_global_options() {
        let cli =
            Cli::try_parse_from(["slipstream", "-v", "-c", "/etc/slipstream/catalog.yaml", "list"])
                .unwrap();
        assert!(cli.verbose);
        assert_eq!(
            cli.catalog,
            Some(PathBuf::from("/etc/slipstream/catalog.yaml"))
        );
    }

    #[test]
    #[serial_test::serial]
    fn test_cli_catalog_from_env() {
        unsafe {
            std::env::set_var("SLIPSTREAM_CATALOG", "/opt/slipstream/env-catalog.yaml");
        }
        let from_env = Cli::try_parse_from(["slipstream", "list"]).unwrap();
        let from_flag =
            Cli::try_parse_from(["slipstream", "--catalog", "/tmp/flag-catalog.yaml", "list"])
                .unwrap();
        unsafe {
            std::env::remove_var("SLIPSTREAM_CATALOG");
        }

        assert_eq!(
            from_env.catalog,
            Some(PathBuf::from("/opt/slipstream/env-catalog.yaml"))
        );
        // Flag should override environment variable
        assert_eq!(from_flag.catalog, Some(PathBuf::from("/tmp/flag-catalog.yaml")));
    }

    #[test]
    #[serial_test::serial]
    fn test_cli_fetch_settings_from_env() {
        unsafe {
            std::env::set_var("SLIPSTREAM_FETCH_RETRIES", "7");
            std::env::set_var("SLIPSTREAM_FETCH_TIMEOUT", "60");
        }
        let cli = Cli::try_parse_from(["slipstream", "build"]);
        unsafe {
            std::env::remove_var("SLIPSTREAM_FETCH_RETRIES");
            std::env::remove_var("SLIPSTREAM_FETCH_TIMEOUT");
        }

        match cli.unwrap().command {
            Commands::Build(args) => {
                assert_eq!(args.retries, 7);
                assert_eq!(args.timeout, 60);
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_parsing_completions() {
        let cli = Cli::try_parse_from(["slipstream", "completions", "bash"]).unwrap();
        match cli.command {
            Commands::Completions(args) => {
                assert_eq!(args.shell, "bash");
            }
            _ => panic!("Expected Completions command"),
        }
    }
}
