//! Version command implementation

use std::path::PathBuf;

use crate::capability::fetch::{DEFAULT_RETRIES, DEFAULT_TIMEOUT_SECS};
use crate::catalog;
use crate::error::Result;
use crate::media;

/// Run version command
pub fn run(catalog: Option<PathBuf>) -> Result<()> {
    println!("slipstream {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Build info:");
    println!("  Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    println!("  Profile: {}", if cfg!(debug_assertions) { "debug" } else { "release" });
    println!();
    println!("Defaults:");
    println!("  Catalog: {}", catalog::resolve_path(catalog)?.display());
    println!("  Destination: {}", media::default_destination().display());
    println!("  Download retries: {DEFAULT_RETRIES}");
    println!("  Download timeout: {DEFAULT_TIMEOUT_SECS}s");

    Ok(())
}
