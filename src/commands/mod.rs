//! Command implementations for the slipstream CLI

pub mod build;
pub mod completions;
pub mod list;
pub mod version;
