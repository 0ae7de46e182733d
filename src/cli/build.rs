use clap::Parser;
use std::path::PathBuf;

use crate::capability::fetch::{DEFAULT_RETRIES, DEFAULT_TIMEOUT_SECS};

/// Arguments for the build command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Detect the media and choose a cumulative update interactively:\n    slipstream build\n\n\
                  Unattended build with prerequisites and a French language pack:\n    \
                  slipstream build --source D:\\ --prerequisites --cumulative-update \"April 2013\" \\\n      \
                  --language fr-fr --no-prompt\n\n\
                  Include Office Web Apps:\n    slipstream build --owa-source E:\\ --cumulative-update \"April 2013\"")]
pub struct BuildArgs {
    /// Folder with the SharePoint base media (setup.exe and PrerequisiteInstaller.exe).
    /// Mounted volumes are searched when omitted.
    #[arg(long, short = 's')]
    pub source: Option<PathBuf>,

    /// Destination root; a trailing year folder follows the detected product
    #[arg(long, short = 'd', env = "SLIPSTREAM_DESTINATION")]
    pub destination: Option<PathBuf>,

    /// Folder downloads are kept in (defaults to <destination>/Updates)
    #[arg(long)]
    pub staging: Option<PathBuf>,

    /// Download the prerequisite installer files
    #[arg(long, short = 'p')]
    pub prerequisites: bool,

    /// Cumulative update to layer, by catalog name (e.g. "April 2013")
    #[arg(long = "cumulative-update", short = 'u', value_name = "NAME")]
    pub cumulative_update: Option<String>,

    /// Folder with the Office Web Apps base media
    #[arg(long = "owa-source", value_name = "PATH")]
    pub owa_source: Option<PathBuf>,

    /// Language pack to add, by culture id (repeatable)
    #[arg(long = "language", short = 'l', value_name = "ID")]
    pub languages: Vec<String>,

    /// Never prompt; build without a cumulative update when none is given
    #[arg(long = "no-prompt")]
    pub no_prompt: bool,

    /// Show the update extractors' progress windows
    #[arg(long)]
    pub passive: bool,

    /// Download retries after the first attempt
    #[arg(long, env = "SLIPSTREAM_FETCH_RETRIES", default_value_t = DEFAULT_RETRIES)]
    pub retries: u32,

    /// Per-request download timeout in seconds
    #[arg(long, value_name = "SECS", env = "SLIPSTREAM_FETCH_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,
}
