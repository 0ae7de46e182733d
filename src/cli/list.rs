use clap::Parser;

/// Arguments for the list command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List every product in the catalog:\n    slipstream list\n\n\
                  Only SharePoint 2013:\n    slipstream list --product SP2013\n\n\
                  Machine-readable output:\n    slipstream list --json")]
pub struct ListArgs {
    /// Only show this product (catalog key, e.g. SP2010)
    #[arg(long)]
    pub product: Option<String>,

    /// Print the catalog as JSON
    #[arg(long)]
    pub json: bool,
}
