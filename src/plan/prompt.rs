//! Cumulative update re-selection
//!
//! When no usable CU name was requested the operator picks one from the
//! catalog list. Unattended runs never block on a prompt; they go without a CU.

use inquire::Select;

use crate::catalog::Product;
use crate::error::Result;

/// Asks for a cumulative update out of the names the catalog offers
pub trait CumulativeUpdatePrompt {
    /// Pick one of `names` (catalog order), or `None` to build without a CU
    fn choose(&self, product: &Product, names: &[&str]) -> Result<Option<String>>;

    /// Whether a person is answering
    fn is_interactive(&self) -> bool;
}

/// Terminal menu built on inquire
pub struct InteractivePrompt;

impl CumulativeUpdatePrompt for InteractivePrompt {
    fn choose(&self, product: &Product, names: &[&str]) -> Result<Option<String>> {
        let items: Vec<String> = names.iter().map(|n| (*n).to_string()).collect();
        // Latest CU is listed last in the catalog
        let start = items.len().saturating_sub(1);

        let selection = Select::new(
            &format!("Cumulative update for SharePoint {}", product.year),
            items,
        )
        .with_starting_cursor(start)
        .with_page_size(12)
        .with_help_message("↑↓ to move, ENTER to select, ESC to build without a cumulative update")
        .prompt_skippable()?;

        Ok(selection)
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

/// Answers every prompt with "no cumulative update"
pub struct UnattendedPrompt;

impl CumulativeUpdatePrompt for UnattendedPrompt {
    fn choose(&self, _product: &Product, _names: &[&str]) -> Result<Option<String>> {
        Ok(None)
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Interactive when a user is at the terminal and prompting is allowed
pub fn prompt_for(no_prompt: bool) -> Box<dyn CumulativeUpdatePrompt> {
    if !no_prompt && console::user_attended() {
        Box::new(InteractivePrompt)
    } else {
        Box::new(UnattendedPrompt)
    }
}
