//! List command implementation
//!
//! This command lists the products in the catalog with their service packs,
//! cumulative updates (in catalog order), language packs and Office Web Apps
//! updates.

use std::path::PathBuf;

use crate::catalog::{self, Catalog, Product};
use crate::cli::ListArgs;
use crate::error::{self, Result};
use crate::ui::display::display_product;

/// Run list command
pub fn run(catalog: Option<PathBuf>, args: ListArgs) -> Result<()> {
    let path = catalog::resolve_path(catalog)?;
    let catalog = Catalog::load(&path)?;

    let products = select_products(&catalog, args.product.as_deref())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&products)?);
        return Ok(());
    }

    println!("Products in {} ({}):", path.display(), products.len());
    println!();
    for product in products {
        display_product(product);
        println!();
    }

    Ok(())
}

fn select_products<'a>(catalog: &'a Catalog, key: Option<&str>) -> Result<Vec<&'a Product>> {
    match key {
        Some(key) => catalog
            .find_product(key)
            .map(|product| vec![product])
            .ok_or_else(|| error::selection::unknown_product(key)),
        None => Ok(catalog.products().iter().collect()),
    }
}
