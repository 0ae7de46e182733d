//! Display functions for catalog products and build summaries

use console::Style;

use crate::catalog::{Product, UpdatePackage};
use crate::report::BuildReport;

/// Display one catalog product with its updates in catalog order
pub fn display_product(product: &Product) {
    println!(
        "  {} {}",
        Style::new().bold().yellow().apply_to(&product.key),
        Style::new().dim().apply_to(format!(
            "(SharePoint {}, version {}.x)",
            product.year, product.version_prefix
        ))
    );

    display_packages("Prerequisites:", &product.prerequisites);
    display_packages("Service packs:", &product.service_packs);
    display_packages("Cumulative updates:", &product.cumulative_updates);

    if !product.language_packs.is_empty() {
        println!("    {}", Style::new().bold().apply_to("Language packs:"));
        for pack in &product.language_packs {
            let mut extras: Vec<&str> = pack.service_packs.iter().map(|p| p.name.as_str()).collect();
            extras.extend(pack.cumulative_updates.iter().map(|p| p.name.as_str()));
            if extras.is_empty() {
                println!("      {}", Style::new().cyan().apply_to(&pack.culture_id));
            } else {
                println!(
                    "      {} {}",
                    Style::new().cyan().apply_to(&pack.culture_id),
                    Style::new().dim().apply_to(format!("+ {}", extras.join(", ")))
                );
            }
        }
    }

    if let Some(owa) = &product.office_web_apps {
        println!("    {}", Style::new().bold().apply_to("Office Web Apps:"));
        for package in owa.service_packs.iter().chain(&owa.cumulative_updates) {
            println!("      {}", Style::new().cyan().apply_to(&package.name));
        }
    }
}

fn display_packages(label: &str, packages: &[UpdatePackage]) {
    if packages.is_empty() {
        return;
    }
    println!("    {}", Style::new().bold().apply_to(label));
    for package in packages {
        println!(
            "      {} {}",
            Style::new().cyan().apply_to(&package.name),
            Style::new().dim().apply_to(package.file_name())
        );
    }
}

/// Closing summary of a build
pub fn display_summary(report: &BuildReport) {
    println!();
    let applied = report.applied.len();
    let skipped = report.skipped.len();
    println!(
        "{} {} applied, {} skipped, {} downloaded, {} expanded, {} files copied",
        Style::new().bold().apply_to("Summary:"),
        applied,
        skipped,
        report.downloads,
        report.expansions,
        report.copied_files
    );

    if report.has_warnings() {
        println!(
            "{}",
            Style::new().bold().red().apply_to(format!(
                "{} warning(s); the installation source may be incomplete:",
                report.warnings.len()
            ))
        );
        for warning in &report.warnings {
            println!("  [{}] {}", warning.category, warning.message);
            if let Some(log) = &warning.log {
                println!("      log: {log}");
            }
        }
        println!(
            "{}",
            Style::new()
                .yellow()
                .apply_to("Re-run the same command to finish; completed stages are skipped.")
        );
    } else {
        println!(
            "{} {}",
            Style::new().bold().green().apply_to("Done:"),
            report.destination.display()
        );
    }
}
