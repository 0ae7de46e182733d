//! Build command implementation
//!
//! Wires the pipeline together: catalog, media detection, selection, then
//! the layering engine with the production capabilities. Fatal errors end the
//! run with exit status 1; everything else ends up in the summary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::capability::Capabilities;
use crate::capability::expand::{ExtractUi, NativeExpander};
use crate::capability::fetch::{FetchSettings, HttpFetcher};
use crate::capability::mirror::MirrorCopy;
use crate::catalog::{self, Catalog, Product};
use crate::cli::BuildArgs;
use crate::context::RunContext;
use crate::error::Result;
use crate::layering::LayeringEngine;
use crate::layering::policy::PatchCountPolicy;
use crate::media::{self, VersionResolver};
use crate::plan::prompt::prompt_for;
use crate::plan::selection::SelectionResolver;
use crate::plan::{BuildPlan, BuildRequest, default_staging};
use crate::report::BuildReport;
use crate::ui::display::display_summary;
use crate::ui::{InteractiveProgressReporter, ProgressReporter, SilentProgressReporter, status};

/// Run build command
pub fn run(catalog: Option<PathBuf>, verbose: bool, args: BuildArgs) -> Result<()> {
    let catalog_path = catalog::resolve_path(catalog)?;
    let catalog = Catalog::load(&catalog_path)?;

    status::step("Detecting installation media");
    let resolved = VersionResolver::new(&catalog)
        .resolve(args.source.as_deref(), &media::candidate_roots())?;
    let product = resolved.product;
    status::field("Media:", &resolved.path.display().to_string());
    status::field(
        "Version:",
        &format!("{} (SharePoint {})", resolved.version, product.year),
    );

    let owa_source = args
        .owa_source
        .as_deref()
        .map(media::validate_owa_source)
        .transpose()?;

    let destination = resolve_destination(args.destination, product, &catalog.year_labels());
    let staging = args
        .staging
        .unwrap_or_else(|| default_staging(&destination));

    let progress: Box<dyn ProgressReporter> = if console::user_attended() {
        Box::new(InteractiveProgressReporter::new())
    } else {
        Box::new(SilentProgressReporter)
    };
    let report = BuildReport::new(
        &product.key,
        &product.year,
        resolved.version.to_string(),
        destination.clone(),
    );
    let mut ctx = RunContext::new(report, verbose, progress);

    let request = BuildRequest {
        source: resolved.path.clone(),
        owa_source,
        destination,
        staging,
        prerequisites: args.prerequisites,
        cumulative_update: args.cumulative_update,
        languages: args.languages,
    };
    let prompt = prompt_for(args.no_prompt);
    let plan = SelectionResolver::new(product).build_plan(request, prompt.as_ref(), &mut ctx)?;
    display_plan(&plan);

    let fetcher = HttpFetcher::new(FetchSettings {
        retries: args.retries,
        timeout: Duration::from_secs(args.timeout),
        ..FetchSettings::default()
    })?;
    let expander = NativeExpander::new(if args.passive {
        ExtractUi::Passive
    } else {
        ExtractUi::Quiet
    });
    let caps = Capabilities {
        fetch: &fetcher,
        expand: &expander,
        copy: &MirrorCopy,
    };

    LayeringEngine::new(caps, &PatchCountPolicy).apply(&plan, &mut ctx)?;

    display_summary(&ctx.into_report());
    Ok(())
}

/// The destination given, or the default one moved to the product's year folder
fn resolve_destination(explicit: Option<PathBuf>, product: &Product, year_labels: &[&str]) -> PathBuf {
    match explicit {
        Some(destination) => destination,
        None => adjust_default(&media::default_destination(), product, year_labels),
    }
}

fn adjust_default(default: &Path, product: &Product, year_labels: &[&str]) -> PathBuf {
    match media::adjust_destination(default, product, year_labels) {
        Some(adjusted) => {
            status::notice(&format!(
                "Destination adjusted to {} for SharePoint {}",
                adjusted.display(),
                product.year
            ));
            adjusted
        }
        None => default.to_path_buf(),
    }
}

fn display_plan(plan: &BuildPlan) {
    status::step("Plan");
    status::field("Destination:", &plan.destination.display().to_string());
    status::field("Staging:", &plan.staging.display().to_string());
    let name_or_none = |package: Option<&crate::catalog::UpdatePackage>| {
        package.map_or_else(|| "none".to_string(), |p| p.name.clone())
    };
    status::field("Service pack:", &name_or_none(plan.service_pack.as_ref()));
    status::field(
        "Cumulative update:",
        &name_or_none(plan.cumulative_update.as_ref()),
    );
    if !plan.prerequisites.is_empty() {
        status::field("Prerequisites:", &plan.prerequisites.len().to_string());
    }
    if let Some(owa) = &plan.owa_source {
        status::field("Office Web Apps:", &owa.display().to_string());
    }
    if !plan.languages.is_empty() {
        status::field("Languages:", &plan.culture_ids().join(", "));
    }
}
