//! Layering engine
//!
//! Applies a [`BuildPlan`] to the destination tree in a fixed order:
//!
//! 1. base media → `SharePoint`
//! 2. prerequisites → `SharePoint/PrerequisiteInstallerFiles`
//! 3. service pack → `SharePoint/Updates` (unless already slipstreamed)
//! 4. cumulative update → `SharePoint/Updates`
//! 5. Office Web Apps media, service pack and cumulative update
//! 6. per language: pack, language service pack, language cumulative update,
//!    then the culture's patches out of `SharePoint/Updates`
//! 7. the `_SLIPSTREAMED.txt` manifest
//!
//! A package that fails to download or expand is recorded as a warning and the
//! run moves on. The tree is never rolled back; running again picks up where
//! the last run stopped.

pub mod policy;

use std::path::Path;

use crate::capability::Capabilities;
use crate::catalog::UpdatePackage;
use crate::common::fs::{copy_file, ensure_dir, files_containing};
use crate::context::RunContext;
use crate::error::Result;
use crate::materialize::{Materialized, Materializer};
use crate::plan::{BuildPlan, LanguageSelection};
use crate::report::StageKind;
use policy::SlipstreamPolicy;

pub struct LayeringEngine<'a> {
    caps: Capabilities<'a>,
    materializer: Materializer<'a>,
    policy: &'a dyn SlipstreamPolicy,
}

impl<'a> LayeringEngine<'a> {
    pub fn new(caps: Capabilities<'a>, policy: &'a dyn SlipstreamPolicy) -> Self {
        Self {
            caps,
            materializer: Materializer::new(caps),
            policy,
        }
    }

    /// Use a specific materializer (tests point its log directory elsewhere)
    pub fn with_materializer(mut self, materializer: Materializer<'a>) -> Self {
        self.materializer = materializer;
        self
    }

    /// Apply every stage of `plan`, then write the manifest
    pub fn apply(&self, plan: &BuildPlan, ctx: &mut RunContext) -> Result<()> {
        // Nothing can be layered without the destination root
        ensure_dir(&plan.destination)?;

        ctx.step("Copying base media");
        self.copy_base(&plan.source, &plan.sharepoint_dir(), StageKind::BaseCopy, ctx)?;

        if !plan.prerequisites.is_empty() {
            ctx.step("Prerequisites");
            let target = plan.prerequisites_dir();
            for package in &plan.prerequisites {
                self.apply_package(StageKind::Prerequisite, &package.name, package, &target, &plan.staging, ctx)?;
            }
        }

        let updates = plan.updates_dir();
        if let Some(sp) = &plan.service_pack {
            ctx.step(&format!("Service pack {}", sp.name));
            self.apply_service_pack(StageKind::ServicePack, sp, &updates, &plan.staging, ctx)?;
        }

        let mut cumulative_update_applied = false;
        if let Some(cu) = &plan.cumulative_update {
            ctx.step(&format!("Cumulative update {}", cu.name));
            cumulative_update_applied =
                self.apply_package(StageKind::CumulativeUpdate, &cu.name, cu, &updates, &plan.staging, ctx)?;
        }

        if let Some(owa_source) = &plan.owa_source {
            self.apply_office_web_apps(plan, owa_source, ctx)?;
        }

        for language in &plan.languages {
            self.apply_language(plan, language, cumulative_update_applied, ctx)?;
        }

        ctx.step("Writing manifest");
        let manifest = ctx.report.write_manifest()?;
        ctx.info(&format!("Wrote {}", manifest.display()));
        Ok(())
    }

    fn copy_base(&self, source: &Path, target: &Path, kind: StageKind, ctx: &mut RunContext) -> Result<()> {
        let subject = target
            .file_name()
            .map_or_else(|| target.display().to_string(), |n| n.to_string_lossy().to_string());

        if same_location(source, target) {
            ctx.notice(format!(
                "{} is already the destination; not copying it onto itself",
                source.display()
            ));
            ctx.report.record_skipped(kind, subject, "source is the destination");
            return Ok(());
        }

        ctx.info(&format!("{} -> {}", source.display(), target.display()));
        match self.caps.copy.mirror(source, target) {
            Ok(stats) => {
                ctx.report.copied_files += stats.copied;
                ctx.report.record_applied(
                    kind,
                    subject,
                    Some(format!("{} copied, {} up to date", stats.copied, stats.skipped)),
                );
                Ok(())
            }
            Err(err) => ctx.record(err),
        }
    }

    fn apply_service_pack(
        &self,
        kind: StageKind,
        sp: &UpdatePackage,
        updates: &Path,
        staging: &Path,
        ctx: &mut RunContext,
    ) -> Result<()> {
        if let Some(reason) = self.policy.already_slipstreamed(updates, sp) {
            ctx.notice(format!("Service pack {} already slipstreamed: {reason}", sp.name));
            ctx.report.record_skipped(kind, &sp.name, reason);
            return Ok(());
        }
        self.apply_package(kind, &sp.name, sp, updates, staging, ctx)
            .map(|_| ())
    }

    /// Materialize one package; `Ok(false)` means it failed and was recorded
    fn apply_package(
        &self,
        kind: StageKind,
        subject: &str,
        package: &UpdatePackage,
        target: &Path,
        staging: &Path,
        ctx: &mut RunContext,
    ) -> Result<bool> {
        match self.materializer.materialize(package, target, staging, ctx) {
            Ok(outcome) => {
                let state = describe(&outcome);
                let detail = if subject == package.name {
                    state.to_string()
                } else {
                    format!("{}, {state}", package.name)
                };
                ctx.report.record_applied(kind, subject, Some(detail));
                Ok(true)
            }
            Err(err) => {
                ctx.record(err)?;
                Ok(false)
            }
        }
    }

    fn apply_office_web_apps(&self, plan: &BuildPlan, owa_source: &Path, ctx: &mut RunContext) -> Result<()> {
        ctx.step("Office Web Apps");
        self.copy_base(owa_source, &plan.owa_dir(), StageKind::OwaBaseCopy, ctx)?;

        let updates = plan.owa_updates_dir();
        let staging = plan.owa_staging_dir();
        if let Some(sp) = &plan.owa_service_pack {
            self.apply_service_pack(StageKind::OwaServicePack, sp, &updates, &staging, ctx)?;
        }
        if let Some(cu) = &plan.owa_cumulative_update {
            self.apply_package(StageKind::OwaCumulativeUpdate, &cu.name, cu, &updates, &staging, ctx)?;
        }
        Ok(())
    }

    fn apply_language(
        &self,
        plan: &BuildPlan,
        language: &LanguageSelection,
        cumulative_update_applied: bool,
        ctx: &mut RunContext,
    ) -> Result<()> {
        let culture = language.culture_id();
        ctx.step(&format!("Language pack {culture}"));

        let pack_dir = plan.language_dir(culture);
        let updates = plan.language_updates_dir(culture);
        let staging = plan.language_staging_dir(culture);

        self.apply_package(StageKind::LanguagePack, culture, &language.pack.package, &pack_dir, &staging, ctx)?;

        if let Some(sp) = &language.service_pack {
            self.apply_package(StageKind::LanguageServicePack, culture, sp, &updates, &staging, ctx)?;
        }
        if let Some(cu) = &language.cumulative_update {
            self.apply_package(StageKind::LanguageCumulativeUpdate, culture, cu, &updates, &staging, ctx)?;
        }

        if cumulative_update_applied {
            self.redistribute_patches(&plan.updates_dir(), &updates, culture, ctx)?;
        }
        Ok(())
    }

    /// Copy the culture's patch files from the product-wide CU into the language's Updates
    fn redistribute_patches(
        &self,
        updates: &Path,
        language_updates: &Path,
        culture: &str,
        ctx: &mut RunContext,
    ) -> Result<()> {
        let patches = files_containing(updates, culture);
        if patches.is_empty() {
            ctx.detail(&format!("No {culture} files in {}", updates.display()));
            return Ok(());
        }

        let mut copied = 0;
        for patch in &patches {
            let Some(name) = patch.file_name() else {
                continue;
            };
            match copy_file(patch, &language_updates.join(name)) {
                Ok(_) => copied += 1,
                Err(err) => ctx.record(err)?,
            }
        }

        if copied > 0 {
            ctx.report.copied_files += copied;
            ctx.report.record_applied(
                StageKind::LanguagePatchCopy,
                culture,
                Some(format!("{copied} files from the cumulative update")),
            );
        }
        Ok(())
    }
}

fn describe(outcome: &Materialized) -> &'static str {
    match (outcome.fetched, outcome.expanded) {
        (false, false) => "already present",
        (true, true) => "downloaded and expanded",
        (false, true) => "expanded from staging",
        (true, false) => "downloaded",
    }
}

/// Source and target resolve to the same folder
fn same_location(source: &Path, target: &Path) -> bool {
    match (dunce::canonicalize(source), dunce::canonicalize(target)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
