//! Turning a build request into a plan
//!
//! Bad cumulative update or language names never abort a run: they are
//! recorded as warnings and dropped. The service pack is always the catalog's
//! `SP1`, and Office Web Apps follows whatever SharePoint got, name for name.

use std::collections::HashSet;

use super::prompt::CumulativeUpdatePrompt;
use super::{BuildPlan, BuildRequest, LanguageSelection};
use crate::catalog::{Product, UpdatePackage};
use crate::context::RunContext;
use crate::error::{self, Result};

/// Service pack every plan uses
pub const SERVICE_PACK_NAME: &str = "SP1";

pub struct SelectionResolver<'a> {
    product: &'a Product,
}

impl<'a> SelectionResolver<'a> {
    pub fn new(product: &'a Product) -> Self {
        Self { product }
    }

    pub fn build_plan(
        &self,
        request: BuildRequest,
        prompt: &dyn CumulativeUpdatePrompt,
        ctx: &mut RunContext,
    ) -> Result<BuildPlan> {
        let service_pack = self.product.find_service_pack(SERVICE_PACK_NAME).cloned();
        if service_pack.is_none() {
            ctx.notice(format!(
                "{} has no {SERVICE_PACK_NAME} in the catalog; building without a service pack",
                self.product.key
            ));
        }

        let cumulative_update =
            self.select_cumulative_update(request.cumulative_update.as_deref(), prompt, ctx)?;

        let languages = self.select_languages(
            &request.languages,
            service_pack.as_ref(),
            cumulative_update.as_ref(),
            ctx,
        )?;

        let (owa_service_pack, owa_cumulative_update) = if request.owa_source.is_some() {
            self.select_owa(service_pack.as_ref(), cumulative_update.as_ref(), ctx)
        } else {
            (None, None)
        };

        let prerequisites = if request.prerequisites {
            self.product.prerequisites.clone()
        } else {
            Vec::new()
        };

        Ok(BuildPlan {
            product: self.product.clone(),
            source: request.source,
            owa_source: request.owa_source,
            destination: request.destination,
            staging: request.staging,
            prerequisites,
            service_pack,
            cumulative_update,
            owa_service_pack,
            owa_cumulative_update,
            languages,
        })
    }

    fn select_cumulative_update(
        &self,
        requested: Option<&str>,
        prompt: &dyn CumulativeUpdatePrompt,
        ctx: &mut RunContext,
    ) -> Result<Option<UpdatePackage>> {
        if let Some(name) = requested {
            if let Some(cu) = self.product.find_cumulative_update(name) {
                return Ok(Some(cu.clone()));
            }
            ctx.record(error::selection::invalid_cumulative_update(
                name,
                &self.product.key,
            ))?;
        }

        let names = self.product.list_cumulative_updates();
        if names.is_empty() {
            ctx.notice(format!(
                "The catalog lists no cumulative updates for {}",
                self.product.key
            ));
            return Ok(None);
        }

        let chosen = prompt.choose(self.product, &names)?;
        match chosen.as_deref().and_then(|n| self.product.find_cumulative_update(n)) {
            Some(cu) => Ok(Some(cu.clone())),
            None => {
                let hint = if prompt.is_interactive() {
                    ""
                } else {
                    " (pass --cumulative-update to pick one)"
                };
                ctx.notice(format!("Building without a cumulative update{hint}"));
                Ok(None)
            }
        }
    }

    fn select_languages(
        &self,
        requested: &[String],
        service_pack: Option<&UpdatePackage>,
        cumulative_update: Option<&UpdatePackage>,
        ctx: &mut RunContext,
    ) -> Result<Vec<LanguageSelection>> {
        let mut seen = HashSet::new();
        let mut selections = Vec::new();

        for culture in requested {
            let culture = culture.trim().to_lowercase();
            if culture.is_empty() || !seen.insert(culture.clone()) {
                continue;
            }

            let Some(pack) = self.product.find_language_pack(&culture) else {
                ctx.record(error::selection::invalid_language(
                    &culture,
                    &self.product.key,
                ))?;
                continue;
            };

            selections.push(LanguageSelection {
                service_pack: service_pack
                    .and_then(|sp| pack.find_service_pack(&sp.name))
                    .cloned(),
                cumulative_update: cumulative_update
                    .and_then(|cu| pack.find_cumulative_update(&cu.name))
                    .cloned(),
                pack: pack.clone(),
            });
        }

        Ok(selections)
    }

    fn select_owa(
        &self,
        service_pack: Option<&UpdatePackage>,
        cumulative_update: Option<&UpdatePackage>,
        ctx: &mut RunContext,
    ) -> (Option<UpdatePackage>, Option<UpdatePackage>) {
        let Some(owa) = &self.product.office_web_apps else {
            ctx.notice(format!(
                "The catalog lists no Office Web Apps updates for {}; copying the media only",
                self.product.key
            ));
            return (None, None);
        };

        let owa_service_pack = service_pack.and_then(|sp| {
            let found = owa.find_service_pack(&sp.name).cloned();
            if found.is_none() {
                ctx.notice(format!(
                    "No Office Web Apps service pack named '{}'; skipping it",
                    sp.name
                ));
            }
            found
        });

        let owa_cumulative_update = cumulative_update.and_then(|cu| {
            let found = owa.find_cumulative_update(&cu.name).cloned();
            if found.is_none() {
                ctx.notice(format!(
                    "No Office Web Apps cumulative update named '{}'; skipping it",
                    cu.name
                ));
            }
            found
        });

        (owa_service_pack, owa_cumulative_update)
    }
}
