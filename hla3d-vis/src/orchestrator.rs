use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use hla3d_core::get_hla_polychain;
use hla3d_epitope::{
    CoverOptions, DonorProfileSource, ElliProScore, EpitopeRepository, HlaEpitopeProfile,
    MinimumHlaCover, TransplantId, hla_to_epitope_set,
};
use hla3d_structure::{ModelData, StructureLookup};

use crate::annotation::{AntibodyFlags, DesaInfo, ResidueAnnotation, ResidueAnnotationBuilder};
use crate::bundle::ReferenceBundle;
use crate::cache::StructureCache;
use crate::config::ConfigError;
use crate::error::{Result, VisError};
use crate::styles::StyleOptions;

///
/// Options of one visualization request.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisOptions {
    pub style: StyleOptions,
    pub antibodies: AntibodyFlags,
    /// Keep only epitopes with one of these exposure scores
    pub exposure: Option<BTreeSet<ElliProScore>>,
    pub cover: CoverOptions,
}

///
/// Model and style of one HLA molecule, plus the epitopes drawn on it.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HlaVisualization {
    pub model: ModelData,
    pub style: ResidueAnnotation,
    pub epitopes: HlaEpitopeProfile,
}

///
/// An allele whose structural file could not be parsed.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderFailure {
    pub reason: String,
    /// Epitopes that were to be displayed on the allele
    pub epitopes: BTreeSet<String>,
}

///
/// Result of a visualization request. Alleles that could not be drawn are
/// listed next to the ones that were, so a batch never fails as a whole.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualizationPayload {
    /// Rendered alleles in the order they were selected
    pub alleles: Vec<String>,
    pub structures: BTreeMap<String, HlaVisualization>,
    /// Epitopes of the repository no selected allele covers
    pub unassigned: BTreeSet<String>,
    /// Epitopes absent from the (filtered) epitope table
    pub unknown: BTreeSet<String>,
    /// Alleles without a structural file
    pub missing_structures: BTreeSet<String>,
    /// Alleles whose structural file could not be parsed
    pub failures: BTreeMap<String, RenderFailure>,
}

impl VisualizationPayload {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransplantPayload {
    pub transplants: BTreeMap<TransplantId, VisualizationPayload>,
}

impl TransplantPayload {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

///
/// Parse transplant identifiers given as text.
///
pub fn parse_transplant_ids<S: AsRef<str>>(values: &[S]) -> Result<Vec<TransplantId>> {
    values
        .iter()
        .map(|v| {
            v.as_ref().trim().parse::<TransplantId>().map_err(|_| {
                VisError::InvalidInput(format!("transplant id is not an integer: {}", v.as_ref()))
            })
        })
        .collect()
}

fn validate_epitopes<S: AsRef<str>>(epitopes: &[S]) -> Result<BTreeSet<String>> {
    if epitopes.is_empty() {
        return Err(VisError::InvalidInput("no epitope given".to_string()));
    }
    let mut targets = BTreeSet::new();
    for epitope in epitopes {
        let id = epitope.as_ref().trim();
        if id.is_empty() {
            return Err(VisError::InvalidInput("blank epitope identifier".to_string()));
        }
        if !targets.insert(id.to_string()) {
            return Err(VisError::InvalidInput(format!("duplicate epitope: {}", id)));
        }
    }
    Ok(targets)
}

fn validate_transplant_ids(ids: &[TransplantId]) -> Result<()> {
    if ids.is_empty() {
        return Err(VisError::InvalidInput("no transplant id given".to_string()));
    }
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(VisError::InvalidInput(format!("duplicate transplant id: {}", id)));
        }
    }
    Ok(())
}

///
/// Runs the full pipeline of a request: epitope selection, structure lookup,
/// parsing and styling of every HLA molecule.
///
pub struct VisualizationOrchestrator<'a> {
    bundle: &'a ReferenceBundle,
}

impl<'a> VisualizationOrchestrator<'a> {
    pub fn new(bundle: &'a ReferenceBundle) -> Self {
        VisualizationOrchestrator { bundle }
    }

    fn repository(&self, options: &VisOptions) -> EpitopeRepository {
        match &options.exposure {
            Some(scores) => self.bundle.epitopes.filter_by_exposure(scores),
            None => self.bundle.epitopes.clone(),
        }
    }

    ///
    /// Visualise a set of epitopes on the fewest HLA molecules that carry them.
    ///
    /// # Arguments
    /// - epitopes: epitope identifiers, non-empty and without duplicates
    /// - options: style, antibody flags, exposure filter and cover options
    pub fn from_epitopes<S: AsRef<str>>(
        &self,
        epitopes: &[S],
        options: &VisOptions,
    ) -> Result<VisualizationPayload> {
        let targets = validate_epitopes(epitopes)?;
        let repository = self.repository(options);

        let cover = MinimumHlaCover::new(&repository)
            .with_structures(&self.bundle.locator)
            .cover(&targets, &options.cover);

        let mut payload = VisualizationPayload {
            unassigned: cover.unassigned.clone(),
            unknown: cover.unknown.clone(),
            ..Default::default()
        };
        let mut cache = StructureCache::new();

        for assignment in &cover.assignments {
            self.render(
                &assignment.hla,
                &assignment.epitopes,
                &repository,
                options,
                &mut cache,
                &mut payload,
            );
        }

        log::info!(
            "Rendered {} of {} selected alleles",
            payload.structures.len(),
            cover.assignments.len()
        );
        Ok(payload)
    }

    ///
    /// Visualise the donor-specific epitopes of transplants on the donor's HLA molecules.
    ///
    /// Every id is checked against the donor profiles before any structure is read.
    ///
    /// # Arguments
    /// - transplant_ids: transplant identifiers, non-empty and without duplicates
    /// - options: style, antibody flags and exposure filter
    pub fn from_transplants(
        &self,
        transplant_ids: &[TransplantId],
        options: &VisOptions,
    ) -> Result<TransplantPayload> {
        validate_transplant_ids(transplant_ids)?;
        let desa = self
            .bundle
            .desa
            .as_ref()
            .ok_or(ConfigError::MissingDesaTable)?;

        let absent: Vec<String> = transplant_ids
            .iter()
            .filter(|id| !desa.contains(**id))
            .map(|id| id.to_string())
            .collect();
        if !absent.is_empty() {
            return Err(VisError::NotFound(format!(
                "transplants {}",
                absent.join(", ")
            )));
        }

        let repository = self.repository(options);
        let mut cache = StructureCache::new();
        let mut result = TransplantPayload::default();

        for &id in transplant_ids {
            let Some(profile) = desa.donor_profile(id) else {
                continue;
            };

            let mut payload = VisualizationPayload::default();
            let mut known: BTreeMap<String, String> = BTreeMap::new();
            for (epitope, hla) in profile {
                if repository.contains(epitope) {
                    known.insert(epitope.clone(), hla.clone());
                } else {
                    log::info!(
                        "Transplant {}: epitope {} is not in the epitope table",
                        id,
                        epitope
                    );
                    payload.unknown.insert(epitope.clone());
                }
            }

            for (hla, epitopes) in hla_to_epitope_set(&known) {
                if !self.bundle.locator.has_structure(&hla) {
                    log::info!("Transplant {}: no structure for {}, skipped", id, hla);
                    payload.missing_structures.insert(hla);
                    continue;
                }
                self.render(&hla, &epitopes, &repository, options, &mut cache, &mut payload);
            }

            result.transplants.insert(id, payload);
        }

        Ok(result)
    }

    fn render(
        &self,
        hla: &str,
        epitopes: &BTreeSet<String>,
        repository: &EpitopeRepository,
        options: &VisOptions,
        cache: &mut StructureCache,
        payload: &mut VisualizationPayload,
    ) {
        let Some(path) = self.bundle.locator.resolve(hla) else {
            log::info!("No structure for {}, skipped", hla);
            payload.missing_structures.insert(hla.to_string());
            return;
        };

        let record = match cache.get_or_parse(&path) {
            Ok(record) => record,
            Err(e) => {
                log::error!("Can't read the structure of {}: {}", hla, e);
                payload.failures.insert(
                    hla.to_string(),
                    RenderFailure {
                        reason: e.to_string(),
                        epitopes: epitopes.clone(),
                    },
                );
                return;
            }
        };

        let chain = get_hla_polychain(hla);
        if chain.is_none() {
            log::warn!("No polymorphic chain known for {}, epitopes are not highlighted", hla);
        }

        let profile = HlaEpitopeProfile::from_epitopes(epitopes, repository);
        let desa = DesaInfo::new(chain, &profile.residues(repository), options.antibodies);
        let style = ResidueAnnotationBuilder::new(options.style).annotate(&record, &desa);

        payload.alleles.push(hla.to_string());
        payload.structures.insert(
            hla.to_string(),
            HlaVisualization {
                model: ModelData::from(&*record),
                style,
                epitopes: profile,
            },
        );
    }
}
