//! End-to-end analysis of one parcel.
//!
//! validate -> resolve standards -> every law gate/generator -> density bonus
//! on each eligible base scenario -> annotate -> rank -> recommend.
//!
//! Pure and request-scoped: the only shared inputs are the read-only tables
//! and parameters, so any number of analyses may run concurrently.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::annotate::annotate_with;
use crate::density_bonus::{apply_density_bonus, density_bonus_eligibility};
use crate::engine_params::EngineParams;
use crate::error::{AssemblageError, ParcelValidationError};
use crate::laws::{housing_laws, JurisdictionStatus, LawContext};
use crate::parcel::{
    combine_parcels, validate_parcel, validate_proposed, ParcelAttributes, ProposedProjectOptions,
};
use crate::recommend::{rank_scenarios, recommend, Recommendation};
use crate::scenario::{DevelopmentScenario, EligibilityResult, Law, LawOutcome};
use crate::standards::{DevelopmentStandards, StandardsTables};
use crate::transit_parking::transit_parking_eligibility;

// =============================================================================
// Request / report
// =============================================================================

/// One parcel to analyse, with optional developer intent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisRequest {
    pub request_id: String,
    pub parcel: ParcelAttributes,
    pub proposed: Option<ProposedProjectOptions>,
    pub jurisdiction: JurisdictionStatus,
}

impl AnalysisRequest {
    /// Build a request for several adjacent parcels analysed as one site.
    pub fn from_assemblage(
        request_id: impl Into<String>,
        parcels: &[ParcelAttributes],
        proposed: Option<ProposedProjectOptions>,
        jurisdiction: JurisdictionStatus,
    ) -> Result<Self, AssemblageError> {
        Ok(Self {
            request_id: request_id.into(),
            parcel: combine_parcels(parcels)?,
            proposed,
            jurisdiction,
        })
    }
}

/// Everything the engine concluded about one parcel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct AnalysisReport {
    pub request_id: String,
    pub parcel_id: String,
    /// Overlay-widened envelope every law started from.
    pub standards: DevelopmentStandards,
    /// One verdict per law, including the density bonus and transit modifiers.
    pub eligibility: Vec<EligibilityResult>,
    /// One outcome per generating law, plus one per stacked bonus variant.
    pub outcomes: Vec<LawOutcome>,
    /// Annotated scenarios, best first.
    pub scenarios: Vec<DevelopmentScenario>,
    pub recommendation: Recommendation,
    pub notes: Vec<String>,
}

impl AnalysisReport {
    pub fn recommended_scenario(&self) -> Option<&DevelopmentScenario> {
        let id = self.recommendation.scenario_id()?;
        self.scenarios.iter().find(|s| s.id == id)
    }

    pub fn eligibility_for(&self, law: Law) -> Option<&EligibilityResult> {
        self.eligibility.iter().find(|e| e.law == law)
    }

    pub fn scenarios_for(&self, law: Law) -> impl Iterator<Item = &DevelopmentScenario> {
        self.scenarios.iter().filter(move |s| s.law == law)
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// Run the full engine on one request.
///
/// Only structurally invalid input is an error; ineligibility and unknown
/// codes come back as reasons and notes.
pub fn analyze_parcel(
    tables: &StandardsTables,
    params: &EngineParams,
    request: &AnalysisRequest,
) -> Result<AnalysisReport, ParcelValidationError> {
    let _span = bevy::log::info_span!("analyze_parcel").entered();

    let parcel = &request.parcel;
    validate_parcel(parcel)?;
    if let Some(proposed) = &request.proposed {
        validate_proposed(proposed)?;
    }
    let proposed = request.proposed.as_ref();

    let ctx = LawContext {
        params,
        tables,
        jurisdiction: &request.jurisdiction,
    };
    let standards =
        tables.resolve_standards(&parcel.zone_code, &parcel.overlay_codes, parcel.development_tier);

    // Independent fan-out over the generating laws.
    let mut verdicts: Vec<(EligibilityResult, Option<DevelopmentScenario>)> = Vec::new();
    for law in housing_laws() {
        let eligibility = law.is_eligible(&ctx, parcel, &standards, proposed);
        let scenario = law.generate_scenario(&ctx, parcel, &standards, &eligibility, proposed);
        bevy::log::debug!(
            "{}: {:?} eligible={} units={:?}",
            parcel.parcel_id,
            law.law(),
            eligibility.eligible,
            scenario.as_ref().map(|s| s.max_units)
        );
        verdicts.push((eligibility, scenario));
    }

    // Density bonus: once per eligible base scenario.
    let bases: Vec<&DevelopmentScenario> = verdicts
        .iter()
        .filter_map(|(_, s)| s.as_ref())
        .filter(|s| s.law.accepts_density_bonus())
        .collect();
    let largest_base = bases.iter().map(|s| s.max_units).max().unwrap_or(0);
    let bonus_eligibility = density_bonus_eligibility(&ctx, largest_base, proposed);
    let mut stacked: Vec<DevelopmentScenario> = Vec::new();
    let mut unstacked: Vec<LawOutcome> = Vec::new();
    for base in &bases {
        match apply_density_bonus(&ctx, base, parcel, proposed) {
            Some(s) => stacked.push(s),
            None => unstacked.push(unstacked_outcome(&ctx, base, proposed)),
        }
    }
    bevy::log::debug!(
        "{}: density bonus stacked on {} of {} base scenario(s)",
        parcel.parcel_id,
        stacked.len(),
        bases.len()
    );

    // Unknown-zone note as resolved; base zoning already carries it.
    let zone_note = standards
        .unknown_zone
        .then(|| standards.notes.first().cloned())
        .flatten();
    let annotate_one = |s: &DevelopmentScenario| {
        let mut out = annotate_with(s, parcel, &params.context);
        if let Some(note) = &zone_note {
            if !out.notes.contains(note) {
                out.notes.push(note.clone());
            }
        }
        out
    };

    let mut outcomes = Vec::new();
    let mut scenarios = Vec::new();
    let mut eligibility = Vec::new();
    for (verdict, scenario) in verdicts {
        let annotated = scenario.as_ref().map(annotate_one);
        outcomes.push(LawOutcome::from_generation(&verdict, annotated.clone()));
        scenarios.extend(annotated);
        eligibility.push(verdict);
    }
    if stacked.is_empty() {
        outcomes.push(LawOutcome::Ineligible {
            law: Law::DensityBonus,
            reasons: bonus_eligibility.reasons.clone(),
        });
    } else {
        // Bases too small to stack on while a larger one did.
        outcomes.extend(unstacked);
    }
    for s in &stacked {
        let annotated = annotate_one(s);
        outcomes.push(LawOutcome::Eligible(annotated.clone()));
        scenarios.push(annotated);
    }
    eligibility.push(bonus_eligibility);
    eligibility.push(transit_parking_eligibility(parcel, params));

    let mut notes = Vec::new();
    if parcel.lot_area_sqft <= 0.0 {
        notes.push("Lot area is zero; every law yields zero capacity".to_string());
    }
    if scenarios.is_empty() {
        notes.push("No law produced a buildable scenario".to_string());
    }

    let recommendation = recommend(&scenarios, proposed);
    let scenarios = rank_scenarios(&scenarios, proposed);

    Ok(AnalysisReport {
        request_id: request.request_id.clone(),
        parcel_id: parcel.parcel_id.clone(),
        standards,
        eligibility,
        outcomes,
        scenarios,
        recommendation,
        notes,
    })
}

/// Why `base` produced no density-bonus variant, with its reasons prefixed by
/// the base scenario's name.
fn unstacked_outcome(
    ctx: &LawContext,
    base: &DevelopmentScenario,
    proposed: Option<&ProposedProjectOptions>,
) -> LawOutcome {
    let verdict = density_bonus_eligibility(ctx, base.max_units, proposed);
    let mut reasons: Vec<String> = if verdict.eligible {
        Vec::new()
    } else {
        verdict
            .reasons
            .iter()
            .map(|r| format!("{}: {r}", base.name))
            .collect()
    };
    if reasons.is_empty() {
        reasons.push(format!("{}: no density bonus variant produced", base.name));
    }
    LawOutcome::Ineligible {
        law: Law::DensityBonus,
        reasons,
    }
}
