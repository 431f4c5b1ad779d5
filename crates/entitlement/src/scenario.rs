//! Scenario and eligibility types shared by every law.
//!
//! A [`DevelopmentScenario`] is the engine's output unit: one buildable
//! envelope under one legal basis. An [`EligibilityResult`] is the verdict a
//! gate hands to its generator, and [`LawOutcome`] is the tagged form of
//! "scenario or reasons" that reports carry.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::engine_params::HeightStackingPolicy;
use crate::parcel::{CorridorTier, IncomeLevel};
use crate::standards::{ceil_units, Setbacks};

// =============================================================================
// Law
// =============================================================================

/// Legal basis a scenario or eligibility verdict is computed under.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Encode,
    Decode,
)]
pub enum Law {
    BaseZoning,
    LotSplit,
    Streamlined,
    CorridorConversion,
    DensityBonus,
    TransitParking,
}

impl Law {
    pub const ALL: [Law; 6] = [
        Law::BaseZoning,
        Law::LotSplit,
        Law::Streamlined,
        Law::CorridorConversion,
        Law::DensityBonus,
        Law::TransitParking,
    ];

    /// Statutory citation carried on every scenario.
    pub fn citation(self) -> &'static str {
        match self {
            Law::BaseZoning => "Santa Monica Municipal Code, Article 9 (Zoning Ordinance)",
            Law::LotSplit => "Gov. Code §§ 65852.21, 66411.7 (SB 9)",
            Law::Streamlined => "Gov. Code § 65913.4 (SB 35)",
            Law::CorridorConversion => "Gov. Code § 65912.100 et seq. (AB 2011)",
            Law::DensityBonus => "Gov. Code § 65915 (State Density Bonus Law)",
            Law::TransitParking => "Gov. Code § 65863.2 (AB 2097)",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Law::BaseZoning => "Base zoning",
            Law::LotSplit => "SB 9 lot split / duplex",
            Law::Streamlined => "SB 35 streamlined ministerial approval",
            Law::CorridorConversion => "AB 2011 commercial corridor housing",
            Law::DensityBonus => "State density bonus",
            Law::TransitParking => "AB 2097 transit parking reduction",
        }
    }

    /// Short identifier used in scenario ids.
    pub fn slug(self) -> &'static str {
        match self {
            Law::BaseZoning => "base_zoning",
            Law::LotSplit => "lot_split",
            Law::Streamlined => "streamlined",
            Law::CorridorConversion => "corridor",
            Law::DensityBonus => "density_bonus",
            Law::TransitParking => "transit_parking",
        }
    }

    /// Whether a density bonus may be stacked on a scenario under this law.
    pub fn accepts_density_bonus(self) -> bool {
        matches!(
            self,
            Law::BaseZoning | Law::Streamlined | Law::CorridorConversion
        )
    }
}

// =============================================================================
// Scenario
// =============================================================================

/// Informational labor standards attached to a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Encode, Decode)]
pub struct LaborRequirements {
    pub prevailing_wage: bool,
    pub skilled_and_trained_workforce: bool,
}

/// What a density bonus added to its base scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct DensityBonusGrant {
    pub base_scenario_id: String,
    pub income_level: Option<IncomeLevel>,
    pub affordable_pct: f64,
    pub bonus_pct: f64,
    pub bonus_units: u32,
    pub concessions: u32,
    pub fully_affordable: bool,
    pub height_policy: HeightStackingPolicy,
}

/// One buildable envelope under one legal basis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct DevelopmentScenario {
    pub id: String,
    pub name: String,
    pub law: Law,
    pub citation: String,
    pub max_units: u32,
    pub max_building_sqft: f64,
    pub max_height_ft: f64,
    pub max_stories: u32,
    pub parking_spaces_required: u32,
    pub affordable_units_required: u32,
    pub setbacks: Setbacks,
    pub lot_coverage_pct: f64,
    /// Floor area that fits the coverage and story limits, when it can be
    /// estimated; never more than `max_building_sqft`.
    pub estimated_buildable_sqft: Option<f64>,
    pub labor: LaborRequirements,
    pub density_bonus: Option<DensityBonusGrant>,
    /// Set by the annotator.
    pub net_new_units: Option<u32>,
    pub nonconforming: bool,
    /// Height contributed by overlays, carried for the density-bonus height policy.
    pub overlay_height_bonus_ft: f64,
    pub notes: Vec<String>,
}

impl DevelopmentScenario {
    /// Empty scenario under `law` with its citation filled in.
    pub fn new(id: impl Into<String>, name: impl Into<String>, law: Law) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            law,
            citation: law.citation().to_string(),
            max_units: 0,
            max_building_sqft: 0.0,
            max_height_ft: 0.0,
            max_stories: 0,
            parking_spaces_required: 0,
            affordable_units_required: 0,
            setbacks: Setbacks::default(),
            lot_coverage_pct: 0.0,
            estimated_buildable_sqft: None,
            labor: LaborRequirements::default(),
            density_bonus: None,
            net_new_units: None,
            nonconforming: false,
            overlay_height_bonus_ft: 0.0,
            notes: Vec::new(),
        }
    }

    /// Buildable area per required parking space; infinite with no parking.
    pub fn area_per_parking_space(&self) -> f64 {
        let area = self.effective_buildable_sqft();
        if self.parking_spaces_required == 0 {
            f64::INFINITY
        } else {
            area / f64::from(self.parking_spaces_required)
        }
    }

    /// Estimated buildable area, falling back to the FAR envelope.
    pub fn effective_buildable_sqft(&self) -> f64 {
        self.estimated_buildable_sqft
            .unwrap_or(self.max_building_sqft)
            .max(0.0)
    }

    /// Clamp numeric fields so the scenario invariants hold: non-negative
    /// area and height, affordable units never above total units.
    pub fn enforce_invariants(&mut self) {
        self.max_building_sqft = finite_non_negative(self.max_building_sqft);
        self.max_height_ft = finite_non_negative(self.max_height_ft);
        self.lot_coverage_pct = finite_non_negative(self.lot_coverage_pct);
        self.estimated_buildable_sqft = self
            .estimated_buildable_sqft
            .map(|sqft| finite_non_negative(sqft).min(self.max_building_sqft));
        self.affordable_units_required = self.affordable_units_required.min(self.max_units);
    }
}

fn finite_non_negative(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

/// Parking spaces for `units` at `per_unit`, rounded up.
pub fn parking_spaces(units: u32, per_unit: f64) -> u32 {
    ceil_units(f64::from(units) * per_unit)
}

/// Affordable units for `units` at `pct` percent, rounded up and capped at `units`.
pub fn affordable_units(units: u32, pct: f64) -> u32 {
    ceil_units(f64::from(units) * pct / 100.0).min(units)
}

/// Density-bonus units on `base_units` at `bonus_pct` percent, rounded up.
pub fn ceil_bonus_units(base_units: u32, bonus_pct: f64) -> u32 {
    ceil_units(f64::from(base_units) * bonus_pct / 100.0)
}

/// Floor area that fits under both the FAR envelope and coverage times stories.
pub fn estimate_buildable_sqft(
    lot_area_sqft: f64,
    max_building_sqft: f64,
    lot_coverage_pct: f64,
    stories: u32,
) -> Option<f64> {
    if lot_area_sqft <= 0.0 || stories == 0 || lot_coverage_pct <= 0.0 {
        return None;
    }
    let footprint = lot_area_sqft * (lot_coverage_pct / 100.0).min(1.0);
    Some((footprint * f64::from(stories)).min(max_building_sqft))
}

// =============================================================================
// Eligibility
// =============================================================================

/// Law-specific numbers a gate derives for its generator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Encode, Decode)]
pub struct EligibilityFacts {
    /// Affordability percentage the generator must use.
    pub affordable_pct: Option<f64>,
    pub income_level: Option<IncomeLevel>,
    pub bonus_pct: Option<f64>,
    pub concessions: Option<u32>,
    pub fully_affordable: bool,
    pub resulting_lots: Option<u32>,
    pub corridor_tier: Option<CorridorTier>,
    pub transit_distance_miles: Option<f64>,
    /// As-of-right units the gate computed.
    pub base_units: Option<u32>,
}

/// Per-law verdict. `reasons` is populated for both outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct EligibilityResult {
    pub law: Law,
    pub eligible: bool,
    pub reasons: Vec<String>,
    pub facts: EligibilityFacts,
}

impl EligibilityResult {
    pub fn eligible(law: Law, reasons: Vec<String>, facts: EligibilityFacts) -> Self {
        Self {
            law,
            eligible: true,
            reasons,
            facts,
        }
    }

    pub fn ineligible(law: Law, reasons: Vec<String>, facts: EligibilityFacts) -> Self {
        Self {
            law,
            eligible: false,
            reasons,
            facts,
        }
    }

    /// Build a verdict from accumulated blocking and informational reasons:
    /// eligible iff nothing blocked.
    pub fn from_checks(law: Law, checks: GateChecks, facts: EligibilityFacts) -> Self {
        let eligible = checks.blocking.is_empty();
        let mut reasons = checks.blocking;
        reasons.extend(checks.info);
        Self {
            law,
            eligible,
            reasons,
            facts,
        }
    }
}

/// Accumulator gates use so every failing condition is reported, not just the first.
#[derive(Debug, Clone, Default)]
pub struct GateChecks {
    pub blocking: Vec<String>,
    pub info: Vec<String>,
}

impl GateChecks {
    pub fn block(&mut self, reason: impl Into<String>) {
        self.blocking.push(reason.into());
    }

    pub fn note(&mut self, reason: impl Into<String>) {
        self.info.push(reason.into());
    }

    pub fn is_blocked(&self) -> bool {
        !self.blocking.is_empty()
    }
}

// =============================================================================
// LawOutcome
// =============================================================================

/// Tagged "scenario or reasons" result for one law.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LawOutcome {
    Eligible(DevelopmentScenario),
    Ineligible { law: Law, reasons: Vec<String> },
}

impl LawOutcome {
    /// Pair a generator's output with the verdict that produced it.
    pub fn from_generation(
        eligibility: &EligibilityResult,
        scenario: Option<DevelopmentScenario>,
    ) -> Self {
        match scenario {
            Some(scenario) => LawOutcome::Eligible(scenario),
            None => LawOutcome::Ineligible {
                law: eligibility.law,
                reasons: eligibility.reasons.clone(),
            },
        }
    }

    pub fn law(&self) -> Law {
        match self {
            LawOutcome::Eligible(scenario) => scenario.law,
            LawOutcome::Ineligible { law, .. } => *law,
        }
    }

    pub fn scenario(&self) -> Option<&DevelopmentScenario> {
        match self {
            LawOutcome::Eligible(scenario) => Some(scenario),
            LawOutcome::Ineligible { .. } => None,
        }
    }
}
