//! Law Eligibility Gates and Scenario Generators.
//!
//! Each statute is a unit struct implementing [`HousingLaw`]: a pure gate
//! (`is_eligible`) that always explains itself, and a generator
//! (`generate_scenario`) that returns `None` exactly when the gate said no.
//! Generators are mutually independent and may run in any order.
//!
//! - [`base_zoning`]: as-of-right capacity under the local zoning code
//! - [`lot_split`]: SB 9 lot split / duplex
//! - [`streamlined`]: SB 35 streamlined ministerial approval
//! - [`corridor`]: AB 2011 commercial-corridor housing

pub mod base_zoning;
pub mod corridor;
pub mod lot_split;
pub mod streamlined;


use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::engine_params::EngineParams;
use crate::parcel::{FireHazardClass, ParcelAttributes, ProposedProjectOptions, SiteConstraints};
use crate::scenario::{DevelopmentScenario, EligibilityResult, GateChecks, Law};
use crate::standards::{DevelopmentStandards, StandardsTables};

pub use base_zoning::BaseZoningLaw;
pub use corridor::{builtin_corridor_floors, CorridorConversionLaw, CorridorTierFloor};
pub use lot_split::LotSplitLaw;
pub use streamlined::StreamlinedLaw;

// =============================================================================
// Jurisdiction input
// =============================================================================

/// Affordability share a jurisdiction's RHNA progress requires for
/// streamlined approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub enum AffordabilityThreshold {
    /// Jurisdiction has met its above-moderate target but not its lower-income targets.
    TenPercent,
    /// Jurisdiction is behind on lower-income targets.
    FiftyPercent,
}

impl AffordabilityThreshold {
    pub fn pct(self) -> f64 {
        match self {
            AffordabilityThreshold::TenPercent => 10.0,
            AffordabilityThreshold::FiftyPercent => 50.0,
        }
    }
}

/// Jurisdiction-level inputs supplied by the RHNA data service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JurisdictionStatus {
    pub rhna_threshold: Option<AffordabilityThreshold>,
}

impl JurisdictionStatus {
    /// Threshold in force; absent data means the conservative 50%.
    pub fn effective_threshold(&self) -> AffordabilityThreshold {
        self.rhna_threshold
            .unwrap_or(AffordabilityThreshold::FiftyPercent)
    }
}

// =============================================================================
// HousingLaw
// =============================================================================

/// Read-only inputs every gate and generator may consult.
#[derive(Clone, Copy)]
pub struct LawContext<'a> {
    pub params: &'a EngineParams,
    pub tables: &'a StandardsTables,
    pub jurisdiction: &'a JurisdictionStatus,
}

/// One statute: a gate plus the generator it feeds.
pub trait HousingLaw: Send + Sync {
    fn law(&self) -> Law;

    /// Pure eligibility predicate. Never panics on validated input and always
    /// returns at least one reason.
    fn is_eligible(
        &self,
        ctx: &LawContext,
        parcel: &ParcelAttributes,
        standards: &DevelopmentStandards,
        proposed: Option<&ProposedProjectOptions>,
    ) -> EligibilityResult;

    /// Scenario for an eligible parcel; `None` iff `eligibility.eligible` is false.
    fn generate_scenario(
        &self,
        ctx: &LawContext,
        parcel: &ParcelAttributes,
        standards: &DevelopmentStandards,
        eligibility: &EligibilityResult,
        proposed: Option<&ProposedProjectOptions>,
    ) -> Option<DevelopmentScenario>;
}

/// Every scenario-generating law, in report order.
pub fn housing_laws() -> [&'static dyn HousingLaw; 4] {
    [
        &BaseZoningLaw,
        &LotSplitLaw,
        &StreamlinedLaw,
        &CorridorConversionLaw,
    ]
}

// =============================================================================
// Shared exclusions
// =============================================================================

/// Environmental and hazard site exclusions shared by the state laws.
///
/// An `Unknown` fire-hazard class never excludes.
pub fn environmental_exclusions(constraints: &SiteConstraints) -> Vec<String> {
    let mut reasons = Vec::new();
    if constraints.wetlands {
        reasons.push("Site contains wetlands".to_string());
    }
    if constraints.protected_habitat {
        reasons.push("Site is habitat for protected species".to_string());
    }
    if constraints.fire_hazard == FireHazardClass::VeryHigh {
        reasons.push("Site is in a very high fire hazard severity zone".to_string());
    }
    if constraints.earthquake_fault_zone {
        reasons.push("Site is in an earthquake fault zone".to_string());
    }
    if constraints.floodway {
        reasons.push("Site is within a regulatory floodway".to_string());
    }
    if constraints.conservation_easement {
        reasons.push("Site is subject to a conservation easement".to_string());
    }
    if constraints.hazardous_waste_site {
        reasons.push("Site is a listed hazardous waste site".to_string());
    }
    reasons
}

/// Block on every shared environmental exclusion, or record that none apply.
pub(crate) fn check_environmental(checks: &mut GateChecks, constraints: &SiteConstraints) {
    let exclusions = environmental_exclusions(constraints);
    if exclusions.is_empty() {
        checks.note("No environmental site exclusions apply");
    }
    for reason in exclusions {
        checks.block(reason);
    }
    if constraints.fire_hazard == FireHazardClass::Unknown {
        checks.note("Fire hazard severity zone unknown; verify before relying on eligibility");
    }
}

/// Scenario id for `law` on `parcel`.
pub(crate) fn scenario_id(parcel: &ParcelAttributes, law: Law) -> String {
    if parcel.parcel_id.is_empty() {
        law.slug().to_string()
    } else {
        format!("{}:{}", parcel.parcel_id, law.slug())
    }
}
