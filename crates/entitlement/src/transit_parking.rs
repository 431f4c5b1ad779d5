//! Transit parking reduction (AB 2097).
//!
//! Not a generator. The gate decides whether the parcel is near a qualifying
//! stop, and the override zeroes required parking on any scenario that comes
//! through it. Every generator and the density-bonus stacker finish by calling
//! [`apply_transit_parking_override`].

use crate::engine_params::EngineParams;
use crate::parcel::ParcelAttributes;
use crate::scenario::{DevelopmentScenario, EligibilityFacts, EligibilityResult, GateChecks, Law};

/// Whether the parcel is within the transit radius of a qualifying stop.
pub fn transit_parking_eligibility(
    parcel: &ParcelAttributes,
    params: &EngineParams,
) -> EligibilityResult {
    let radius = params.transit.radius_miles;
    let distance = parcel.context.transit_distance_miles;
    let facts = EligibilityFacts {
        transit_distance_miles: distance,
        ..Default::default()
    };

    let mut checks = GateChecks::default();
    match distance {
        None => checks.block("Distance to transit unknown; no parking reduction assumed"),
        Some(d) if d > radius => checks.block(format!(
            "Nearest transit stop is {d:.2} mi away, beyond the {radius:.2} mi radius"
        )),
        Some(d) => {
            if parcel.context.qualifying_transit_stop {
                checks.note(format!(
                    "Within {d:.2} mi of a major transit stop ({radius:.2} mi radius); no minimum parking may be imposed"
                ));
            } else {
                checks.block(format!(
                    "Stop {d:.2} mi away is not a major transit stop"
                ));
            }
        }
    }
    EligibilityResult::from_checks(Law::TransitParking, checks, facts)
}

/// Zero the scenario's required parking when the parcel qualifies; otherwise
/// return it unchanged.
pub fn apply_transit_parking_override(
    mut scenario: DevelopmentScenario,
    parcel: &ParcelAttributes,
    params: &EngineParams,
) -> DevelopmentScenario {
    if !transit_parking_eligibility(parcel, params).eligible {
        return scenario;
    }
    let citation = Law::TransitParking.citation();
    if scenario.parking_spaces_required > 0 {
        scenario.notes.push(format!(
            "Parking minimum of {} spaces waived near transit ({})",
            scenario.parking_spaces_required,
            citation
        ));
    } else if !scenario.notes.iter().any(|n| n.contains(citation)) {
        scenario
            .notes
            .push(format!("No minimum parking near transit ({citation})"));
    }
    scenario.parking_spaces_required = 0;
    scenario
}
