//! As-of-right capacity under the local zoning code.

use crate::parcel::{ParcelAttributes, ProposedProjectOptions};
use crate::scenario::{
    estimate_buildable_sqft, parking_spaces, DevelopmentScenario, EligibilityFacts,
    EligibilityResult, GateChecks, Law,
};
use crate::standards::{DensityLimit, DevelopmentStandards};
use crate::transit_parking::apply_transit_parking_override;

use super::{scenario_id, HousingLaw, LawContext};

pub struct BaseZoningLaw;

impl HousingLaw for BaseZoningLaw {
    fn law(&self) -> Law {
        Law::BaseZoning
    }

    fn is_eligible(
        &self,
        ctx: &LawContext,
        parcel: &ParcelAttributes,
        standards: &DevelopmentStandards,
        proposed: Option<&ProposedProjectOptions>,
    ) -> EligibilityResult {
        let gross_per_unit = ctx.params.capacity.gross_sqft_per_unit(proposed);
        let units = standards.unit_capacity(parcel.lot_area_sqft, gross_per_unit);
        let facts = EligibilityFacts {
            base_units: Some(units),
            ..Default::default()
        };

        let mut checks = GateChecks::default();
        if !standards.category.permits_residential() {
            checks.block(format!(
                "Zone {} ({}) does not permit residential use",
                standards.zone_code,
                standards.category.label()
            ));
        }
        if parcel.lot_area_sqft <= 0.0 {
            checks.block("Lot area is zero; no development capacity");
        } else if units == 0 && standards.category.permits_residential() {
            checks.block(format!(
                "Zone {} density limit yields zero units on a {:.0} sqft lot",
                standards.zone_code, parcel.lot_area_sqft
            ));
        }
        if !checks.is_blocked() {
            checks.note(format!(
                "Zone {} permits {units} unit(s) by right ({})",
                standards.zone_code,
                describe_density(standards.density)
            ));
        }
        if standards.unknown_zone {
            checks.note("Zone code not recognized; conservative single-family defaults applied");
        }
        EligibilityResult::from_checks(Law::BaseZoning, checks, facts)
    }

    fn generate_scenario(
        &self,
        ctx: &LawContext,
        parcel: &ParcelAttributes,
        standards: &DevelopmentStandards,
        eligibility: &EligibilityResult,
        proposed: Option<&ProposedProjectOptions>,
    ) -> Option<DevelopmentScenario> {
        if !eligibility.eligible {
            return None;
        }
        let gross_per_unit = ctx.params.capacity.gross_sqft_per_unit(proposed);
        let units = eligibility
            .facts
            .base_units
            .unwrap_or_else(|| standards.unit_capacity(parcel.lot_area_sqft, gross_per_unit));

        let mut scenario = DevelopmentScenario::new(
            scenario_id(parcel, Law::BaseZoning),
            format!("Base zoning ({})", standards.zone_code),
            Law::BaseZoning,
        );
        scenario.max_units = units;
        scenario.max_building_sqft = standards.max_building_sqft(parcel.lot_area_sqft);
        scenario.max_height_ft = standards.max_height_ft;
        scenario.max_stories = standards.max_stories;
        scenario.parking_spaces_required = parking_spaces(units, standards.parking_per_unit);
        scenario.setbacks = standards.setbacks;
        scenario.lot_coverage_pct = standards.max_lot_coverage_pct;
        scenario.estimated_buildable_sqft = estimate_buildable_sqft(
            parcel.lot_area_sqft,
            scenario.max_building_sqft,
            standards.max_lot_coverage_pct,
            standards.max_stories,
        );
        scenario.overlay_height_bonus_ft = standards.overlay_height_bonus_ft;

        scenario.notes.push(format!(
            "{units} unit(s) from {} under zone {}",
            describe_density(standards.density),
            standards.zone_code
        ));
        scenario.notes.push(format!(
            "Floor area {:.0} sqft at FAR {:.2}; height {:.0} ft",
            scenario.max_building_sqft, standards.max_far, standards.max_height_ft
        ));
        scenario.notes.extend(standards.notes.iter().cloned());

        scenario.enforce_invariants();
        Some(apply_transit_parking_override(scenario, parcel, ctx.params))
    }
}

fn describe_density(density: DensityLimit) -> String {
    match density {
        DensityLimit::PerAcre(du) => format!("{du:.0} du/acre"),
        DensityLimit::PerLot(n) => format!("{n} unit(s) per lot"),
        DensityLimit::FloorAreaBased => "floor-area-based density".to_string(),
    }
}
