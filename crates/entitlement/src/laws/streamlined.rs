//! SB 35 streamlined ministerial approval.

use crate::parcel::{ParcelAttributes, ProposedProjectOptions, RentControlStatus};
use crate::scenario::{
    affordable_units, estimate_buildable_sqft, parking_spaces, DevelopmentScenario,
    EligibilityFacts, EligibilityResult, GateChecks, LaborRequirements, Law,
};
use crate::standards::DevelopmentStandards;
use crate::transit_parking::apply_transit_parking_override;

use super::{check_environmental, scenario_id, HousingLaw, LawContext};

/// Fewest units a streamlined project may contain.
pub const MIN_STREAMLINED_UNITS: u32 = 2;

pub struct StreamlinedLaw;

impl HousingLaw for StreamlinedLaw {
    fn law(&self) -> Law {
        Law::Streamlined
    }

    fn is_eligible(
        &self,
        ctx: &LawContext,
        parcel: &ParcelAttributes,
        standards: &DevelopmentStandards,
        proposed: Option<&ProposedProjectOptions>,
    ) -> EligibilityResult {
        let c = &parcel.constraints;
        let threshold = ctx.jurisdiction.effective_threshold().pct();
        let target = proposed.and_then(|p| p.target_affordable_pct);
        let gross_per_unit = ctx.params.capacity.gross_sqft_per_unit(proposed);
        let units = standards.unit_capacity(parcel.lot_area_sqft, gross_per_unit);

        let mut checks = GateChecks::default();
        if !standards.category.permits_multifamily() {
            checks.block(format!(
                "Zone {} ({}) does not permit multifamily housing",
                standards.zone_code,
                standards.category.label()
            ));
        }
        if parcel.lot_area_sqft <= 0.0 {
            checks.block("Lot area is zero; no development capacity");
        } else if units < MIN_STREAMLINED_UNITS && standards.category.permits_multifamily() {
            checks.block(format!(
                "Objective standards allow {units} unit(s); at least {MIN_STREAMLINED_UNITS} are required"
            ));
        }

        match (ctx.jurisdiction.rhna_threshold, target) {
            (_, Some(t)) if t < threshold => checks.block(format!(
                "Proposed {t:.0}% affordable is below the {threshold:.0}% threshold"
            )),
            (None, _) => checks.note(format!(
                "RHNA progress unknown; conservative {threshold:.0}% affordability threshold applied"
            )),
            (Some(_), _) => checks.note(format!(
                "Jurisdiction RHNA progress sets a {threshold:.0}% affordability threshold"
            )),
        }

        check_environmental(&mut checks, c);
        if c.coastal_zone && ctx.params.streamlined.exclude_coastal_zone {
            checks.block("Site is in the coastal zone");
        }
        if c.historic {
            checks.block("Historic property or within a historic district");
        }
        if c.rent_control == RentControlStatus::Controlled && parcel.existing.units > 0 {
            checks.block(format!(
                "Would demolish {} rent-controlled unit(s)",
                parcel.existing.units
            ));
        } else if c.rent_control == RentControlStatus::Unknown && parcel.existing.units > 0 {
            checks.note("Rent-control status of existing units unknown; verify before demolition");
        }

        let facts = EligibilityFacts {
            affordable_pct: Some(target.map_or(threshold, |t| t.max(threshold))),
            base_units: Some(units),
            ..Default::default()
        };
        EligibilityResult::from_checks(Law::Streamlined, checks, facts)
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
        let p = &ctx.params.streamlined;
        let gross_per_unit = ctx.params.capacity.gross_sqft_per_unit(proposed);
        let units = eligibility
            .facts
            .base_units
            .unwrap_or_else(|| standards.unit_capacity(parcel.lot_area_sqft, gross_per_unit));
        let pct = eligibility
            .facts
            .affordable_pct
            .unwrap_or_else(|| ctx.jurisdiction.effective_threshold().pct());

        let mut scenario = DevelopmentScenario::new(
            scenario_id(parcel, Law::Streamlined),
            "SB 35 streamlined ministerial approval",
            Law::Streamlined,
        );
        scenario.max_units = units;
        scenario.max_building_sqft = standards.max_building_sqft(parcel.lot_area_sqft);
        scenario.max_height_ft = standards.max_height_ft;
        scenario.max_stories = standards.max_stories;
        scenario.parking_spaces_required = parking_spaces(units, standards.parking_per_unit);
        scenario.affordable_units_required = affordable_units(units, pct);
        scenario.setbacks = standards.setbacks;
        scenario.lot_coverage_pct = standards.max_lot_coverage_pct;
        scenario.estimated_buildable_sqft = estimate_buildable_sqft(
            parcel.lot_area_sqft,
            scenario.max_building_sqft,
            standards.max_lot_coverage_pct,
            standards.max_stories,
        );
        scenario.overlay_height_bonus_ft = standards.overlay_height_bonus_ft;
        scenario.labor = LaborRequirements {
            prevailing_wage: units >= p.prevailing_wage_min_units,
            skilled_and_trained_workforce: units >= p.skilled_workforce_min_units,
        };

        scenario.notes.push(format!(
            "Ministerial approval under objective standards: {units} unit(s), {} affordable at {pct:.0}%",
            scenario.affordable_units_required
        ));
        if scenario.labor.prevailing_wage {
            scenario.notes.push(format!(
                "Prevailing wages required ({} or more units)",
                p.prevailing_wage_min_units
            ));
        }
        if scenario.labor.skilled_and_trained_workforce {
            scenario.notes.push(format!(
                "Skilled and trained workforce required ({} or more units)",
                p.skilled_workforce_min_units
            ));
        }

        scenario.enforce_invariants();
        Some(apply_transit_parking_override(scenario, parcel, ctx.params))
    }
}
