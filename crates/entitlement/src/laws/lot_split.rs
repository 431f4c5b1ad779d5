//! SB 9 lot split / duplex.
//!
//! A single-family lot may split once into two lots of a minimum size, each
//! carrying up to two units. The four-unit ceiling per original lot holds no
//! matter what the base zone would allow.

use crate::parcel::{ParcelAttributes, ProposedProjectOptions, RentControlStatus};
use crate::scenario::{
    estimate_buildable_sqft, parking_spaces, DevelopmentScenario, EligibilityFacts,
    EligibilityResult, GateChecks, Law,
};
use crate::standards::{DevelopmentStandards, Setbacks, ZoneCategory};
use crate::transit_parking::apply_transit_parking_override;

use super::{check_environmental, scenario_id, HousingLaw, LawContext};

pub struct LotSplitLaw;

impl LotSplitLaw {
    /// Lots the parcel can become: the configured maximum when both halves
    /// meet the minimum size, otherwise one (duplex only).
    pub fn resulting_lots(ctx: &LawContext, lot_area_sqft: f64) -> u32 {
        let p = &ctx.params.lot_split;
        let needed = p.min_resulting_lot_sqft * f64::from(p.max_resulting_lots);
        if p.max_resulting_lots > 1 && lot_area_sqft >= needed {
            p.max_resulting_lots
        } else {
            1
        }
    }
}

impl HousingLaw for LotSplitLaw {
    fn law(&self) -> Law {
        Law::LotSplit
    }

    fn is_eligible(
        &self,
        ctx: &LawContext,
        parcel: &ParcelAttributes,
        standards: &DevelopmentStandards,
        _proposed: Option<&ProposedProjectOptions>,
    ) -> EligibilityResult {
        let p = &ctx.params.lot_split;
        let mut checks = GateChecks::default();
        let c = &parcel.constraints;

        if standards.category != ZoneCategory::SingleFamily {
            checks.block(format!(
                "Zone {} is {}, not a single-family zone",
                standards.zone_code,
                standards.category.label()
            ));
        } else {
            checks.note(format!("Zone {} is single-family residential", standards.zone_code));
        }
        if parcel.lot_area_sqft <= 0.0 {
            checks.block("Lot area is zero; no development capacity");
        }
        if c.historic {
            checks.block("Historic property or within a historic district");
        }
        match c.rent_control {
            RentControlStatus::Controlled => {
                checks.block("Would alter or demolish rent-controlled housing")
            }
            RentControlStatus::Unknown => checks.note(
                "Rent-control status unknown; verify no rent-controlled units would be demolished",
            ),
            RentControlStatus::NotControlled => {}
        }
        if c.ellis_act_withdrawal_within_15_years {
            checks.block("Units withdrawn from rental market under the Ellis Act within 15 years");
        }
        if c.tenant_occupied_within_3_years {
            checks.block("Would demolish housing occupied by a tenant within the last 3 years");
        }
        check_environmental(&mut checks, c);

        let lots = Self::resulting_lots(ctx, parcel.lot_area_sqft);
        if !checks.is_blocked() {
            if lots > 1 {
                checks.note(format!(
                    "Lot of {:.0} sqft can split into {lots} lots of at least {:.0} sqft",
                    parcel.lot_area_sqft, p.min_resulting_lot_sqft
                ));
            } else {
                checks.note(format!(
                    "Lot under {:.0} sqft cannot split; duplex on the existing lot only",
                    p.min_resulting_lot_sqft * f64::from(p.max_resulting_lots)
                ));
            }
        }
        if c.coastal_zone {
            checks.note("Coastal zone: a coastal development permit is still required");
        }

        let facts = EligibilityFacts {
            resulting_lots: Some(lots),
            ..Default::default()
        };
        EligibilityResult::from_checks(Law::LotSplit, checks, facts)
    }

    fn generate_scenario(
        &self,
        ctx: &LawContext,
        parcel: &ParcelAttributes,
        standards: &DevelopmentStandards,
        eligibility: &EligibilityResult,
        _proposed: Option<&ProposedProjectOptions>,
    ) -> Option<DevelopmentScenario> {
        if !eligibility.eligible {
            return None;
        }
        let p = &ctx.params.lot_split;
        let lots = eligibility
            .facts
            .resulting_lots
            .unwrap_or_else(|| Self::resulting_lots(ctx, parcel.lot_area_sqft));
        let units = lots
            .saturating_mul(p.units_per_lot)
            .min(p.max_units_per_original_lot);

        let far_area = standards.max_building_sqft(parcel.lot_area_sqft);
        let unit_floor = f64::from(units) * p.min_unit_floor_area_sqft;
        let height = standards.max_height_ft.max(p.min_height_ft);
        let stories = standards
            .max_stories
            .max(ctx.params.capacity.stories_for_height(height))
            .max(1);

        let mut scenario = DevelopmentScenario::new(
            scenario_id(parcel, Law::LotSplit),
            if lots > 1 {
                "SB 9 lot split with duplexes".to_string()
            } else {
                "SB 9 duplex".to_string()
            },
            Law::LotSplit,
        );
        scenario.max_units = units;
        scenario.max_building_sqft = far_area.max(unit_floor);
        scenario.max_height_ft = height;
        scenario.max_stories = stories;
        scenario.parking_spaces_required = parking_spaces(units, p.parking_per_unit);
        scenario.setbacks = Setbacks {
            front_ft: standards.setbacks.front_ft,
            side_ft: standards.setbacks.side_ft.min(p.side_rear_setback_ft),
            rear_ft: standards.setbacks.rear_ft.min(p.side_rear_setback_ft),
        };
        scenario.lot_coverage_pct = standards.max_lot_coverage_pct;
        scenario.estimated_buildable_sqft = estimate_buildable_sqft(
            parcel.lot_area_sqft,
            scenario.max_building_sqft,
            standards.max_lot_coverage_pct,
            stories,
        )
        .map(|sqft| sqft.max(unit_floor.min(scenario.max_building_sqft)));
        scenario.overlay_height_bonus_ft = standards.overlay_height_bonus_ft;

        scenario.notes.push(format!(
            "{lots} lot(s) x {} units, capped at {} units per original lot",
            p.units_per_lot, p.max_units_per_original_lot
        ));
        if unit_floor > far_area {
            scenario.notes.push(format!(
                "Floor area raised to {:.0} sqft so each unit can reach {:.0} sqft",
                unit_floor, p.min_unit_floor_area_sqft
            ));
        }
        scenario.notes.push(format!(
            "Side and rear setbacks limited to {:.0} ft",
            p.side_rear_setback_ft
        ));

        scenario.enforce_invariants();
        Some(apply_transit_parking_override(scenario, parcel, ctx.params))
    }
}
