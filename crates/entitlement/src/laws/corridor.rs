//! AB 2011 housing on commercial corridors.
//!
//! Commercial, office and mixed-use parcels fronting a qualifying corridor may
//! build housing at or above a tier-dependent density and height floor,
//! provided the project is fully affordable or meets the mixed-income
//! set-aside. The tier itself is an upstream input.

use serde::{Deserialize, Serialize};

use crate::parcel::{CorridorTier, OwnershipType, ParcelAttributes, ProposedProjectOptions};
use crate::scenario::{
    affordable_units, estimate_buildable_sqft, parking_spaces, DevelopmentScenario,
    EligibilityFacts, EligibilityResult, GateChecks, LaborRequirements, Law,
};
use crate::standards::{floor_units, DevelopmentStandards};
use crate::transit_parking::apply_transit_parking_override;

use super::{check_environmental, scenario_id, HousingLaw, LawContext};

// =============================================================================
// Tier floors
// =============================================================================

/// Density and height floors guaranteed on a corridor of one tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorridorTierFloor {
    pub tier: CorridorTier,
    pub min_density_du_per_acre: f64,
    pub min_height_ft: f64,
}

pub fn builtin_corridor_floors() -> Vec<CorridorTierFloor> {
    [(30.0, 35.0), (40.0, 45.0), (60.0, 55.0), (80.0, 65.0)]
        .into_iter()
        .zip(CorridorTier::ALL)
        .map(|((density, height), tier)| CorridorTierFloor {
            tier,
            min_density_du_per_acre: density,
            min_height_ft: height,
        })
        .collect()
}

/// Floor for `tier`, looked up by tier rather than position.
pub fn floor_for_tier(floors: &[CorridorTierFloor], tier: CorridorTier) -> Option<CorridorTierFloor> {
    floors.iter().find(|f| f.tier == tier).copied()
}

/// Mixed-income set-aside for the ownership type, in percent.
fn mixed_income_pct(ctx: &LawContext, ownership: OwnershipType) -> f64 {
    match ownership {
        OwnershipType::Rental => ctx.params.corridor.mixed_income_rental_pct,
        OwnershipType::ForSale | OwnershipType::Mixed => ctx.params.corridor.mixed_income_for_sale_pct,
    }
}

/// Corridor capacity as `(units, base_units, tier_units)`: the greater of the
/// zone's own capacity and the tier floor.
fn corridor_units(
    ctx: &LawContext,
    parcel: &ParcelAttributes,
    standards: &DevelopmentStandards,
    floor: CorridorTierFloor,
    proposed: Option<&ProposedProjectOptions>,
) -> (u32, u32, u32) {
    let gross_per_unit = ctx.params.capacity.gross_sqft_per_unit(proposed);
    let base_units = standards.unit_capacity(parcel.lot_area_sqft, gross_per_unit);
    let tier_units = floor_units(parcel.lot_area_acres() * floor.min_density_du_per_acre);
    (base_units.max(tier_units), base_units, tier_units)
}

// =============================================================================
// Law
// =============================================================================

pub struct CorridorConversionLaw;

impl HousingLaw for CorridorConversionLaw {
    fn law(&self) -> Law {
        Law::CorridorConversion
    }

    fn is_eligible(
        &self,
        ctx: &LawContext,
        parcel: &ParcelAttributes,
        standards: &DevelopmentStandards,
        proposed: Option<&ProposedProjectOptions>,
    ) -> EligibilityResult {
        let p = &ctx.params.corridor;
        let c = &parcel.constraints;
        let mut checks = GateChecks::default();

        if !standards.category.is_commercial_corridor_zone() {
            checks.block(format!(
                "Zone {} is {}; only commercial, office or mixed-use zones qualify",
                standards.zone_code,
                standards.category.label()
            ));
        }
        if parcel.lot_area_sqft <= 0.0 {
            checks.block("Lot area is zero; no development capacity");
        }

        let floor = parcel
            .corridor_tier
            .and_then(|tier| floor_for_tier(&ctx.tables.corridor_floors, tier));
        match (parcel.corridor_tier, floor) {
            (None, _) => checks.block("Corridor tier not supplied; corridor eligibility cannot be confirmed"),
            (Some(tier), None) => checks.block(format!("No density floor configured for {}", tier.label())),
            (Some(tier), Some(f)) => checks.note(format!(
                "{} corridor: at least {:.0} du/acre and {:.0} ft",
                tier.label(),
                f.min_density_du_per_acre,
                f.min_height_ft
            )),
        }
        if let Some(f) = floor {
            if parcel.lot_area_sqft > 0.0 && corridor_units(ctx, parcel, standards, f, proposed).0 == 0 {
                checks.block(format!(
                    "Neither zone {} nor the {:.0} du/acre floor yields a unit on a {:.0} sqft lot",
                    standards.zone_code, f.min_density_du_per_acre, parcel.lot_area_sqft
                ));
            }
        }

        match parcel.context.street_row_width_ft {
            Some(w) if w < p.min_row_width_ft || w > p.max_row_width_ft => checks.block(format!(
                "Street right-of-way of {w:.0} ft is outside the {:.0}-{:.0} ft corridor range",
                p.min_row_width_ft, p.max_row_width_ft
            )),
            Some(w) => checks.note(format!("Street right-of-way of {w:.0} ft qualifies")),
            None => checks.note("Street right-of-way width unknown; verify it is 70-150 ft"),
        }

        if c.historic {
            checks.block("Historic property or within a historic district");
        }
        check_environmental(&mut checks, c);

        let ownership = proposed.map(|p| p.ownership).unwrap_or_default();
        let fully_affordable = proposed.is_some_and(|p| p.is_fully_affordable());
        let required = if fully_affordable {
            100.0
        } else {
            mixed_income_pct(ctx, ownership)
        };
        let target = proposed.and_then(|p| p.target_affordable_pct);
        match target {
            Some(t) if t < required => checks.block(format!(
                "Proposed {t:.0}% affordable is below the {required:.0}% mixed-income requirement"
            )),
            _ if fully_affordable => checks.note("100% affordable project"),
            _ => checks.note(format!("Mixed-income project with {required:.0}% affordable units")),
        }

        let facts = EligibilityFacts {
            affordable_pct: Some(target.map_or(required, |t| t.max(required))),
            fully_affordable,
            corridor_tier: parcel.corridor_tier,
            ..Default::default()
        };
        EligibilityResult::from_checks(Law::CorridorConversion, checks, facts)
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
        let tier = eligibility.facts.corridor_tier?;
        let floor = floor_for_tier(&ctx.tables.corridor_floors, tier)?;
        let gross_per_unit = ctx.params.capacity.gross_sqft_per_unit(proposed);

        let (units, base_units, tier_units) = corridor_units(ctx, parcel, standards, floor, proposed);
        let height = standards.max_height_ft.max(floor.min_height_ft);
        let stories = standards
            .max_stories
            .max(ctx.params.capacity.stories_for_height(height));
        let far_area = standards.max_building_sqft(parcel.lot_area_sqft);
        let area = far_area.max(f64::from(units) * gross_per_unit);
        let pct = eligibility.facts.affordable_pct.unwrap_or(100.0);

        let mut scenario = DevelopmentScenario::new(
            scenario_id(parcel, Law::CorridorConversion),
            format!("AB 2011 corridor housing ({})", tier.label()),
            Law::CorridorConversion,
        );
        scenario.max_units = units;
        scenario.max_building_sqft = area;
        scenario.max_height_ft = height;
        scenario.max_stories = stories;
        scenario.parking_spaces_required = parking_spaces(units, standards.parking_per_unit);
        scenario.affordable_units_required = affordable_units(units, pct);
        scenario.setbacks = standards.setbacks;
        scenario.lot_coverage_pct = standards.max_lot_coverage_pct;
        scenario.estimated_buildable_sqft = estimate_buildable_sqft(
            parcel.lot_area_sqft,
            area,
            standards.max_lot_coverage_pct,
            stories,
        );
        scenario.overlay_height_bonus_ft = standards.overlay_height_bonus_ft;
        scenario.labor = LaborRequirements {
            prevailing_wage: true,
            skilled_and_trained_workforce: units >= ctx.params.corridor.skilled_workforce_min_units,
        };

        if tier_units > base_units {
            scenario.notes.push(format!(
                "{} density floor of {:.0} du/acre raises capacity from {base_units} to {units} units",
                tier.label(),
                floor.min_density_du_per_acre
            ));
        } else {
            scenario.notes.push(format!(
                "Base zoning capacity of {units} units meets the {} density floor",
                tier.label()
            ));
        }
        if floor.min_height_ft > standards.max_height_ft {
            scenario.notes.push(format!(
                "{} height floor raises height to {:.0} ft",
                tier.label(),
                floor.min_height_ft
            ));
        }
        scenario.notes.push(format!(
            "{} affordable unit(s) at {pct:.0}%; prevailing wages required",
            scenario.affordable_units_required
        ));

        scenario.enforce_invariants();
        Some(apply_transit_parking_override(scenario, parcel, ctx.params))
    }
}
