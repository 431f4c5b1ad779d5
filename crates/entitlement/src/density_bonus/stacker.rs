//! Stack a density bonus on an already-generated base scenario.
//!
//! The stacker is a combinator: it runs once per eligible base scenario and
//! yields at most one bonus variant of it. It never touches the base scenario.

use crate::engine_params::{CapacityParams, DensityBonusParams, HeightStackingPolicy};
use crate::laws::LawContext;
use crate::parcel::{ParcelAttributes, ProposedProjectOptions};
use crate::scenario::{
    affordable_units, ceil_bonus_units, parking_spaces, DensityBonusGrant, DevelopmentScenario,
    LaborRequirements, Law,
};
use crate::transit_parking::apply_transit_parking_override;

use super::gate::density_bonus_eligibility;

// =============================================================================
// Pure helpers
// =============================================================================

/// Height after a density-bonus increase: the lesser of the additive and the
/// multiplicative cap.
pub fn bonus_height(base_height_ft: f64, additive_ft: f64, multiplier: f64) -> f64 {
    let base = base_height_ft.max(0.0);
    (base + additive_ft).min(base * multiplier)
}

/// Maximum parking per unit for the proposed bedroom mix.
///
/// A unit mix weights each bucket's cap by its share. Without one, the
/// average bedroom count picks a single bucket.
pub fn parking_cap_per_unit(
    params: &DensityBonusParams,
    capacity: &CapacityParams,
    proposed: &ProposedProjectOptions,
) -> f64 {
    if let Some(mix) = proposed.unit_mix {
        let total = mix.total_share();
        if total > 0.0 {
            return (mix.zero_to_one_bedroom * params.parking_cap_zero_to_one_bedroom
                + mix.two_to_three_bedroom * params.parking_cap_two_to_three_bedroom
                + mix.four_plus_bedroom * params.parking_cap_four_plus_bedroom)
                / total;
        }
    }
    let bedrooms = proposed
        .avg_bedrooms
        .unwrap_or(capacity.default_avg_bedrooms);
    if bedrooms <= 1.0 {
        params.parking_cap_zero_to_one_bedroom
    } else if bedrooms <= 3.0 {
        params.parking_cap_two_to_three_bedroom
    } else {
        params.parking_cap_four_plus_bedroom
    }
}

// =============================================================================
// Stacker
// =============================================================================

/// Bonus variant of `base`, or `None` when the base law does not accept a
/// bonus or the proposal does not qualify.
pub fn apply_density_bonus(
    ctx: &LawContext,
    base: &DevelopmentScenario,
    parcel: &ParcelAttributes,
    proposed: Option<&ProposedProjectOptions>,
) -> Option<DevelopmentScenario> {
    if !base.law.accepts_density_bonus() {
        return None;
    }
    let eligibility = density_bonus_eligibility(ctx, base.max_units, proposed);
    if !eligibility.eligible {
        return None;
    }
    let proposed = proposed?;
    let facts = &eligibility.facts;
    let bonus_pct = facts.bonus_pct?;
    let affordable_pct = facts.affordable_pct?;
    let params = &ctx.params.density_bonus;

    let base_units = base.max_units;
    let bonus_units = ceil_bonus_units(base_units, bonus_pct);
    let total_units = base_units.saturating_add(bonus_units);
    let scale = f64::from(total_units) / f64::from(base_units.max(1));

    // Height.
    let (additive, multiplier) = if facts.fully_affordable {
        (
            params.full_affordable_height_bonus_ft,
            params.full_affordable_height_multiplier,
        )
    } else {
        (params.height_bonus_ft, params.height_multiplier)
    };
    let policy = ctx.params.height_stacking;
    let height = match policy {
        HeightStackingPolicy::Additive => bonus_height(base.max_height_ft, additive, multiplier),
        HeightStackingPolicy::GreaterOf => {
            let zone_height = (base.max_height_ft - base.overlay_height_bonus_ft).max(0.0);
            bonus_height(zone_height, additive, multiplier).max(base.max_height_ft)
        }
    };
    let added_stories = ctx
        .params
        .capacity
        .stories_for_height(height - base.max_height_ft);

    let cap = parking_cap_per_unit(params, &ctx.params.capacity, proposed);
    let parking_ratio = base_parking_ratio(base).map_or(cap, |ratio| ratio.min(cap));

    let mut scenario = base.clone();
    scenario.id = format!("{}+{}", base.id, Law::DensityBonus.slug());
    scenario.name = format!("{} + density bonus", base.name);
    scenario.law = Law::DensityBonus;
    scenario.citation = format!("{}; {}", base.citation, Law::DensityBonus.citation());
    scenario.max_units = total_units;
    scenario.max_building_sqft = base.max_building_sqft * scale;
    scenario.estimated_buildable_sqft = base.estimated_buildable_sqft.map(|sqft| sqft * scale);
    scenario.max_height_ft = height;
    scenario.max_stories = base.max_stories.saturating_add(added_stories);
    scenario.parking_spaces_required = parking_spaces(total_units, parking_ratio);
    scenario.affordable_units_required = if facts.fully_affordable {
        total_units
    } else {
        base.affordable_units_required
            .max(affordable_units(base_units, affordable_pct))
    };
    scenario.labor = stacked_labor(ctx, base, total_units);
    scenario.net_new_units = None;
    scenario.nonconforming = false;
    scenario.density_bonus = Some(DensityBonusGrant {
        base_scenario_id: base.id.clone(),
        income_level: facts.income_level,
        affordable_pct,
        bonus_pct,
        bonus_units,
        concessions: facts.concessions.unwrap_or(0),
        fully_affordable: facts.fully_affordable,
        height_policy: policy,
    });

    let transit_citation = Law::TransitParking.citation();
    scenario.notes = base
        .notes
        .iter()
        .filter(|n| !n.contains(transit_citation))
        .cloned()
        .collect();
    scenario.notes.push(format!(
        "{bonus_pct:.2}% density bonus on {base_units} base units: +{bonus_units} (rounded up)"
    ));
    scenario.notes.push(format!(
        "Height {:.1} ft: lesser of +{additive:.0} ft and x{multiplier:.2}",
        height
    ));
    if base.overlay_height_bonus_ft > 0.0 {
        scenario.notes.push(format!(
            "Overlay contributed {:.0} ft; height stacking policy: {}",
            base.overlay_height_bonus_ft,
            policy.label()
        ));
    }
    if parking_ratio < cap {
        scenario.notes.push(format!(
            "Parking kept at the base {parking_ratio:.2} spaces/unit, under the {cap:.2} bedroom-mix cap"
        ));
    } else {
        scenario.notes.push(format!(
            "Parking capped at {cap:.2} spaces/unit by bedroom mix"
        ));
    }
    if let Some(n) = facts.concessions {
        scenario
            .notes
            .push(format!("{n} concession(s) or incentive(s) available"));
    }

    scenario.enforce_invariants();
    Some(apply_transit_parking_override(scenario, parcel, ctx.params))
}

/// Spaces per unit the base scenario requires, or `None` when it has no
/// units to take a ratio from.
fn base_parking_ratio(base: &DevelopmentScenario) -> Option<f64> {
    (base.max_units > 0)
        .then(|| f64::from(base.parking_spaces_required) / f64::from(base.max_units))
}

/// Labor flags for the larger project, under the base law's thresholds.
fn stacked_labor(ctx: &LawContext, base: &DevelopmentScenario, total_units: u32) -> LaborRequirements {
    match base.law {
        Law::Streamlined => LaborRequirements {
            prevailing_wage: total_units >= ctx.params.streamlined.prevailing_wage_min_units,
            skilled_and_trained_workforce: total_units
                >= ctx.params.streamlined.skilled_workforce_min_units,
        },
        Law::CorridorConversion => LaborRequirements {
            prevailing_wage: true,
            skilled_and_trained_workforce: total_units
                >= ctx.params.corridor.skilled_workforce_min_units,
        },
        _ => base.labor,
    }
}
