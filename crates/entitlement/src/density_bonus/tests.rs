//! Unit tests for the bonus schedule, gate and stacker.

use super::*;
use crate::engine_params::{EngineParams, HeightStackingPolicy};
use crate::laws::{JurisdictionStatus, LawContext};
use crate::parcel::{IncomeLevel, OwnershipType, ParcelAttributes, ProposedProjectOptions, UnitMix};
use crate::scenario::{DevelopmentScenario, Law};
use crate::standards::StandardsTables;

struct Fixture {
    params: EngineParams,
    tables: StandardsTables,
    jurisdiction: JurisdictionStatus,
}

impl Fixture {
    fn new() -> Self {
        Self {
            params: EngineParams::default(),
            tables: StandardsTables::default(),
            jurisdiction: JurisdictionStatus::default(),
        }
    }

    fn ctx(&self) -> LawContext<'_> {
        LawContext {
            params: &self.params,
            tables: &self.tables,
            jurisdiction: &self.jurisdiction,
        }
    }
}

fn base_scenario(law: Law, units: u32) -> DevelopmentScenario {
    let mut s = DevelopmentScenario::new("p:base", "Base zoning (R3)", law);
    s.max_units = units;
    s.max_building_sqft = 9_000.0;
    s.estimated_buildable_sqft = Some(8_000.0);
    s.max_height_ft = 40.0;
    s.max_stories = 4;
    s.parking_spaces_required = 15;
    s
}

fn proposal(pct: f64, level: IncomeLevel) -> ProposedProjectOptions {
    ProposedProjectOptions {
        target_affordable_pct: Some(pct),
        income_level: Some(level),
        ..Default::default()
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

// -------------------------------------------------------------------------
// Schedule
// -------------------------------------------------------------------------

#[test]
fn test_schedule_very_low_bands() {
    let schedule = DensityBonusSchedule::default();
    assert!(schedule.lookup(IncomeLevel::VeryLow, 4.9).is_none());
    let at5 = schedule.lookup(IncomeLevel::VeryLow, 5.0).unwrap();
    assert!(approx(at5.bonus_pct, 20.0));
    assert_eq!(at5.concessions, 1);
    let at15 = schedule.lookup(IncomeLevel::VeryLow, 15.0).unwrap();
    assert!(approx(at15.bonus_pct, 50.0));
    assert_eq!(at15.concessions, 3);
    // Fractions fall into the band below.
    assert!(approx(schedule.lookup(IncomeLevel::VeryLow, 10.9).unwrap().bonus_pct, 32.5));
    // Above the top band the bonus stays at the maximum.
    assert!(approx(schedule.lookup(IncomeLevel::VeryLow, 30.0).unwrap().bonus_pct, 50.0));
}

#[test]
fn test_schedule_low_and_moderate_tops() {
    let schedule = DensityBonusSchedule::default();
    assert!(approx(schedule.lookup(IncomeLevel::Low, 24.0).unwrap().bonus_pct, 50.0));
    assert!(schedule.lookup(IncomeLevel::Low, 9.0).is_none());
    assert!(approx(schedule.lookup(IncomeLevel::Moderate, 10.0).unwrap().bonus_pct, 5.0));
    assert!(approx(schedule.lookup(IncomeLevel::Moderate, 44.0).unwrap().bonus_pct, 50.0));
}

#[test]
fn test_schedule_is_monotonic() {
    let schedule = DensityBonusSchedule::default();
    assert!(schedule.validate().is_ok());
    for level in [IncomeLevel::VeryLow, IncomeLevel::Low, IncomeLevel::Moderate] {
        let mut previous = 0.0;
        for pct in 0..=100 {
            if let Some(found) = schedule.lookup(level, f64::from(pct)) {
                assert!(found.bonus_pct >= previous, "{level:?} at {pct}");
                assert!(found.concessions <= schedule.max_concessions);
                previous = found.bonus_pct;
            }
        }
    }
}

#[test]
fn test_full_affordability_gets_eighty_and_four() {
    let schedule = DensityBonusSchedule::default();
    let found = schedule.lookup(IncomeLevel::Low, 100.0).unwrap();
    assert!(found.fully_affordable);
    assert!(approx(found.bonus_pct, 80.0));
    assert_eq!(found.concessions, 4);
}

#[test]
fn test_non_monotonic_schedule_rejected() {
    let mut schedule = DensityBonusSchedule::default();
    schedule.low.bonus_bands[3].bonus_pct = 5.0;
    assert!(schedule.validate().is_err());
}

// -------------------------------------------------------------------------
// Gate
// -------------------------------------------------------------------------

#[test]
fn test_gate_without_proposal_is_ineligible() {
    let fx = Fixture::new();
    let result = density_bonus_eligibility(&fx.ctx(), 10, None);
    assert!(!result.eligible);
    assert!(!result.reasons.is_empty());
}

#[test]
fn test_gate_requires_minimum_base_units() {
    let fx = Fixture::new();
    let p = proposal(15.0, IncomeLevel::VeryLow);
    assert!(!density_bonus_eligibility(&fx.ctx(), 4, Some(&p)).eligible);
    assert!(density_bonus_eligibility(&fx.ctx(), 5, Some(&p)).eligible);
}

#[test]
fn test_gate_moderate_only_for_sale() {
    let fx = Fixture::new();
    let mut p = proposal(20.0, IncomeLevel::Moderate);
    let result = density_bonus_eligibility(&fx.ctx(), 10, Some(&p));
    assert!(!result.eligible);
    assert!(result.reasons.iter().any(|r| r.contains("for-sale")));

    p.ownership = OwnershipType::ForSale;
    let result = density_bonus_eligibility(&fx.ctx(), 10, Some(&p));
    assert!(result.eligible);
    assert_eq!(result.facts.bonus_pct, Some(15.0));
}

#[test]
fn test_gate_below_first_band() {
    let fx = Fixture::new();
    let p = proposal(8.0, IncomeLevel::Low);
    let result = density_bonus_eligibility(&fx.ctx(), 10, Some(&p));
    assert!(!result.eligible);
    assert!(result.reasons.iter().any(|r| r.contains("minimum")));
}

// -------------------------------------------------------------------------
// Stacker
// -------------------------------------------------------------------------

#[test]
fn test_fifteen_percent_very_low_on_ten_units() {
    let fx = Fixture::new();
    let base = base_scenario(Law::BaseZoning, 10);
    let p = proposal(15.0, IncomeLevel::VeryLow);
    let stacked = apply_density_bonus(&fx.ctx(), &base, &ParcelAttributes::default(), Some(&p))
        .expect("qualifies");
    assert_eq!(stacked.max_units, 15);
    assert_eq!(stacked.law, Law::DensityBonus);
    assert_eq!(stacked.id, "p:base+density_bonus");
    assert!(approx(stacked.max_building_sqft, 13_500.0));
    assert_eq!(stacked.estimated_buildable_sqft, Some(12_000.0));
    // min(40 + 11, 40 * 1.25) = 50.
    assert!(approx(stacked.max_height_ft, 50.0));
    assert_eq!(stacked.max_stories, 5);
    // ceil(10 * 15%) = 2 restricted units.
    assert_eq!(stacked.affordable_units_required, 2);
    // One-bedroom default caps parking at 1.0 space per unit, under the base 1.5.
    assert_eq!(stacked.parking_spaces_required, 15);
    let grant = stacked.density_bonus.expect("grant recorded");
    assert_eq!(grant.bonus_units, 5);
    assert_eq!(grant.concessions, 3);
    assert_eq!(grant.base_scenario_id, "p:base");
}

#[test]
fn test_bonus_units_round_up() {
    let fx = Fixture::new();
    // 7 units at 20% low = 20% bonus = 1.4 -> 2.
    let base = base_scenario(Law::Streamlined, 7);
    let p = proposal(20.0, IncomeLevel::Low);
    let stacked = apply_density_bonus(&fx.ctx(), &base, &ParcelAttributes::default(), Some(&p))
        .expect("qualifies");
    assert!(approx(stacked.density_bonus.as_ref().unwrap().bonus_pct, 35.0));
    // 7 * 35% = 2.45 -> 3.
    assert_eq!(stacked.max_units, 10);
}

#[test]
fn test_lot_split_base_is_not_stacked() {
    let fx = Fixture::new();
    let base = base_scenario(Law::LotSplit, 10);
    let p = proposal(15.0, IncomeLevel::VeryLow);
    assert!(apply_density_bonus(&fx.ctx(), &base, &ParcelAttributes::default(), Some(&p)).is_none());
}

#[test]
fn test_fully_affordable_stack() {
    let fx = Fixture::new();
    let base = base_scenario(Law::CorridorConversion, 10);
    let p = ProposedProjectOptions {
        target_affordable_pct: Some(100.0),
        ..Default::default()
    };
    let stacked = apply_density_bonus(&fx.ctx(), &base, &ParcelAttributes::default(), Some(&p))
        .expect("qualifies");
    assert_eq!(stacked.max_units, 18);
    assert_eq!(stacked.affordable_units_required, 18);
    // min(40 + 33, 40 * 1.5) = 60.
    assert!(approx(stacked.max_height_ft, 60.0));
    assert_eq!(stacked.density_bonus.unwrap().concessions, 4);
    assert!(stacked.labor.prevailing_wage);
}

#[test]
fn test_bonus_height_is_the_lesser_cap() {
    let params = EngineParams::default().density_bonus;
    for h in [0.0, 10.0, 28.0, 39.0, 44.0, 45.0, 60.0, 85.0] {
        let got = bonus_height(h, params.height_bonus_ft, params.height_multiplier);
        let expected = (h + params.height_bonus_ft).min(h * params.height_multiplier);
        assert!(approx(got, expected), "height {h}");
        assert!(got <= h + params.height_bonus_ft);
        assert!(got <= h * params.height_multiplier);
    }
}

#[test]
fn test_greater_of_policy_with_overlay_height() {
    let mut fx = Fixture::new();
    let mut base = base_scenario(Law::BaseZoning, 10);
    base.max_height_ft = 60.0;
    base.overlay_height_bonus_ft = 21.0;
    let p = proposal(15.0, IncomeLevel::VeryLow);

    let additive = apply_density_bonus(&fx.ctx(), &base, &ParcelAttributes::default(), Some(&p))
        .expect("qualifies");
    assert!(approx(additive.max_height_ft, 71.0));

    fx.params.height_stacking = HeightStackingPolicy::GreaterOf;
    let greater = apply_density_bonus(&fx.ctx(), &base, &ParcelAttributes::default(), Some(&p))
        .expect("qualifies");
    // Zone height 39: min(50, 48.75) = 48.75 < overlay height 60.
    assert!(approx(greater.max_height_ft, 60.0));
    assert!(greater.notes.iter().any(|n| n.contains("greater-of")));
    assert_eq!(
        greater.density_bonus.unwrap().height_policy,
        HeightStackingPolicy::GreaterOf
    );
}

#[test]
fn test_parking_cap_from_unit_mix() {
    let fx = Fixture::new();
    let base = base_scenario(Law::BaseZoning, 10);
    let mut p = proposal(15.0, IncomeLevel::VeryLow);
    p.unit_mix = Some(UnitMix {
        zero_to_one_bedroom: 0.5,
        two_to_three_bedroom: 0.5,
        four_plus_bedroom: 0.0,
    });
    let stacked = apply_density_bonus(&fx.ctx(), &base, &ParcelAttributes::default(), Some(&p))
        .expect("qualifies");
    // 15 units * 1.25 = 18.75 -> 19.
    assert_eq!(stacked.parking_spaces_required, 19);
}

#[test]
fn test_parking_cap_from_average_bedrooms() {
    let params = EngineParams::default();
    let mut p = ProposedProjectOptions::default();
    p.avg_bedrooms = Some(2.0);
    assert!(approx(
        parking_cap_per_unit(&params.density_bonus, &params.capacity, &p),
        1.5
    ));
    p.avg_bedrooms = Some(4.0);
    assert!(approx(
        parking_cap_per_unit(&params.density_bonus, &params.capacity, &p),
        2.5
    ));
}

#[test]
fn test_parking_cap_never_raises_base_ratio() {
    let fx = Fixture::new();
    let mut base = base_scenario(Law::BaseZoning, 10);
    base.parking_spaces_required = 5;
    let mut p = proposal(15.0, IncomeLevel::VeryLow);
    p.avg_bedrooms = Some(2.0);
    let stacked = apply_density_bonus(&fx.ctx(), &base, &ParcelAttributes::default(), Some(&p))
        .expect("qualifies");
    // Base 0.5/unit is under the 1.5 cap: 15 units * 0.5 = 7.5 -> 8.
    assert_eq!(stacked.parking_spaces_required, 8);
    assert!(stacked.notes.iter().any(|n| n.contains("Parking kept at the base")));
}

#[test]
fn test_transit_override_applies_after_cap() {
    let fx = Fixture::new();
    let base = base_scenario(Law::Streamlined, 10);
    let mut parcel = ParcelAttributes::default();
    parcel.context.transit_distance_miles = Some(0.25);
    parcel.context.qualifying_transit_stop = true;
    let p = proposal(15.0, IncomeLevel::VeryLow);
    let stacked = apply_density_bonus(&fx.ctx(), &base, &parcel, Some(&p)).expect("qualifies");
    assert_eq!(stacked.parking_spaces_required, 0);
}

#[test]
fn test_base_scenario_untouched() {
    let fx = Fixture::new();
    let base = base_scenario(Law::BaseZoning, 10);
    let before = base.clone();
    let p = proposal(15.0, IncomeLevel::VeryLow);
    let _ = apply_density_bonus(&fx.ctx(), &base, &ParcelAttributes::default(), Some(&p));
    assert_eq!(base, before);
}
