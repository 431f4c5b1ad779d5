//! Unit tests for parcel validation and assemblage.

use super::validation::UNIT_MIX_TOLERANCE;
use super::*;
use crate::engine_params::EngineParams;
use crate::error::{AssemblageError, ParcelValidationError};
use crate::transit_parking::transit_parking_eligibility;

fn parcel(id: &str, zone: &str, lot_area_sqft: f64) -> ParcelAttributes {
    ParcelAttributes {
        parcel_id: id.to_string(),
        address: format!("{id} Main St"),
        jurisdiction: "Santa Monica".to_string(),
        lot_area_sqft,
        zone_code: zone.to_string(),
        ..Default::default()
    }
}

// -------------------------------------------------------------------------
// Parcel validation
// -------------------------------------------------------------------------

#[test]
fn test_zero_lot_area_is_structurally_valid() {
    assert!(validate_parcel(&parcel("a", "R1", 0.0)).is_ok());
}

#[test]
fn test_negative_lot_area_rejected() {
    assert_eq!(
        validate_parcel(&parcel("a", "R1", -10.0)),
        Err(ParcelValidationError::InvalidLotArea(-10.0))
    );
}

#[test]
fn test_non_finite_lot_area_rejected() {
    assert!(validate_parcel(&parcel("a", "R1", f64::INFINITY)).is_err());
    assert!(validate_parcel(&parcel("a", "R1", f64::NAN)).is_err());
}

#[test]
fn test_negative_transit_distance_rejected() {
    let mut p = parcel("a", "R1", 5_000.0);
    p.context.transit_distance_miles = Some(-0.1);
    assert!(matches!(
        validate_parcel(&p),
        Err(ParcelValidationError::InvalidMeasurement {
            field: "context.transit_distance_miles",
            ..
        })
    ));
}

#[test]
fn test_development_tier_out_of_range_rejected() {
    let mut p = parcel("a", "MUB", 5_000.0);
    p.development_tier = Some(4);
    assert_eq!(
        validate_parcel(&p),
        Err(ParcelValidationError::InvalidDevelopmentTier(4))
    );
    p.development_tier = Some(3);
    assert!(validate_parcel(&p).is_ok());
}

// -------------------------------------------------------------------------
// Proposal validation
// -------------------------------------------------------------------------

#[test]
fn test_default_proposal_is_valid() {
    assert!(validate_proposed(&ProposedProjectOptions::default()).is_ok());
}

#[test]
fn test_affordability_target_range() {
    let mut proposed = ProposedProjectOptions {
        target_affordable_pct: Some(100.0),
        ..Default::default()
    };
    assert!(validate_proposed(&proposed).is_ok());
    assert!(proposed.is_fully_affordable());

    proposed.target_affordable_pct = Some(120.0);
    assert_eq!(
        validate_proposed(&proposed),
        Err(ParcelValidationError::InvalidAffordabilityTarget(120.0))
    );
}

#[test]
fn test_unit_mix_must_sum_to_one() {
    let mut proposed = ProposedProjectOptions {
        unit_mix: Some(UnitMix {
            zero_to_one_bedroom: 0.5,
            two_to_three_bedroom: 0.3,
            four_plus_bedroom: 0.2,
        }),
        ..Default::default()
    };
    assert!(validate_proposed(&proposed).is_ok());

    proposed.unit_mix = Some(UnitMix {
        zero_to_one_bedroom: 0.5,
        two_to_three_bedroom: 0.3,
        four_plus_bedroom: 0.2 + UNIT_MIX_TOLERANCE * 5.0,
    });
    assert!(matches!(
        validate_proposed(&proposed),
        Err(ParcelValidationError::InvalidUnitMix(_))
    ));
}

#[test]
fn test_negative_unit_mix_share_rejected() {
    let proposed = ProposedProjectOptions {
        unit_mix: Some(UnitMix {
            zero_to_one_bedroom: 1.2,
            two_to_three_bedroom: -0.2,
            four_plus_bedroom: 0.0,
        }),
        ..Default::default()
    };
    assert!(validate_proposed(&proposed).is_err());
}

// -------------------------------------------------------------------------
// Serde defaults
// -------------------------------------------------------------------------

#[test]
fn test_partial_json_parcel_uses_unknown_defaults() {
    let p: ParcelAttributes =
        serde_json::from_str(r#"{"parcel_id": "4281-001-001", "lot_area_sqft": 7000.0, "zone_code": "R1"}"#)
            .expect("partial parcel deserializes");
    assert_eq!(p.constraints.fire_hazard, FireHazardClass::Unknown);
    assert_eq!(p.constraints.rent_control, RentControlStatus::Unknown);
    assert!(!p.constraints.historic);
    assert!(p.overlay_codes.is_empty());
    assert_eq!(p.context.transit_distance_miles, None);
}

#[test]
fn test_unknown_fire_class_is_not_very_high() {
    assert_ne!(FireHazardClass::default(), FireHazardClass::VeryHigh);
    assert_eq!(
        FireHazardClass::Unknown.most_restrictive(FireHazardClass::NotInZone),
        FireHazardClass::Unknown
    );
    assert_eq!(
        FireHazardClass::Unknown.most_restrictive(FireHazardClass::Moderate),
        FireHazardClass::Moderate
    );
}

#[test]
fn test_lot_area_acres() {
    let p = parcel("a", "R1", SQFT_PER_ACRE / 2.0);
    assert!((p.lot_area_acres() - 0.5).abs() < 1e-9);
    assert_eq!(parcel("b", "R1", 0.0).lot_area_acres(), 0.0);
}

// -------------------------------------------------------------------------
// Assemblage
// -------------------------------------------------------------------------

#[test]
fn test_combine_empty_is_error() {
    assert_eq!(combine_parcels(&[]), Err(AssemblageError::Empty));
}

#[test]
fn test_combine_single_returns_clone() {
    let p = parcel("a", "R2", 6_000.0);
    assert_eq!(combine_parcels(std::slice::from_ref(&p)), Ok(p));
}

#[test]
fn test_combine_sums_area_and_existing() {
    let mut a = parcel("a", "R2", 6_000.0);
    a.existing.units = 2;
    a.existing.building_sqft = 1_800.0;
    a.existing.year_built = Some(1962);
    a.lot_width_ft = Some(50.0);
    a.lot_depth_ft = Some(120.0);
    let mut b = parcel("b", "R2", 4_000.0);
    b.existing.units = 1;
    b.existing.building_sqft = 900.0;
    b.existing.year_built = Some(1948);
    b.lot_width_ft = Some(40.0);
    b.lot_depth_ft = Some(100.0);

    let combined = combine_parcels(&[a, b]).expect("two parcels combine");
    assert_eq!(combined.parcel_id, "a+b");
    assert!((combined.lot_area_sqft - 10_000.0).abs() < 1e-9);
    assert_eq!(combined.existing.units, 3);
    assert!((combined.existing.building_sqft - 2_700.0).abs() < 1e-9);
    assert_eq!(combined.existing.year_built, Some(1948));
    assert_eq!(combined.lot_width_ft, Some(90.0));
    assert_eq!(combined.lot_depth_ft, Some(120.0));
    assert!(!combined.is_mixed_zoning());
}

#[test]
fn test_combine_records_mixed_zoning_and_largest_zone() {
    let a = parcel("a", "R2", 3_000.0);
    let b = parcel("b", "MUB", 8_000.0);
    let combined = combine_parcels(&[a, b]).expect("combine");
    assert_eq!(combined.zone_code, "MUB");
    assert_eq!(combined.mixed_zoning, vec!["R2".to_string(), "MUB".to_string()]);
    assert!(combined.is_mixed_zoning());
}

#[test]
fn test_combine_unions_constraints_most_restrictive() {
    let mut a = parcel("a", "R1", 5_000.0);
    a.constraints.fire_hazard = FireHazardClass::Moderate;
    a.constraints.rent_control = RentControlStatus::NotControlled;
    let mut b = parcel("b", "R1", 5_000.0);
    b.constraints.historic = true;
    b.constraints.fire_hazard = FireHazardClass::VeryHigh;
    b.constraints.rent_control = RentControlStatus::Controlled;

    let combined = combine_parcels(&[a, b]).expect("combine");
    assert!(combined.constraints.historic);
    assert_eq!(combined.constraints.fire_hazard, FireHazardClass::VeryHigh);
    assert_eq!(combined.constraints.rent_control, RentControlStatus::Controlled);
}

#[test]
fn test_combine_keeps_nearest_transit_stop() {
    let mut a = parcel("a", "MUB", 5_000.0);
    a.context.transit_distance_miles = Some(0.8);
    a.context.qualifying_transit_stop = false;
    let mut b = parcel("b", "MUB", 5_000.0);
    b.context.transit_distance_miles = Some(0.3);
    b.context.qualifying_transit_stop = true;
    b.context.street_row_width_ft = Some(80.0);

    let combined = combine_parcels(&[a, b]).expect("combine");
    assert_eq!(combined.context.transit_distance_miles, Some(0.3));
    assert!(combined.context.qualifying_transit_stop);
    assert_eq!(combined.context.street_row_width_ft, Some(80.0));
}

#[test]
fn test_combine_prefers_farther_qualifying_stop() {
    let mut a = parcel("a", "MUB", 5_000.0);
    a.context.transit_distance_miles = Some(0.1);
    a.context.qualifying_transit_stop = false;
    let mut b = parcel("b", "MUB", 5_000.0);
    b.context.transit_distance_miles = Some(0.3);
    b.context.qualifying_transit_stop = true;

    let combined = combine_parcels(&[a, b]).expect("combine");
    assert_eq!(combined.context.transit_distance_miles, Some(0.3));
    assert!(combined.context.qualifying_transit_stop);
    let params = EngineParams::default();
    assert!(transit_parking_eligibility(&combined, &params).eligible);
}

#[test]
fn test_combine_unknown_fire_class_beats_not_in_zone() {
    let mut a = parcel("a", "R2", 5_000.0);
    a.constraints.fire_hazard = FireHazardClass::NotInZone;
    let mut b = parcel("b", "R2", 5_000.0);
    b.constraints.fire_hazard = FireHazardClass::Unknown;
    let combined = combine_parcels(&[a.clone(), b]).expect("combine");
    assert_eq!(combined.constraints.fire_hazard, FireHazardClass::Unknown);

    let mut c = parcel("c", "R2", 5_000.0);
    c.constraints.fire_hazard = FireHazardClass::NotInZone;
    let combined = combine_parcels(&[a, c]).expect("combine");
    assert_eq!(combined.constraints.fire_hazard, FireHazardClass::NotInZone);
}

#[test]
fn test_combine_known_rent_control_stays_known() {
    let mut a = parcel("a", "R2", 5_000.0);
    a.constraints.rent_control = RentControlStatus::NotControlled;
    let mut b = parcel("b", "R2", 5_000.0);
    b.constraints.rent_control = RentControlStatus::NotControlled;
    let combined = combine_parcels(&[a, b]).expect("combine");
    assert_eq!(combined.constraints.rent_control, RentControlStatus::NotControlled);
}

#[test]
fn test_combine_corridor_tier_needs_every_member() {
    let mut a = parcel("a", "GC", 5_000.0);
    a.corridor_tier = Some(CorridorTier::Tier3);
    let mut b = parcel("b", "GC", 5_000.0);
    b.corridor_tier = Some(CorridorTier::Tier2);
    let combined = combine_parcels(&[a.clone(), b]).expect("combine");
    assert_eq!(combined.corridor_tier, Some(CorridorTier::Tier2));

    let c = parcel("c", "GC", 5_000.0);
    let combined = combine_parcels(&[a, c]).expect("combine");
    assert_eq!(combined.corridor_tier, None);
}
