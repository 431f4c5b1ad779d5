//! Structural validation run before any law is evaluated.
//!
//! Only shape faults are rejected here. A zero-area lot is structurally valid:
//! it analyses to zero capacity with a note.

use crate::error::ParcelValidationError;

use super::types::{ParcelAttributes, ProposedProjectOptions};

/// Tolerance when checking that unit-mix shares sum to one.
pub const UNIT_MIX_TOLERANCE: f64 = 0.01;

/// Reject parcels whose numeric fields cannot be used in capacity math.
pub fn validate_parcel(parcel: &ParcelAttributes) -> Result<(), ParcelValidationError> {
    if !parcel.lot_area_sqft.is_finite() || parcel.lot_area_sqft < 0.0 {
        return Err(ParcelValidationError::InvalidLotArea(parcel.lot_area_sqft));
    }

    check_optional("lot_width_ft", parcel.lot_width_ft)?;
    check_optional("lot_depth_ft", parcel.lot_depth_ft)?;
    check_measurement("existing.building_sqft", parcel.existing.building_sqft)?;
    check_optional(
        "context.transit_distance_miles",
        parcel.context.transit_distance_miles,
    )?;
    check_optional(
        "context.street_row_width_ft",
        parcel.context.street_row_width_ft,
    )?;
    check_optional("context.noise_cnel_db", parcel.context.noise_cnel_db)?;

    if let Some(tier) = parcel.development_tier {
        if !(1..=3).contains(&tier) {
            return Err(ParcelValidationError::InvalidDevelopmentTier(tier));
        }
    }

    Ok(())
}

/// Reject proposals whose percentages or mix shares are out of range.
pub fn validate_proposed(proposed: &ProposedProjectOptions) -> Result<(), ParcelValidationError> {
    if let Some(pct) = proposed.target_affordable_pct {
        if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
            return Err(ParcelValidationError::InvalidAffordabilityTarget(pct));
        }
    }

    check_optional("avg_bedrooms", proposed.avg_bedrooms)?;

    if let Some(mix) = proposed.unit_mix {
        let shares = [
            mix.zero_to_one_bedroom,
            mix.two_to_three_bedroom,
            mix.four_plus_bedroom,
        ];
        if shares.iter().any(|s| !s.is_finite() || *s < 0.0) {
            return Err(ParcelValidationError::InvalidUnitMix(
                "shares must be finite and non-negative".to_string(),
            ));
        }
        let total = mix.total_share();
        if (total - 1.0).abs() > UNIT_MIX_TOLERANCE {
            return Err(ParcelValidationError::InvalidUnitMix(format!(
                "shares sum to {total:.3}, expected 1.0"
            )));
        }
    }

    Ok(())
}

fn check_measurement(field: &'static str, value: f64) -> Result<(), ParcelValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ParcelValidationError::InvalidMeasurement { field, value })
    }
}

fn check_optional(field: &'static str, value: Option<f64>) -> Result<(), ParcelValidationError> {
    match value {
        Some(v) => check_measurement(field, v),
        None => Ok(()),
    }
}
