//! Data-driven engine parameters.
//!
//! Statutory thresholds are configuration data expected to be revised, so every
//! tunable the laws read lives in the [`EngineParams`] resource instead of in
//! module constants. The defaults reflect current Santa Monica practice; a
//! deployment can override any subset from JSON with
//! [`EngineParams::from_json_str`].

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::parcel::ProposedProjectOptions;

// ---------------------------------------------------------------------------
// Height stacking policy
// ---------------------------------------------------------------------------

/// How a density-bonus height increase combines with an overlay height bonus.
///
/// Left open by the rule sources, so it is an explicit policy choice rather
/// than a silent default.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Encode, Decode,
)]
pub enum HeightStackingPolicy {
    /// The density-bonus increase is computed on top of the overlay-widened
    /// height.
    #[default]
    Additive,
    /// The density-bonus increase is computed from the base-zone height, and
    /// the greater of that and the overlay-widened height applies.
    GreaterOf,
}

impl HeightStackingPolicy {
    pub fn label(self) -> &'static str {
        match self {
            HeightStackingPolicy::Additive => "additive (density bonus applied over overlay height)",
            HeightStackingPolicy::GreaterOf => "greater-of (overlay height vs density-bonus height)",
        }
    }
}

// ---------------------------------------------------------------------------
// Capacity
// ---------------------------------------------------------------------------

/// Conversions between floor area and unit counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityParams {
    /// Gross floor area of a studio including circulation, in sqft.
    pub base_unit_sqft: f64,
    /// Additional gross floor area per bedroom, in sqft.
    pub sqft_per_bedroom: f64,
    /// Average bedrooms assumed when the proposal does not say.
    pub default_avg_bedrooms: f64,
    /// Floor-to-floor height used to convert feet to stories.
    pub story_height_ft: f64,
}

impl Default for CapacityParams {
    fn default() -> Self {
        Self {
            base_unit_sqft: 650.0,
            sqft_per_bedroom: 250.0,
            default_avg_bedrooms: 1.0,
            story_height_ft: 10.0,
        }
    }
}

impl CapacityParams {
    /// Gross sqft one unit consumes, from the proposal's average bedrooms.
    pub fn gross_sqft_per_unit(&self, proposed: Option<&ProposedProjectOptions>) -> f64 {
        let bedrooms = proposed
            .and_then(|p| p.avg_bedrooms)
            .unwrap_or(self.default_avg_bedrooms)
            .max(0.0);
        self.base_unit_sqft + bedrooms * self.sqft_per_bedroom
    }

    /// Whole stories that fit under `height_ft`.
    pub fn stories_for_height(&self, height_ft: f64) -> u32 {
        if height_ft <= 0.0 || self.story_height_ft <= 0.0 {
            return 0;
        }
        (height_ft / self.story_height_ft).floor() as u32
    }
}

// ---------------------------------------------------------------------------
// Per-law parameters
// ---------------------------------------------------------------------------

/// Lot-split / duplex law (SB 9).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LotSplitParams {
    pub min_resulting_lot_sqft: f64,
    pub max_resulting_lots: u32,
    pub units_per_lot: u32,
    /// Absolute ceiling per original lot, independent of base zoning.
    pub max_units_per_original_lot: u32,
    /// Floor area a unit is always entitled to, in sqft.
    pub min_unit_floor_area_sqft: f64,
    /// Height that objective standards may not reduce a unit below.
    pub min_height_ft: f64,
    pub side_rear_setback_ft: f64,
    pub parking_per_unit: f64,
}

impl Default for LotSplitParams {
    fn default() -> Self {
        Self {
            min_resulting_lot_sqft: 1_200.0,
            max_resulting_lots: 2,
            units_per_lot: 2,
            max_units_per_original_lot: 4,
            min_unit_floor_area_sqft: 800.0,
            min_height_ft: 16.0,
            side_rear_setback_ft: 4.0,
            parking_per_unit: 1.0,
        }
    }
}

/// Streamlined ministerial approval law (SB 35).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamlinedParams {
    pub prevailing_wage_min_units: u32,
    pub skilled_workforce_min_units: u32,
    pub exclude_coastal_zone: bool,
}

impl Default for StreamlinedParams {
    fn default() -> Self {
        Self {
            prevailing_wage_min_units: 10,
            skilled_workforce_min_units: 75,
            exclude_coastal_zone: true,
        }
    }
}

/// Commercial-corridor conversion law (AB 2011).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorridorParams {
    pub min_row_width_ft: f64,
    pub max_row_width_ft: f64,
    /// Mixed-income set-aside for rental projects, in percent.
    pub mixed_income_rental_pct: f64,
    /// Mixed-income set-aside for for-sale projects, in percent.
    pub mixed_income_for_sale_pct: f64,
    /// Projects at or above this size must use a skilled and trained workforce.
    pub skilled_workforce_min_units: u32,
}

impl Default for CorridorParams {
    fn default() -> Self {
        Self {
            min_row_width_ft: 70.0,
            max_row_width_ft: 150.0,
            mixed_income_rental_pct: 15.0,
            mixed_income_for_sale_pct: 30.0,
            skilled_workforce_min_units: 50,
        }
    }
}

/// State density bonus law (Gov. Code 65915).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityBonusParams {
    /// Smallest base project the bonus applies to.
    pub min_base_units: u32,
    pub height_bonus_ft: f64,
    pub height_multiplier: f64,
    pub full_affordable_height_bonus_ft: f64,
    pub full_affordable_height_multiplier: f64,
    /// Parking ceiling per 0-1 bedroom unit.
    pub parking_cap_zero_to_one_bedroom: f64,
    /// Parking ceiling per 2-3 bedroom unit.
    pub parking_cap_two_to_three_bedroom: f64,
    /// Parking ceiling per 4+ bedroom unit.
    pub parking_cap_four_plus_bedroom: f64,
}

impl Default for DensityBonusParams {
    fn default() -> Self {
        Self {
            min_base_units: 5,
            height_bonus_ft: 11.0,
            height_multiplier: 1.25,
            full_affordable_height_bonus_ft: 33.0,
            full_affordable_height_multiplier: 1.5,
            parking_cap_zero_to_one_bedroom: 1.0,
            parking_cap_two_to_three_bedroom: 1.5,
            parking_cap_four_plus_bedroom: 2.5,
        }
    }
}

/// Transit parking reduction (AB 2097).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitParams {
    pub radius_miles: f64,
}

impl Default for TransitParams {
    fn default() -> Self {
        Self { radius_miles: 0.5 }
    }
}

/// Thresholds for the context annotator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextParams {
    /// CNEL above which a residential use needs acoustic mitigation.
    pub noise_threshold_cnel_db: f64,
}

impl Default for ContextParams {
    fn default() -> Self {
        Self {
            noise_threshold_cnel_db: 65.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level EngineParams resource
// ---------------------------------------------------------------------------

/// Central resource holding every tunable the engine reads.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineParams {
    pub capacity: CapacityParams,
    pub lot_split: LotSplitParams,
    pub streamlined: StreamlinedParams,
    pub corridor: CorridorParams,
    pub density_bonus: DensityBonusParams,
    pub transit: TransitParams,
    pub context: ContextParams,
    pub height_stacking: HeightStackingPolicy,
}

impl EngineParams {
    /// Parse parameters from JSON; omitted fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let params: EngineParams = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Reject values that would break the engine's numeric invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("capacity.base_unit_sqft", self.capacity.base_unit_sqft),
            ("capacity.sqft_per_bedroom", self.capacity.sqft_per_bedroom),
            ("lot_split.min_resulting_lot_sqft", self.lot_split.min_resulting_lot_sqft),
            ("lot_split.min_unit_floor_area_sqft", self.lot_split.min_unit_floor_area_sqft),
            ("lot_split.parking_per_unit", self.lot_split.parking_per_unit),
            ("density_bonus.height_bonus_ft", self.density_bonus.height_bonus_ft),
            (
                "density_bonus.full_affordable_height_bonus_ft",
                self.density_bonus.full_affordable_height_bonus_ft,
            ),
            ("transit.radius_miles", self.transit.radius_miles),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue(format!("{name} must be >= 0, got {value}")));
            }
        }
        if self.capacity.base_unit_sqft <= 0.0 {
            return Err(ConfigError::InvalidValue(
                "capacity.base_unit_sqft must be > 0".to_string(),
            ));
        }
        if self.density_bonus.height_multiplier < 1.0
            || self.density_bonus.full_affordable_height_multiplier < 1.0
        {
            return Err(ConfigError::InvalidValue(
                "density bonus height multipliers must be >= 1.0".to_string(),
            ));
        }
        if self.corridor.min_row_width_ft > self.corridor.max_row_width_ft {
            return Err(ConfigError::InvalidValue(
                "corridor.min_row_width_ft exceeds corridor.max_row_width_ft".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
