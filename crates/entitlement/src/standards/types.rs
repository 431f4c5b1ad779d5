//! Law-independent physical envelope types.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::parcel::SQFT_PER_ACRE;

// =============================================================================
// ZoneCategory
// =============================================================================

/// Broad use category of a base zone; the law gates key off this.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Encode, Decode,
)]
pub enum ZoneCategory {
    SingleFamily,
    MultiFamily,
    MixedUse,
    Commercial,
    Office,
    Industrial,
    OpenSpace,
    Civic,
    /// Zone code not present in the standards table.
    #[default]
    Unknown,
}

impl ZoneCategory {
    /// Whether base zoning permits any residential use.
    ///
    /// `Unknown` is treated as the most restrictive residential zone rather
    /// than as a prohibition, so the caller still sees a warned, minimal
    /// capacity.
    pub fn permits_residential(self) -> bool {
        matches!(
            self,
            ZoneCategory::SingleFamily
                | ZoneCategory::MultiFamily
                | ZoneCategory::MixedUse
                | ZoneCategory::Commercial
                | ZoneCategory::Unknown
        )
    }

    /// Whether base zoning permits multifamily housing.
    pub fn permits_multifamily(self) -> bool {
        matches!(
            self,
            ZoneCategory::MultiFamily | ZoneCategory::MixedUse | ZoneCategory::Commercial
        )
    }

    /// Commercial, office and mixed-use zones (the non-residential corridor zones).
    pub fn is_commercial_corridor_zone(self) -> bool {
        matches!(
            self,
            ZoneCategory::Commercial | ZoneCategory::Office | ZoneCategory::MixedUse
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            ZoneCategory::SingleFamily => "single-family residential",
            ZoneCategory::MultiFamily => "multifamily residential",
            ZoneCategory::MixedUse => "mixed-use",
            ZoneCategory::Commercial => "commercial",
            ZoneCategory::Office => "office",
            ZoneCategory::Industrial => "industrial",
            ZoneCategory::OpenSpace => "open space",
            ZoneCategory::Civic => "civic / public lands",
            ZoneCategory::Unknown => "unknown",
        }
    }
}

// =============================================================================
// DensityLimit
// =============================================================================

/// How a zone caps the number of dwelling units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub enum DensityLimit {
    /// Dwelling units per acre of lot area.
    PerAcre(f64),
    /// Fixed number of units per lot regardless of size.
    PerLot(u32),
    /// No unit cap; units follow from permitted floor area.
    FloorAreaBased,
}

impl DensityLimit {
    /// Whole units permitted on a lot, rounded down.
    ///
    /// `gross_sqft_per_unit` converts floor area into units for
    /// floor-area-based zones. A zero or negative lot area always yields zero.
    pub fn unit_capacity(self, lot_area_sqft: f64, max_far: f64, gross_sqft_per_unit: f64) -> u32 {
        if lot_area_sqft <= 0.0 {
            return 0;
        }
        match self {
            DensityLimit::PerAcre(du_per_acre) => {
                floor_units(lot_area_sqft / SQFT_PER_ACRE * du_per_acre)
            }
            DensityLimit::PerLot(units) => units,
            DensityLimit::FloorAreaBased => {
                if gross_sqft_per_unit <= 0.0 {
                    return 0;
                }
                floor_units(lot_area_sqft * max_far / gross_sqft_per_unit)
            }
        }
    }
}

/// Round a fractional unit count down; negative and NaN become zero.
pub fn floor_units(raw: f64) -> u32 {
    if raw.is_finite() && raw > 0.0 {
        let rounded = raw.round();
        if (raw - rounded).abs() < 1e-9 {
            rounded as u32
        } else {
            raw.floor() as u32
        }
    } else {
        0
    }
}

/// Round a fractional count up; negative and NaN become zero.
pub fn ceil_units(raw: f64) -> u32 {
    if raw.is_finite() && raw > 0.0 {
        // Absorb float noise such as 20.0 * 0.15 = 3.0000000000000004.
        let rounded = raw.round();
        if (raw - rounded).abs() < 1e-9 {
            rounded as u32
        } else {
            raw.ceil() as u32
        }
    } else {
        0
    }
}

// =============================================================================
// Setbacks
// =============================================================================

/// Required yard depths, in feet.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Encode, Decode)]
pub struct Setbacks {
    pub front_ft: f64,
    pub side_ft: f64,
    pub rear_ft: f64,
}

// =============================================================================
// DevelopmentStandards (the standards bundle)
// =============================================================================

/// Resolved envelope for a parcel before any statute is applied.
///
/// Produced by [`super::StandardsTables::resolve_base_standards`] and widened
/// (never narrowed) by [`super::StandardsTables::apply_overlays`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct DevelopmentStandards {
    pub zone_code: String,
    pub category: ZoneCategory,
    pub density: DensityLimit,
    pub max_far: f64,
    pub max_height_ft: f64,
    pub max_stories: u32,
    pub parking_per_unit: f64,
    pub setbacks: Setbacks,
    pub max_lot_coverage_pct: f64,
    /// Zone code was not found in the table; conservative defaults applied.
    pub unknown_zone: bool,
    /// FAR added by overlays on top of the base zone.
    pub overlay_far_bonus: f64,
    /// Height added by overlays on top of the base zone, in feet.
    pub overlay_height_bonus_ft: f64,
    /// Overlay codes that contributed (including zero-bonus ones).
    pub applied_overlays: Vec<String>,
    pub notes: Vec<String>,
}

impl DevelopmentStandards {
    /// Floor area permitted by FAR on a lot, in sqft.
    pub fn max_building_sqft(&self, lot_area_sqft: f64) -> f64 {
        if lot_area_sqft <= 0.0 {
            return 0.0;
        }
        (lot_area_sqft * self.max_far).max(0.0)
    }

    /// As-of-right unit capacity on a lot, rounded down.
    pub fn unit_capacity(&self, lot_area_sqft: f64, gross_sqft_per_unit: f64) -> u32 {
        self.density
            .unit_capacity(lot_area_sqft, self.max_far, gross_sqft_per_unit)
    }

    /// Height of the base zone before any overlay bonus.
    pub fn base_zone_height_ft(&self) -> f64 {
        (self.max_height_ft - self.overlay_height_bonus_ft).max(0.0)
    }
}
