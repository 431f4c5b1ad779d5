//! Base zoning standards, keyed by Santa Monica zoning district code.

use serde::{Deserialize, Serialize};

use super::types::{DensityLimit, DevelopmentStandards, Setbacks, ZoneCategory};

// =============================================================================
// ZoneStandards row
// =============================================================================

/// One row of the base-zone table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneStandards {
    pub category: ZoneCategory,
    pub density: DensityLimit,
    pub max_far: f64,
    pub max_height_ft: f64,
    pub max_stories: u32,
    pub parking_per_unit: f64,
    pub setbacks: Setbacks,
    pub max_lot_coverage_pct: f64,
}

impl ZoneStandards {
    /// Expand a row into a fresh standards bundle for `zone_code`.
    pub fn to_bundle(&self, zone_code: &str) -> DevelopmentStandards {
        DevelopmentStandards {
            zone_code: zone_code.to_string(),
            category: self.category,
            density: self.density,
            max_far: self.max_far,
            max_height_ft: self.max_height_ft,
            max_stories: self.max_stories,
            parking_per_unit: self.parking_per_unit,
            setbacks: self.setbacks,
            max_lot_coverage_pct: self.max_lot_coverage_pct,
            unknown_zone: false,
            overlay_far_bonus: 0.0,
            overlay_height_bonus_ft: 0.0,
            applied_overlays: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// First field that would make capacity math go negative, if any.
    pub fn invalid_field(&self) -> Option<&'static str> {
        let fields = [
            ("max_far", self.max_far),
            ("max_height_ft", self.max_height_ft),
            ("parking_per_unit", self.parking_per_unit),
            ("setbacks.front_ft", self.setbacks.front_ft),
            ("setbacks.side_ft", self.setbacks.side_ft),
            ("setbacks.rear_ft", self.setbacks.rear_ft),
            ("max_lot_coverage_pct", self.max_lot_coverage_pct),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Some(name);
            }
        }
        if let DensityLimit::PerAcre(d) = self.density {
            if !d.is_finite() || d < 0.0 {
                return Some("density");
            }
        }
        None
    }
}

/// Canonical form of a zone or overlay code: trimmed, upper-case, with
/// hyphens, underscores and spaces removed ("r-1" and "R1" are the same zone).
pub fn normalize_code(code: &str) -> String {
    code.trim()
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_uppercase)
        .collect()
}

// =============================================================================
// Conservative defaults for unknown codes
// =============================================================================

/// Envelope applied to an unrecognised zone: the most restrictive residential
/// standards in the table (single-family equivalents).
pub fn conservative_defaults() -> ZoneStandards {
    ZoneStandards {
        category: ZoneCategory::Unknown,
        density: DensityLimit::PerLot(1),
        max_far: 0.5,
        max_height_ft: 28.0,
        max_stories: 2,
        parking_per_unit: 2.0,
        setbacks: Setbacks {
            front_ft: 20.0,
            side_ft: 5.0,
            rear_ft: 25.0,
        },
        max_lot_coverage_pct: 40.0,
    }
}

// =============================================================================
// Built-in table
// =============================================================================

#[allow(clippy::too_many_arguments)]
fn row(
    category: ZoneCategory,
    density: DensityLimit,
    max_far: f64,
    max_height_ft: f64,
    max_stories: u32,
    parking_per_unit: f64,
    setbacks: (f64, f64, f64),
    max_lot_coverage_pct: f64,
) -> ZoneStandards {
    ZoneStandards {
        category,
        density,
        max_far,
        max_height_ft,
        max_stories,
        parking_per_unit,
        setbacks: Setbacks {
            front_ft: setbacks.0,
            side_ft: setbacks.1,
            rear_ft: setbacks.2,
        },
        max_lot_coverage_pct,
    }
}

/// Santa Monica zoning districts with their baseline standards.
///
/// Values are configuration data; a deployment can replace the whole table via
/// [`super::StandardsTables::from_json_str`].
pub fn builtin_zone_rows() -> Vec<(&'static str, ZoneStandards)> {
    use DensityLimit::{FloorAreaBased, PerAcre, PerLot};
    use ZoneCategory::*;

    vec![
        // Residential districts
        ("R1", row(SingleFamily, PerLot(1), 0.5, 28.0, 2, 2.0, (20.0, 5.0, 25.0), 40.0)),
        ("OP1", row(SingleFamily, PerLot(1), 0.6, 28.0, 2, 2.0, (20.0, 4.0, 25.0), 50.0)),
        ("OPD", row(MultiFamily, PerLot(2), 0.8, 30.0, 2, 2.0, (15.0, 4.0, 15.0), 50.0)),
        ("R2", row(MultiFamily, PerAcre(29.0), 1.2, 30.0, 3, 1.5, (20.0, 5.0, 15.0), 50.0)),
        ("OP2", row(MultiFamily, PerAcre(29.0), 1.0, 30.0, 2, 1.5, (15.0, 4.0, 15.0), 50.0)),
        ("R3", row(MultiFamily, PerAcre(35.0), 1.5, 35.0, 3, 1.5, (20.0, 7.0, 15.0), 50.0)),
        ("OP3", row(MultiFamily, PerAcre(35.0), 1.25, 30.0, 3, 1.5, (15.0, 4.0, 15.0), 55.0)),
        ("R4", row(MultiFamily, PerAcre(48.0), 2.0, 45.0, 4, 1.5, (20.0, 8.0, 15.0), 50.0)),
        ("OP4", row(MultiFamily, PerAcre(48.0), 1.5, 35.0, 3, 1.5, (15.0, 4.0, 15.0), 55.0)),
        ("RMH", row(MultiFamily, PerAcre(12.0), 0.6, 16.0, 1, 1.0, (10.0, 5.0, 10.0), 60.0)),
        // Commercial and mixed-use districts
        ("NC", row(Commercial, FloorAreaBased, 1.5, 32.0, 2, 1.0, (0.0, 0.0, 10.0), 100.0)),
        ("GC", row(Commercial, FloorAreaBased, 1.5, 32.0, 2, 1.0, (0.0, 0.0, 10.0), 100.0)),
        ("OF", row(Commercial, FloorAreaBased, 1.5, 35.0, 3, 1.0, (5.0, 0.0, 10.0), 90.0)),
        ("MUB", row(MixedUse, FloorAreaBased, 2.0, 39.0, 3, 1.0, (0.0, 0.0, 10.0), 100.0)),
        ("MUBL", row(MixedUse, FloorAreaBased, 1.75, 35.0, 3, 1.0, (0.0, 0.0, 10.0), 100.0)),
        ("HMU", row(MixedUse, FloorAreaBased, 2.0, 45.0, 4, 1.0, (0.0, 0.0, 10.0), 100.0)),
        ("BC", row(Commercial, FloorAreaBased, 1.5, 32.0, 2, 1.0, (0.0, 0.0, 10.0), 100.0)),
        ("NV", row(MixedUse, FloorAreaBased, 1.5, 32.0, 2, 1.0, (0.0, 0.0, 10.0), 100.0)),
        // Bergamot Area Plan districts
        ("BTV", row(MixedUse, FloorAreaBased, 1.75, 32.0, 2, 0.5, (0.0, 0.0, 10.0), 100.0)),
        ("MUC", row(MixedUse, FloorAreaBased, 1.7, 32.0, 2, 0.5, (0.0, 0.0, 10.0), 100.0)),
        ("CAC", row(Commercial, FloorAreaBased, 1.0, 32.0, 2, 1.0, (0.0, 0.0, 10.0), 100.0)),
        // Downtown Community Plan districts
        ("DT", row(MixedUse, FloorAreaBased, 2.25, 39.0, 3, 0.5, (0.0, 0.0, 0.0), 100.0)),
        ("TA", row(MixedUse, FloorAreaBased, 2.25, 39.0, 3, 0.5, (0.0, 0.0, 0.0), 100.0)),
        ("BCD", row(MixedUse, FloorAreaBased, 2.25, 39.0, 3, 0.5, (0.0, 0.0, 0.0), 100.0)),
        ("LT", row(MixedUse, FloorAreaBased, 1.5, 32.0, 2, 0.5, (5.0, 0.0, 10.0), 100.0)),
        ("OT", row(MixedUse, FloorAreaBased, 1.5, 39.0, 3, 0.5, (5.0, 0.0, 10.0), 100.0)),
        // Non-residential districts
        ("OC", row(Office, FloorAreaBased, 1.0, 32.0, 2, 0.0, (10.0, 5.0, 10.0), 60.0)),
        ("IC", row(Industrial, FloorAreaBased, 1.5, 32.0, 2, 0.0, (0.0, 0.0, 10.0), 100.0)),
        ("OS", row(OpenSpace, PerLot(0), 0.0, 0.0, 0, 0.0, (0.0, 0.0, 0.0), 0.0)),
        ("CC", row(Civic, PerLot(0), 1.0, 45.0, 4, 0.0, (0.0, 0.0, 0.0), 100.0)),
        ("PL", row(Civic, PerLot(0), 1.0, 32.0, 2, 0.0, (0.0, 0.0, 0.0), 100.0)),
    ]
}
