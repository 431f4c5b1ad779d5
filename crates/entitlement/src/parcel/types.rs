//! [`ParcelAttributes`], its constraint/context sub-records, and the
//! user-supplied [`ProposedProjectOptions`].

use std::collections::BTreeSet;

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

// =============================================================================
// Categorical constraint flags
// =============================================================================

/// CAL FIRE fire-hazard severity classification for the parcel.
///
/// `Unknown` is the default and is never treated as membership in any
/// hazard class.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
    Encode, Decode,
)]
pub enum FireHazardClass {
    #[default]
    Unknown,
    NotInZone,
    Moderate,
    High,
    VeryHigh,
}

impl FireHazardClass {
    /// Merge two classes, keeping the more restrictive one. Any hazard zone
    /// beats `Unknown`, which beats `NotInZone`.
    pub fn most_restrictive(self, other: FireHazardClass) -> FireHazardClass {
        if other.merge_rank() > self.merge_rank() {
            other
        } else {
            self
        }
    }

    fn merge_rank(self) -> u8 {
        match self {
            FireHazardClass::NotInZone => 0,
            FireHazardClass::Unknown => 1,
            FireHazardClass::Moderate => 2,
            FireHazardClass::High => 3,
            FireHazardClass::VeryHigh => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FireHazardClass::Unknown => "unknown",
            FireHazardClass::NotInZone => "not in a fire hazard severity zone",
            FireHazardClass::Moderate => "moderate",
            FireHazardClass::High => "high",
            FireHazardClass::VeryHigh => "very high",
        }
    }
}

/// Rent-stabilisation status of existing units on the parcel.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Encode, Decode,
)]
pub enum RentControlStatus {
    #[default]
    Unknown,
    NotControlled,
    Controlled,
}

impl RentControlStatus {
    /// Merge two statuses, keeping the more restrictive one.
    /// `Controlled` beats `Unknown`, which beats `NotControlled`.
    pub fn most_restrictive(self, other: RentControlStatus) -> RentControlStatus {
        use RentControlStatus::*;
        match (self, other) {
            (Controlled, _) | (_, Controlled) => Controlled,
            (Unknown, _) | (_, Unknown) => Unknown,
            _ => NotControlled,
        }
    }
}

// =============================================================================
// Corridor tier
// =============================================================================

/// Commercial-corridor classification used by the corridor-conversion law.
///
/// Tier assignment comes from upstream data; the engine never infers it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Encode,
    Decode,
)]
pub enum CorridorTier {
    Tier1,
    Tier2,
    Tier3,
    Tier4,
}

impl CorridorTier {
    pub const ALL: [CorridorTier; 4] = [
        CorridorTier::Tier1,
        CorridorTier::Tier2,
        CorridorTier::Tier3,
        CorridorTier::Tier4,
    ];

    pub fn index(self) -> usize {
        match self {
            CorridorTier::Tier1 => 0,
            CorridorTier::Tier2 => 1,
            CorridorTier::Tier3 => 2,
            CorridorTier::Tier4 => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CorridorTier::Tier1 => "Tier 1",
            CorridorTier::Tier2 => "Tier 2",
            CorridorTier::Tier3 => "Tier 3",
            CorridorTier::Tier4 => "Tier 4",
        }
    }
}

// =============================================================================
// Parcel sub-records
// =============================================================================

/// What already stands on the parcel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExistingDevelopment {
    pub units: u32,
    pub building_sqft: f64,
    pub year_built: Option<u16>,
}

/// Regulatory and environmental constraints resolved upstream by the GIS layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConstraints {
    /// Designated landmark, structure of merit, or contributor to a historic district.
    pub historic: bool,
    pub coastal_zone: bool,
    /// Special flood hazard area (100-year floodplain).
    pub flood_zone: bool,
    pub floodway: bool,
    pub wetlands: bool,
    pub protected_habitat: bool,
    pub conservation_easement: bool,
    pub fire_hazard: FireHazardClass,
    pub hazardous_waste_site: bool,
    pub earthquake_fault_zone: bool,
    pub rent_control: RentControlStatus,
    pub ellis_act_withdrawal_within_15_years: bool,
    pub tenant_occupied_within_3_years: bool,
}

/// Surroundings that drive transit, corridor and noise rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteContext {
    /// Walking distance to the nearest transit stop, in miles. `None` when unknown.
    pub transit_distance_miles: Option<f64>,
    /// Whether that stop is a major transit stop (rail station or high-frequency bus).
    pub qualifying_transit_stop: bool,
    /// Width of the fronting street right-of-way, in feet.
    pub street_row_width_ft: Option<f64>,
    /// Community noise equivalent level at the site, in dB.
    pub noise_cnel_db: Option<f64>,
}

// =============================================================================
// ParcelAttributes
// =============================================================================

/// Immutable snapshot of one parcel (or a synthetic assemblage of several).
///
/// Constructed once per analysis request and never mutated by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParcelAttributes {
    pub parcel_id: String,
    pub address: String,
    pub jurisdiction: String,
    pub lot_area_sqft: f64,
    pub lot_width_ft: Option<f64>,
    pub lot_depth_ft: Option<f64>,

    pub zone_code: String,
    /// Overlay and plan-area codes. Ordering carries no precedence.
    pub overlay_codes: BTreeSet<String>,
    /// Plan-area development tier (1..=3) used by tiered overlays.
    pub development_tier: Option<u8>,
    pub corridor_tier: Option<CorridorTier>,
    /// Every distinct zone when this is an assemblage spanning several zones.
    pub mixed_zoning: Vec<String>,

    pub existing: ExistingDevelopment,
    pub constraints: SiteConstraints,
    pub context: SiteContext,
}

impl ParcelAttributes {
    /// Lot area in acres; zero for a zero-area lot.
    pub fn lot_area_acres(&self) -> f64 {
        if self.lot_area_sqft <= 0.0 {
            0.0
        } else {
            self.lot_area_sqft / SQFT_PER_ACRE
        }
    }

    pub fn is_mixed_zoning(&self) -> bool {
        self.mixed_zoning.len() > 1
    }
}

/// Square feet in one acre.
pub const SQFT_PER_ACRE: f64 = 43_560.0;

// =============================================================================
// ProposedProjectOptions
// =============================================================================

/// Tenure of the proposed project.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Encode, Decode,
)]
pub enum OwnershipType {
    ForSale,
    #[default]
    Rental,
    Mixed,
}

/// Income level at which affordable units are restricted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
)]
pub enum IncomeLevel {
    /// 50% of AMI or below.
    VeryLow,
    /// 80% of AMI or below.
    Low,
    /// 120% of AMI or below.
    Moderate,
}

impl IncomeLevel {
    pub fn label(self) -> &'static str {
        match self {
            IncomeLevel::VeryLow => "very low income",
            IncomeLevel::Low => "low income",
            IncomeLevel::Moderate => "moderate income",
        }
    }
}

/// Shares of each bedroom bucket in the proposed unit mix (each 0.0-1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitMix {
    pub zero_to_one_bedroom: f64,
    pub two_to_three_bedroom: f64,
    pub four_plus_bedroom: f64,
}

impl UnitMix {
    pub fn total_share(&self) -> f64 {
        self.zero_to_one_bedroom + self.two_to_three_bedroom + self.four_plus_bedroom
    }
}

/// Developer intent used to bias the generators and the recommender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProposedProjectOptions {
    pub ownership: OwnershipType,
    /// Share of units restricted as affordable, in percent (0-100).
    pub target_affordable_pct: Option<f64>,
    pub income_level: Option<IncomeLevel>,
    pub unit_mix: Option<UnitMix>,
    pub avg_bedrooms: Option<f64>,
    pub prefer_max_density: bool,
}

impl Default for ProposedProjectOptions {
    fn default() -> Self {
        Self {
            ownership: OwnershipType::Rental,
            target_affordable_pct: None,
            income_level: None,
            unit_mix: None,
            avg_bedrooms: None,
            prefer_max_density: true,
        }
    }
}

impl ProposedProjectOptions {
    /// Whether the proposal commits every unit as affordable.
    pub fn is_fully_affordable(&self) -> bool {
        self.target_affordable_pct.is_some_and(|pct| pct >= 100.0)
    }
}
