//! Overlay and plan-area tier definitions.
//!
//! Overlays only ever add FAR, height and stories to the base envelope.
//! Height and story bonuses from every applicable overlay add together. FAR
//! bonuses combine per [`OverlayFamily`]: a family either sums its members'
//! bonuses or takes the single best one (see [`OverlayFamily::far_stacking`]);
//! the per-family results then add across families.

use serde::{Deserialize, Serialize};

// =============================================================================
// Families and stacking rules
// =============================================================================

/// How FAR bonuses from overlays of the same family combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FarStacking {
    /// Bonuses add.
    Sum,
    /// Only the largest bonus applies.
    BestApplicable,
}

/// Source plan or program an overlay belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OverlayFamily {
    /// Downtown Community Plan tiers and opportunity sites.
    DowntownCommunityPlan,
    /// Bergamot Area Plan tiers.
    BergamotAreaPlan,
    /// Land use and circulation element activity-center overlays.
    ActivityCenter,
    /// Local affordable-housing incentive overlays.
    AffordableHousing,
    /// Design overlays with no envelope effect.
    Design,
}

impl OverlayFamily {
    /// Stacking rule for FAR bonuses within this family.
    ///
    /// Plan-area tiers describe alternative envelopes for the same site, so a
    /// parcel gets the best one. Affordable-housing incentives are independent
    /// programs and accumulate.
    pub fn far_stacking(self) -> FarStacking {
        match self {
            OverlayFamily::DowntownCommunityPlan => FarStacking::BestApplicable,
            OverlayFamily::BergamotAreaPlan => FarStacking::BestApplicable,
            OverlayFamily::ActivityCenter => FarStacking::BestApplicable,
            OverlayFamily::AffordableHousing => FarStacking::Sum,
            OverlayFamily::Design => FarStacking::Sum,
        }
    }
}

// =============================================================================
// Bonuses
// =============================================================================

/// Envelope increments granted by an overlay at one tier.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OverlayBonus {
    pub far: f64,
    pub height_ft: f64,
    pub stories: u32,
}

impl OverlayBonus {
    pub const NONE: OverlayBonus = OverlayBonus {
        far: 0.0,
        height_ft: 0.0,
        stories: 0,
    };

    pub fn is_none(&self) -> bool {
        self.far == 0.0 && self.height_ft == 0.0 && self.stories == 0
    }
}

/// How an overlay's bonus varies with the parcel's development tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OverlayBonusSchedule {
    /// Same bonus regardless of tier.
    Flat(OverlayBonus),
    /// Bonus for tiers 1, 2 and 3, in that order.
    Tiered([OverlayBonus; 3]),
}

/// One overlay in the lookup table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayDefinition {
    pub name: String,
    pub family: OverlayFamily,
    pub schedule: OverlayBonusSchedule,
}

impl OverlayDefinition {
    pub fn is_tiered(&self) -> bool {
        matches!(self.schedule, OverlayBonusSchedule::Tiered(_))
    }

    /// Bonus at `tier` (1..=3). Out-of-range tiers clamp into range.
    pub fn bonus_for_tier(&self, tier: u8) -> OverlayBonus {
        match &self.schedule {
            OverlayBonusSchedule::Flat(bonus) => *bonus,
            OverlayBonusSchedule::Tiered(tiers) => {
                let idx = usize::from(tier.clamp(1, 3)) - 1;
                tiers[idx]
            }
        }
    }

    /// Every bonus this overlay can grant, for table validation.
    pub fn all_bonuses(&self) -> Vec<OverlayBonus> {
        match &self.schedule {
            OverlayBonusSchedule::Flat(bonus) => vec![*bonus],
            OverlayBonusSchedule::Tiered(tiers) => tiers.to_vec(),
        }
    }
}

// =============================================================================
// Built-in table
// =============================================================================

fn bonus(far: f64, height_ft: f64, stories: u32) -> OverlayBonus {
    OverlayBonus {
        far,
        height_ft,
        stories,
    }
}

fn overlay(name: &str, family: OverlayFamily, schedule: OverlayBonusSchedule) -> OverlayDefinition {
    OverlayDefinition {
        name: name.to_string(),
        family,
        schedule,
    }
}

/// Santa Monica overlay and plan-area definitions keyed by normalised code.
pub fn builtin_overlay_rows() -> Vec<(&'static str, OverlayDefinition)> {
    use OverlayBonusSchedule::{Flat, Tiered};
    use OverlayFamily::*;

    vec![
        (
            "DCP",
            overlay(
                "Downtown Community Plan",
                DowntownCommunityPlan,
                Tiered([OverlayBonus::NONE, bonus(0.75, 21.0, 2), bonus(1.75, 45.0, 4)]),
            ),
        ),
        (
            "DCPOS",
            overlay(
                "Downtown Community Plan opportunity site",
                DowntownCommunityPlan,
                Tiered([OverlayBonus::NONE, bonus(1.0, 21.0, 2), bonus(2.25, 45.0, 4)]),
            ),
        ),
        (
            "BAP",
            overlay(
                "Bergamot Area Plan",
                BergamotAreaPlan,
                Tiered([OverlayBonus::NONE, bonus(0.5, 11.0, 1), bonus(1.0, 21.0, 2)]),
            ),
        ),
        (
            "ACO",
            overlay(
                "Activity Center Overlay",
                ActivityCenter,
                Tiered([OverlayBonus::NONE, bonus(0.25, 8.0, 1), bonus(0.5, 15.0, 1)]),
            ),
        ),
        (
            "LUCE",
            overlay(
                "LUCE activity center",
                ActivityCenter,
                Tiered([OverlayBonus::NONE, bonus(0.25, 8.0, 1), bonus(0.5, 15.0, 1)]),
            ),
        ),
        (
            "AHO",
            overlay(
                "Affordable Housing Overlay",
                AffordableHousing,
                Flat(bonus(0.5, 10.0, 1)),
            ),
        ),
        (
            "IHO",
            overlay(
                "Inclusionary Housing Incentive Overlay",
                AffordableHousing,
                Flat(bonus(0.25, 0.0, 0)),
            ),
        ),
        (
            "PODO",
            overlay(
                "Pedestrian-Oriented Design Overlay",
                Design,
                Flat(OverlayBonus::NONE),
            ),
        ),
    ]
}
