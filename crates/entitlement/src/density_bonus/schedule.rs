//! Density-bonus percentage and concession step tables.
//!
//! For each income level the bonus is a monotonic step function of the share
//! of affordable units: the band with the highest threshold at or below the
//! project's percentage applies. Concessions follow a separate, coarser step
//! table. A fully affordable project gets a flat bonus and the maximum number
//! of concessions.

use serde::{Deserialize, Serialize};

use crate::parcel::IncomeLevel;

// =============================================================================
// Bands
// =============================================================================

/// Bonus percentage granted from `min_affordable_pct` upwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BonusBand {
    pub min_affordable_pct: f64,
    pub bonus_pct: f64,
}

/// Concessions granted from `min_affordable_pct` upwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConcessionBand {
    pub min_affordable_pct: f64,
    pub concessions: u32,
}

/// Step tables for one income level; both lists ascend by threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeSchedule {
    pub bonus_bands: Vec<BonusBand>,
    pub concession_bands: Vec<ConcessionBand>,
}

impl IncomeSchedule {
    /// Smallest affordable percentage that earns any bonus.
    pub fn min_affordable_pct(&self) -> Option<f64> {
        self.bonus_bands.first().map(|b| b.min_affordable_pct)
    }

    /// Bonus percentage for `affordable_pct`, or `None` below the first band.
    pub fn bonus_pct(&self, affordable_pct: f64) -> Option<f64> {
        self.bonus_bands
            .iter()
            .rev()
            .find(|b| affordable_pct >= b.min_affordable_pct)
            .map(|b| b.bonus_pct)
    }

    /// Concessions for `affordable_pct`; zero below the first band.
    pub fn concessions(&self, affordable_pct: f64) -> u32 {
        self.concession_bands
            .iter()
            .rev()
            .find(|b| affordable_pct >= b.min_affordable_pct)
            .map(|b| b.concessions)
            .unwrap_or(0)
    }

    /// Thresholds must strictly ascend and grants must never decrease.
    fn check_monotonic(&self, label: &str) -> Result<(), String> {
        for pair in self.bonus_bands.windows(2) {
            if pair[1].min_affordable_pct <= pair[0].min_affordable_pct
                || pair[1].bonus_pct < pair[0].bonus_pct
            {
                return Err(format!("{label} bonus bands are not monotonic"));
            }
        }
        for pair in self.concession_bands.windows(2) {
            if pair[1].min_affordable_pct <= pair[0].min_affordable_pct
                || pair[1].concessions < pair[0].concessions
            {
                return Err(format!("{label} concession bands are not monotonic"));
            }
        }
        if self.bonus_bands.iter().any(|b| b.bonus_pct < 0.0) {
            return Err(format!("{label} bonus bands contain a negative bonus"));
        }
        Ok(())
    }
}

// =============================================================================
// Full schedule
// =============================================================================

/// Result of looking up a percentage in the schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BonusLookup {
    pub bonus_pct: f64,
    pub concessions: u32,
    pub fully_affordable: bool,
}

/// Density-bonus tables for every income level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityBonusSchedule {
    pub very_low: IncomeSchedule,
    pub low: IncomeSchedule,
    pub moderate: IncomeSchedule,
    pub full_affordable_bonus_pct: f64,
    pub full_affordable_concessions: u32,
    /// Ceiling on concessions for any project.
    pub max_concessions: u32,
}

impl DensityBonusSchedule {
    pub fn for_income(&self, level: IncomeLevel) -> &IncomeSchedule {
        match level {
            IncomeLevel::VeryLow => &self.very_low,
            IncomeLevel::Low => &self.low,
            IncomeLevel::Moderate => &self.moderate,
        }
    }

    /// Look up the bonus for a project at `affordable_pct` restricted to `level`.
    pub fn lookup(&self, level: IncomeLevel, affordable_pct: f64) -> Option<BonusLookup> {
        if affordable_pct >= 100.0 {
            return Some(BonusLookup {
                bonus_pct: self.full_affordable_bonus_pct,
                concessions: self.full_affordable_concessions.min(self.max_concessions),
                fully_affordable: true,
            });
        }
        let schedule = self.for_income(level);
        let bonus_pct = schedule.bonus_pct(affordable_pct)?;
        Some(BonusLookup {
            bonus_pct,
            concessions: schedule.concessions(affordable_pct).min(self.max_concessions),
            fully_affordable: false,
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        self.very_low.check_monotonic("very-low-income")?;
        self.low.check_monotonic("low-income")?;
        self.moderate.check_monotonic("moderate-income")?;
        if self.full_affordable_bonus_pct < 0.0 {
            return Err("full_affordable_bonus_pct must be >= 0".to_string());
        }
        Ok(())
    }
}

fn bands(pairs: &[(f64, f64)]) -> Vec<BonusBand> {
    pairs
        .iter()
        .map(|&(min_affordable_pct, bonus_pct)| BonusBand {
            min_affordable_pct,
            bonus_pct,
        })
        .collect()
}

fn concession_bands(pairs: &[(f64, u32)]) -> Vec<ConcessionBand> {
    pairs
        .iter()
        .map(|&(min_affordable_pct, concessions)| ConcessionBand {
            min_affordable_pct,
            concessions,
        })
        .collect()
}

impl Default for DensityBonusSchedule {
    fn default() -> Self {
        let very_low = IncomeSchedule {
            bonus_bands: bands(&[
                (5.0, 20.0),
                (6.0, 22.5),
                (7.0, 25.0),
                (8.0, 27.5),
                (9.0, 30.0),
                (10.0, 32.5),
                (11.0, 35.0),
                (12.0, 38.75),
                (13.0, 42.5),
                (14.0, 46.25),
                (15.0, 50.0),
            ]),
            concession_bands: concession_bands(&[(5.0, 1), (10.0, 2), (15.0, 3)]),
        };

        let low = IncomeSchedule {
            bonus_bands: bands(&[
                (10.0, 20.0),
                (11.0, 21.5),
                (12.0, 23.0),
                (13.0, 24.5),
                (14.0, 26.0),
                (15.0, 27.5),
                (16.0, 29.0),
                (17.0, 30.5),
                (18.0, 32.0),
                (19.0, 33.5),
                (20.0, 35.0),
                (21.0, 38.75),
                (22.0, 42.5),
                (23.0, 46.25),
                (24.0, 50.0),
            ]),
            concession_bands: concession_bands(&[(10.0, 1), (17.0, 2), (24.0, 3)]),
        };

        // Moderate income: 5% at 10%, +1 point per point up to 35% at 40%,
        // then the steeper top-end steps to 50% at 44%.
        let mut moderate_pairs: Vec<(f64, f64)> =
            (10..=40).map(|pct| (pct as f64, (pct - 5) as f64)).collect();
        moderate_pairs.extend([(41.0, 38.75), (42.0, 42.5), (43.0, 46.25), (44.0, 50.0)]);
        let moderate = IncomeSchedule {
            bonus_bands: bands(&moderate_pairs),
            concession_bands: concession_bands(&[(10.0, 1), (20.0, 2), (30.0, 3)]),
        };

        Self {
            very_low,
            low,
            moderate,
            full_affordable_bonus_pct: 80.0,
            full_affordable_concessions: 4,
            max_concessions: 4,
        }
    }
}
