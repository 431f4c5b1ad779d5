//! Density Bonus Stacker (Gov. Code 65915).
//!
//! - [`schedule`]: percentage bands mapping affordability to bonus and concessions
//! - [`gate`]: eligibility for a given base project size and proposal
//! - [`stacker`]: the combinator that turns a base scenario into its bonus variant

pub mod gate;
pub mod schedule;
pub mod stacker;

#[cfg(test)]
mod tests;

pub use gate::density_bonus_eligibility;
pub use schedule::{BonusLookup, DensityBonusSchedule, IncomeSchedule};
pub use stacker::{apply_density_bonus, bonus_height, parking_cap_per_unit};
