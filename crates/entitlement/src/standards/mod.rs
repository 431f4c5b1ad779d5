//! Base Standards and Overlay/Tier Resolvers.
//!
//! Resolves a parcel's zone code into a [`DevelopmentStandards`] bundle and
//! widens it by every applicable overlay or plan-area tier. All lookup data
//! lives in the read-only [`StandardsTables`] resource.

pub mod overlays;
pub mod tables;
pub mod types;
pub mod zone_table;


pub use overlays::{FarStacking, OverlayBonus, OverlayBonusSchedule, OverlayDefinition, OverlayFamily};
pub use tables::{StandardsTables, DEFAULT_DEVELOPMENT_TIER};
pub use types::*;
pub use zone_table::{normalize_code, ZoneStandards};
