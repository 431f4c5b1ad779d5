//! Parcel Attribute Model.
//!
//! The engine's sole input: a normalised, already-resolved bundle describing
//! one parcel's physical, zoning and constraint attributes, plus the optional
//! developer intent that biases scenario generation.
//!
//! - [`types`]: `ParcelAttributes`, `ProposedProjectOptions` and their flags
//! - [`validation`]: structural checks that run before the engine
//! - [`assemblage`]: reducer that merges adjacent parcels into one

pub mod assemblage;
pub mod types;
pub mod validation;

#[cfg(test)]
mod tests;

pub use assemblage::combine_parcels;
pub use types::*;
pub use validation::{validate_parcel, validate_proposed};
