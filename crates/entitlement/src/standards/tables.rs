//! [`StandardsTables`]: the read-only lookup tables shared by every analysis.
//!
//! Built once at startup (from the built-in data or a JSON document) and then
//! only ever read, so concurrent analyses share it without synchronisation.

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::density_bonus::DensityBonusSchedule;
use crate::error::ConfigError;
use crate::laws::corridor::{builtin_corridor_floors, CorridorTierFloor};

use super::overlays::{builtin_overlay_rows, FarStacking, OverlayDefinition, OverlayFamily};
use super::types::DevelopmentStandards;
use super::zone_table::{builtin_zone_rows, conservative_defaults, normalize_code, ZoneStandards};

/// Tier assumed for tiered overlays when the parcel carries none.
pub const DEFAULT_DEVELOPMENT_TIER: u8 = 1;

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardsTables {
    pub zones: BTreeMap<String, ZoneStandards>,
    pub overlays: BTreeMap<String, OverlayDefinition>,
    pub density_bonus: DensityBonusSchedule,
    /// Floors for corridor tiers 1-4, in tier order.
    pub corridor_floors: Vec<CorridorTierFloor>,
}

impl Default for StandardsTables {
    fn default() -> Self {
        Self {
            zones: builtin_zone_rows()
                .into_iter()
                .map(|(code, row)| (code.to_string(), row))
                .collect(),
            overlays: builtin_overlay_rows()
                .into_iter()
                .map(|(code, def)| (code.to_string(), def))
                .collect(),
            density_bonus: DensityBonusSchedule::default(),
            corridor_floors: builtin_corridor_floors(),
        }
    }
}

impl StandardsTables {
    /// Parse tables from JSON. Omitted top-level tables keep their built-in
    /// contents; keys are normalised like incoming zone codes.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let parsed: StandardsTables = serde_json::from_str(json)?;
        let tables = Self {
            zones: parsed
                .zones
                .into_iter()
                .map(|(code, row)| (normalize_code(&code), row))
                .collect(),
            overlays: parsed
                .overlays
                .into_iter()
                .map(|(code, def)| (normalize_code(&code), def))
                .collect(),
            density_bonus: parsed.density_bonus,
            corridor_floors: parsed.corridor_floors,
        };
        tables.validate()?;
        Ok(tables)
    }

    /// Check the invariants the engine relies on: no negative standards, no
    /// narrowing overlay bonuses, monotonic bonus bands and corridor floors
    /// that strictly increase with tier.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (code, row) in &self.zones {
            if let Some(field) = row.invalid_field() {
                return Err(ConfigError::InvalidValue(format!(
                    "zone {code}: {field} must be finite and >= 0"
                )));
            }
        }
        for (code, def) in &self.overlays {
            let narrowing = def
                .all_bonuses()
                .iter()
                .any(|b| !b.far.is_finite() || b.far < 0.0 || !b.height_ft.is_finite() || b.height_ft < 0.0);
            if narrowing {
                return Err(ConfigError::InvalidValue(format!(
                    "overlay {code}: bonuses must be >= 0 (overlays may not narrow the base envelope)"
                )));
            }
        }
        self.density_bonus
            .validate()
            .map_err(ConfigError::InvalidValue)?;

        if self.corridor_floors.len() != 4 {
            return Err(ConfigError::InvalidValue(format!(
                "expected 4 corridor tier floors, found {}",
                self.corridor_floors.len()
            )));
        }
        for pair in self.corridor_floors.windows(2) {
            if pair[1].min_density_du_per_acre <= pair[0].min_density_du_per_acre
                || pair[1].min_height_ft <= pair[0].min_height_ft
            {
                return Err(ConfigError::InvalidValue(
                    "corridor tier floors must strictly increase with tier".to_string(),
                ));
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Base standards
    // -------------------------------------------------------------------------

    /// Baseline envelope for a zone code.
    ///
    /// Never fails: unrecognised codes get the most restrictive residential
    /// envelope with `unknown_zone` set and an explanatory note.
    pub fn resolve_base_standards(&self, zone_code: &str) -> DevelopmentStandards {
        let code = normalize_code(zone_code);
        if let Some(row) = self.zones.get(&code) {
            return row.to_bundle(&code);
        }

        let mut bundle = conservative_defaults().to_bundle(&code);
        bundle.unknown_zone = true;
        if code.is_empty() {
            bundle
                .notes
                .push("No zone code supplied; conservative single-family defaults applied".to_string());
        } else {
            bundle.notes.push(format!(
                "Zone code '{}' is not in the standards table; conservative single-family defaults applied",
                zone_code.trim()
            ));
        }
        bundle
    }

    // -------------------------------------------------------------------------
    // Overlays
    // -------------------------------------------------------------------------

    /// Widen `base` by every recognised overlay in `overlay_codes`.
    ///
    /// Unknown codes are skipped with a note. Tiered overlays use
    /// `development_tier`, defaulting to tier 1 with a note when absent.
    pub fn apply_overlays<I, S>(
        &self,
        base: DevelopmentStandards,
        overlay_codes: I,
        development_tier: Option<u8>,
    ) -> DevelopmentStandards
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut result = base;
        let tier = development_tier.unwrap_or(DEFAULT_DEVELOPMENT_TIER);
        let mut tier_defaulted = false;

        let mut family_far: BTreeMap<OverlayFamily, f64> = BTreeMap::new();
        let mut height_bonus = 0.0;
        let mut stories_bonus = 0u32;

        for raw in overlay_codes {
            let raw = raw.as_ref();
            let code = normalize_code(raw);
            if code.is_empty() {
                continue;
            }
            let Some(def) = self.overlays.get(&code) else {
                result
                    .notes
                    .push(format!("Overlay code '{}' not recognized; ignored", raw.trim()));
                continue;
            };

            if def.is_tiered() && development_tier.is_none() {
                tier_defaulted = true;
            }
            let bonus = def.bonus_for_tier(tier);

            let entry = family_far.entry(def.family).or_insert(0.0);
            match def.family.far_stacking() {
                FarStacking::Sum => *entry += bonus.far,
                FarStacking::BestApplicable => *entry = entry.max(bonus.far),
            }
            height_bonus += bonus.height_ft;
            stories_bonus += bonus.stories;

            if bonus.is_none() {
                result
                    .notes
                    .push(format!("{} ({code}): no envelope bonus at tier {tier}", def.name));
            } else {
                result.notes.push(format!(
                    "{} ({code}) tier {tier}: +{:.2} FAR, +{:.0} ft, +{} stories",
                    def.name, bonus.far, bonus.height_ft, bonus.stories
                ));
            }
            result.applied_overlays.push(code);
        }

        if tier_defaulted {
            result.notes.push(format!(
                "No development tier supplied; tier {DEFAULT_DEVELOPMENT_TIER} assumed for tiered overlays"
            ));
        }

        let far_bonus: f64 = family_far.values().sum();
        result.max_far += far_bonus.max(0.0);
        result.max_height_ft += height_bonus.max(0.0);
        result.max_stories += stories_bonus;
        result.overlay_far_bonus += far_bonus.max(0.0);
        result.overlay_height_bonus_ft += height_bonus.max(0.0);
        result
    }

    /// Base standards for the parcel's zone widened by its overlays.
    pub fn resolve_standards(
        &self,
        zone_code: &str,
        overlay_codes: &std::collections::BTreeSet<String>,
        development_tier: Option<u8>,
    ) -> DevelopmentStandards {
        let base = self.resolve_base_standards(zone_code);
        self.apply_overlays(base, overlay_codes, development_tier)
    }
}
