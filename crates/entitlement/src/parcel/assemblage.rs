//! Combine adjacent parcels into one synthetic parcel before analysis.
//!
//! Quantities sum, constraints union (any member with a constraint gives the
//! assemblage that constraint), and mixed zoning is recorded explicitly in
//! [`ParcelAttributes::mixed_zoning`] rather than silently resolved.

use crate::error::AssemblageError;

use super::types::{ParcelAttributes, SiteConstraints, SiteContext};

/// Reduce a list of parcels to a single synthetic [`ParcelAttributes`].
///
/// A single-parcel list returns a clone of that parcel. The assemblage's
/// `zone_code` is taken from the largest member lot (first on ties); every
/// distinct zone is listed in `mixed_zoning` when more than one is present.
pub fn combine_parcels(parcels: &[ParcelAttributes]) -> Result<ParcelAttributes, AssemblageError> {
    let (first, rest) = parcels.split_first().ok_or(AssemblageError::Empty)?;
    if rest.is_empty() {
        return Ok(first.clone());
    }

    let mut combined = ParcelAttributes {
        parcel_id: join_distinct(parcels.iter().map(|p| p.parcel_id.as_str()), "+"),
        address: join_distinct(parcels.iter().map(|p| p.address.as_str()), "; "),
        jurisdiction: first.jurisdiction.clone(),
        lot_area_sqft: parcels.iter().map(|p| p.lot_area_sqft.max(0.0)).sum(),
        lot_width_ft: sum_known(parcels.iter().map(|p| p.lot_width_ft)),
        lot_depth_ft: max_known(parcels.iter().map(|p| p.lot_depth_ft)),
        zone_code: largest_lot(parcels).zone_code.clone(),
        constraints: first.constraints.clone(),
        ..Default::default()
    };

    // Tiers: the lowest member tier governs the whole site.
    combined.development_tier = parcels.iter().filter_map(|p| p.development_tier).min();
    combined.corridor_tier = if parcels.iter().all(|p| p.corridor_tier.is_some()) {
        parcels.iter().filter_map(|p| p.corridor_tier).min()
    } else {
        None
    };

    let mut zones: Vec<String> = Vec::new();
    for parcel in parcels {
        combined.overlay_codes.extend(parcel.overlay_codes.iter().cloned());
        for zone in std::iter::once(&parcel.zone_code).chain(parcel.mixed_zoning.iter()) {
            if !zones.contains(zone) {
                zones.push(zone.clone());
            }
        }

        combined.existing.units = combined.existing.units.saturating_add(parcel.existing.units);
        combined.existing.building_sqft += parcel.existing.building_sqft.max(0.0);
        combined.existing.year_built = match (combined.existing.year_built, parcel.existing.year_built) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };

        merge_constraints(&mut combined.constraints, &parcel.constraints);
    }
    if zones.len() > 1 {
        combined.mixed_zoning = zones;
    }

    combined.context = merge_context(parcels.iter().map(|p| &p.context));

    Ok(combined)
}

fn merge_constraints(into: &mut SiteConstraints, from: &SiteConstraints) {
    into.historic |= from.historic;
    into.coastal_zone |= from.coastal_zone;
    into.flood_zone |= from.flood_zone;
    into.floodway |= from.floodway;
    into.wetlands |= from.wetlands;
    into.protected_habitat |= from.protected_habitat;
    into.conservation_easement |= from.conservation_easement;
    into.hazardous_waste_site |= from.hazardous_waste_site;
    into.earthquake_fault_zone |= from.earthquake_fault_zone;
    into.ellis_act_withdrawal_within_15_years |= from.ellis_act_withdrawal_within_15_years;
    into.tenant_occupied_within_3_years |= from.tenant_occupied_within_3_years;
    into.fire_hazard = into.fire_hazard.most_restrictive(from.fire_hazard);
    into.rent_control = into.rent_control.most_restrictive(from.rent_control);
}

/// The nearest qualifying stop wins over any non-qualifying one; without a
/// qualifying stop the nearest stop of any kind is kept.
fn merge_context<'a>(contexts: impl Iterator<Item = &'a SiteContext>) -> SiteContext {
    let mut merged = SiteContext::default();
    for ctx in contexts {
        if let Some(d) = ctx.transit_distance_miles {
            let better = match merged.transit_distance_miles {
                None => true,
                Some(m) => match (ctx.qualifying_transit_stop, merged.qualifying_transit_stop) {
                    (true, false) => true,
                    (false, true) => false,
                    _ => d < m,
                },
            };
            if better {
                merged.transit_distance_miles = Some(d);
                merged.qualifying_transit_stop = ctx.qualifying_transit_stop;
            }
        }
        merged.street_row_width_ft = max_known([merged.street_row_width_ft, ctx.street_row_width_ft].into_iter());
        merged.noise_cnel_db = max_known([merged.noise_cnel_db, ctx.noise_cnel_db].into_iter());
    }
    merged
}

fn largest_lot(parcels: &[ParcelAttributes]) -> &ParcelAttributes {
    let mut best = &parcels[0];
    for parcel in &parcels[1..] {
        if parcel.lot_area_sqft > best.lot_area_sqft {
            best = parcel;
        }
    }
    best
}

fn join_distinct<'a>(values: impl Iterator<Item = &'a str>, sep: &str) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for v in values {
        if !v.is_empty() && !seen.contains(&v) {
            seen.push(v);
        }
    }
    seen.join(sep)
}

fn sum_known(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let mut total = None;
    for v in values.flatten() {
        total = Some(total.unwrap_or(0.0) + v);
    }
    total
}

fn max_known(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    values.flatten().fold(None, |acc: Option<f64>, v| match acc {
        Some(a) => Some(a.max(v)),
        None => Some(v),
    })
}
