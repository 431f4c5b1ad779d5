//! Nonconforming/context annotation applied to every scenario before ranking.

use crate::engine_params::ContextParams;
use crate::parcel::{FireHazardClass, ParcelAttributes};
use crate::scenario::DevelopmentScenario;

/// Annotate with the default context thresholds.
pub fn annotate(scenario: &DevelopmentScenario, parcel: &ParcelAttributes) -> DevelopmentScenario {
    annotate_with(scenario, parcel, &ContextParams::default())
}

/// Return a copy of `scenario` with net-new units, nonconforming status and
/// site-context notes filled in. The input is left untouched.
pub fn annotate_with(
    scenario: &DevelopmentScenario,
    parcel: &ParcelAttributes,
    params: &ContextParams,
) -> DevelopmentScenario {
    let mut out = scenario.clone();
    let existing = parcel.existing.units;

    out.net_new_units = Some(out.max_units.saturating_sub(existing));
    out.nonconforming = existing > out.max_units;
    if out.nonconforming {
        out.notes.push(format!(
            "Nonconforming: {existing} existing unit(s) exceed the {} unit(s) this scenario permits; no net new units",
            out.max_units
        ));
    }

    if parcel.existing.building_sqft > out.max_building_sqft && out.max_building_sqft > 0.0 {
        out.notes.push(format!(
            "Existing building of {:.0} sqft exceeds the {:.0} sqft envelope",
            parcel.existing.building_sqft, out.max_building_sqft
        ));
    }

    let c = &parcel.constraints;
    if c.coastal_zone {
        out.notes
            .push("Coastal zone: a coastal development permit may be required".to_string());
    }
    if c.flood_zone {
        out.notes
            .push("Special flood hazard area: flood-resistant construction required".to_string());
    }
    if c.fire_hazard == FireHazardClass::Unknown {
        out.notes
            .push("Fire hazard severity zone unknown; confirm with CAL FIRE maps".to_string());
    }
    if let Some(db) = parcel.context.noise_cnel_db {
        if db > params.noise_threshold_cnel_db {
            out.notes.push(format!(
                "Noise of {db:.0} dB CNEL exceeds {:.0} dB; acoustic study required",
                params.noise_threshold_cnel_db
            ));
        }
    }
    if parcel.is_mixed_zoning() {
        out.notes.push(format!(
            "Assemblage spans zones {}; envelope uses {}",
            parcel.mixed_zoning.join(", "),
            parcel.zone_code
        ));
    }

    out
}
