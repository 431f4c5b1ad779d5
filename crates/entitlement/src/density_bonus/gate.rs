//! Density-bonus eligibility for one base project size.

use crate::laws::LawContext;
use crate::parcel::{IncomeLevel, OwnershipType, ProposedProjectOptions};
use crate::scenario::{EligibilityFacts, EligibilityResult, GateChecks, Law};

/// Income level assumed for a fully affordable project that names none.
pub const FULLY_AFFORDABLE_DEFAULT_INCOME: IncomeLevel = IncomeLevel::Low;

/// Whether a base project of `base_units` earns a density bonus under the
/// proposal, and at what percentage.
pub fn density_bonus_eligibility(
    ctx: &LawContext,
    base_units: u32,
    proposed: Option<&ProposedProjectOptions>,
) -> EligibilityResult {
    let schedule = &ctx.tables.density_bonus;
    let min_base_units = ctx.params.density_bonus.min_base_units;
    let mut checks = GateChecks::default();
    let mut facts = EligibilityFacts {
        base_units: Some(base_units),
        ..Default::default()
    };

    let Some(proposed) = proposed else {
        checks.block("No affordability commitment proposed");
        return EligibilityResult::from_checks(Law::DensityBonus, checks, facts);
    };

    let fully_affordable = proposed.is_fully_affordable();
    let income = if fully_affordable {
        Some(proposed.income_level.unwrap_or(FULLY_AFFORDABLE_DEFAULT_INCOME))
    } else {
        proposed.income_level
    };
    facts.income_level = income;
    facts.fully_affordable = fully_affordable;
    facts.affordable_pct = proposed.target_affordable_pct;

    if proposed.target_affordable_pct.is_none() {
        checks.block("No affordable-unit percentage proposed");
    }
    if income.is_none() {
        checks.block("No income level given for the affordable units");
    }
    if income == Some(IncomeLevel::Moderate)
        && !fully_affordable
        && proposed.ownership != OwnershipType::ForSale
    {
        checks.block("Moderate-income units earn a bonus only in for-sale projects");
    }
    if base_units < min_base_units {
        checks.block(format!(
            "Base project of {base_units} unit(s) is below the {min_base_units}-unit minimum"
        ));
    }

    if let (Some(pct), Some(level)) = (proposed.target_affordable_pct, income) {
        match schedule.lookup(level, pct) {
            Some(found) => {
                facts.bonus_pct = Some(found.bonus_pct);
                facts.concessions = Some(found.concessions);
                if found.fully_affordable {
                    checks.note(format!(
                        "100% affordable project: {:.0}% density bonus and {} concession(s)",
                        found.bonus_pct, found.concessions
                    ));
                } else {
                    checks.note(format!(
                        "{pct:.0}% {} units earn a {:.2}% density bonus and {} concession(s)",
                        level.label(),
                        found.bonus_pct,
                        found.concessions
                    ));
                }
            }
            None => {
                let minimum = schedule.for_income(level).min_affordable_pct().unwrap_or(100.0);
                checks.block(format!(
                    "{pct:.0}% {} units is below the {minimum:.0}% minimum for a bonus",
                    level.label()
                ));
            }
        }
    }

    EligibilityResult::from_checks(Law::DensityBonus, checks, facts)
}
