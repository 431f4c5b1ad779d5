//! Scenario Comparator/Recommender.
//!
//! Ranking is a total order so the same scenarios always produce the same
//! recommendation. With a density preference the most units win; otherwise
//! the most buildable area per required parking space wins. Ties go to the
//! fewest affordable units, then the fewest parking spaces, then input order.

use std::cmp::Ordering;

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::parcel::ProposedProjectOptions;
use crate::scenario::DevelopmentScenario;

/// The engine's single pick, or the sentinel when nothing is buildable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    Recommended { scenario_id: String, rationale: String },
    NoFeasibleScenario { reason: String },
}

impl Recommendation {
    pub fn scenario_id(&self) -> Option<&str> {
        match self {
            Recommendation::Recommended { scenario_id, .. } => Some(scenario_id),
            Recommendation::NoFeasibleScenario { .. } => None,
        }
    }
}

fn prefers_density(proposed: Option<&ProposedProjectOptions>) -> bool {
    proposed.map_or(true, |p| p.prefer_max_density)
}

/// Primary-objective comparison; `Less` means `a` ranks ahead of `b`.
fn compare_primary(a: &DevelopmentScenario, b: &DevelopmentScenario, density: bool) -> Ordering {
    if density {
        b.max_units.cmp(&a.max_units)
    } else {
        // Infinite ratios compare equal to each other and ahead of any finite one.
        b.area_per_parking_space()
            .partial_cmp(&a.area_per_parking_space())
            .unwrap_or(Ordering::Equal)
    }
}

/// Indices of `scenarios` in ranked order, best first.
pub fn rank_order(
    scenarios: &[DevelopmentScenario],
    proposed: Option<&ProposedProjectOptions>,
) -> Vec<usize> {
    let density = prefers_density(proposed);
    let mut order: Vec<usize> = (0..scenarios.len()).collect();
    // Stable sort keeps input order as the last tie-break.
    order.sort_by(|&i, &j| {
        let (a, b) = (&scenarios[i], &scenarios[j]);
        compare_primary(a, b, density)
            .then_with(|| a.affordable_units_required.cmp(&b.affordable_units_required))
            .then_with(|| a.parking_spaces_required.cmp(&b.parking_spaces_required))
    });
    order
}

/// Scenarios sorted best first.
pub fn rank_scenarios(
    scenarios: &[DevelopmentScenario],
    proposed: Option<&ProposedProjectOptions>,
) -> Vec<DevelopmentScenario> {
    rank_order(scenarios, proposed)
        .into_iter()
        .map(|i| scenarios[i].clone())
        .collect()
}

/// Pick one scenario with a rationale, or the no-feasible-scenario sentinel.
pub fn recommend(
    scenarios: &[DevelopmentScenario],
    proposed: Option<&ProposedProjectOptions>,
) -> Recommendation {
    let order = rank_order(scenarios, proposed);
    let Some(&best_idx) = order.first() else {
        return Recommendation::NoFeasibleScenario {
            reason: "No law produced a buildable scenario for this parcel".to_string(),
        };
    };
    let best = &scenarios[best_idx];
    let density = prefers_density(proposed);

    let mut rationale = if density {
        format!(
            "{} yields the most units ({}) of {} scenario(s)",
            best.name,
            best.max_units,
            scenarios.len()
        )
    } else if best.parking_spaces_required == 0 {
        format!(
            "{} requires no parking for {:.0} sqft of buildable area",
            best.name,
            best.effective_buildable_sqft()
        )
    } else {
        format!(
            "{} gives the most buildable area per parking space ({:.0} sqft/space)",
            best.name,
            best.area_per_parking_space()
        )
    };

    if let Some(&runner_idx) = order.get(1) {
        let runner = &scenarios[runner_idx];
        if compare_primary(best, runner, density) == Ordering::Equal {
            if best.affordable_units_required != runner.affordable_units_required {
                rationale.push_str(&format!(
                    "; tied with {} and chosen for fewer affordable units ({} vs {})",
                    runner.name, best.affordable_units_required, runner.affordable_units_required
                ));
            } else if best.parking_spaces_required != runner.parking_spaces_required {
                rationale.push_str(&format!(
                    "; tied with {} and chosen for fewer parking spaces",
                    runner.name
                ));
            } else {
                rationale.push_str(&format!("; tied with {} and listed first", runner.name));
            }
        }
    }

    Recommendation::Recommended {
        scenario_id: best.id.clone(),
        rationale,
    }
}
