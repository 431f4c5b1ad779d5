//! Executor system: drains the [`AnalysisQueue`] each update, analyses every
//! request in parallel on the compute task pool, and records the results in
//! submission order.

use bevy::prelude::*;
use bevy::tasks::{ComputeTaskPool, TaskPool};

use crate::analysis::analyze_parcel;
use crate::engine_params::EngineParams;
use crate::standards::StandardsTables;

use super::result_log::{AnalysisResultLog, LoggedAnalysis};
use super::AnalysisQueue;

/// Fired once per successfully analysed request.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AnalysisCompleted {
    pub ticket: u64,
    pub request_id: String,
    pub parcel_id: String,
    pub scenario_count: usize,
    pub recommended: Option<String>,
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

pub fn run_queued_analyses(
    mut queue: ResMut<AnalysisQueue>,
    mut log: ResMut<AnalysisResultLog>,
    mut completed: EventWriter<AnalysisCompleted>,
    tables: Res<StandardsTables>,
    params: Res<EngineParams>,
) {
    if queue.is_empty() {
        return;
    }
    let jobs = queue.drain();
    let tables: &StandardsTables = &tables;
    let params: &EngineParams = &params;

    // `scope` returns results in spawn order regardless of completion order.
    let results = ComputeTaskPool::get_or_init(TaskPool::default).scope(|scope| {
        for job in &jobs {
            scope.spawn(async move { analyze_parcel(tables, params, &job.request) });
        }
    });

    for (job, result) in jobs.into_iter().zip(results) {
        match &result {
            Ok(report) => {
                info!(
                    "Analysis #{} ({}) for parcel {}: {} scenario(s), recommended {:?}",
                    job.ticket,
                    job.request.request_id,
                    report.parcel_id,
                    report.scenarios.len(),
                    report.recommendation.scenario_id()
                );
                completed.send(AnalysisCompleted {
                    ticket: job.ticket,
                    request_id: job.request.request_id.clone(),
                    parcel_id: report.parcel_id.clone(),
                    scenario_count: report.scenarios.len(),
                    recommended: report.recommendation.scenario_id().map(str::to_string),
                });
            }
            Err(e) => {
                warn!(
                    "Analysis #{} ({}) rejected: {e}",
                    job.ticket, job.request.request_id
                );
            }
        }
        log.push(LoggedAnalysis {
            ticket: job.ticket,
            request_id: job.request.request_id,
            result,
        });
    }
}
