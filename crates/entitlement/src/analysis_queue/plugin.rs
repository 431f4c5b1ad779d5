//! Plugin that wires up the analysis service: tables, parameters, queue,
//! executor and log.

use bevy::prelude::*;

use super::executor::{run_queued_analyses, AnalysisCompleted};
use super::result_log::AnalysisResultLog;
use super::AnalysisQueue;
use crate::engine_params::EngineParams;
use crate::standards::StandardsTables;

/// Registers the engine's resources and the executor system.
///
/// Tables and parameters are only initialised when absent, so an app may
/// insert JSON-loaded versions before adding the plugin.
pub struct EntitlementPlugin;

impl Plugin for EntitlementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<StandardsTables>()
            .init_resource::<EngineParams>()
            .init_resource::<AnalysisQueue>()
            .init_resource::<AnalysisResultLog>()
            .add_event::<AnalysisCompleted>()
            .add_systems(Update, run_queued_analyses);
    }
}
