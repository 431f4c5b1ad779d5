//! Unit tests for the analysis service plugin.

use bevy::prelude::*;

use super::*;
use crate::analysis::AnalysisRequest;
use crate::engine_params::EngineParams;
use crate::error::ParcelValidationError;
use crate::parcel::{FireHazardClass, ParcelAttributes};
use crate::standards::StandardsTables;

fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(EntitlementPlugin);
    app.update();
    app
}

fn r2_request(id: &str, lot_area_sqft: f64) -> AnalysisRequest {
    let mut parcel = ParcelAttributes {
        parcel_id: format!("parcel-{id}"),
        zone_code: "R2".to_string(),
        lot_area_sqft,
        ..Default::default()
    };
    parcel.constraints.fire_hazard = FireHazardClass::NotInZone;
    AnalysisRequest {
        request_id: id.to_string(),
        parcel,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Plugin wiring
// ---------------------------------------------------------------------------

#[test]
fn test_plugin_registers_resources() {
    let app = test_app();
    let world = app.world();
    assert!(world.contains_resource::<StandardsTables>());
    assert!(world.contains_resource::<EngineParams>());
    assert!(world.contains_resource::<AnalysisQueue>());
    assert!(world.contains_resource::<AnalysisResultLog>());
    assert!(world.contains_resource::<Events<AnalysisCompleted>>());
}

#[test]
fn test_preinserted_params_are_kept() {
    let mut params = EngineParams::default();
    params.transit.radius_miles = 0.25;

    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(params);
    app.add_plugins(EntitlementPlugin);
    app.update();

    let radius = app.world().resource::<EngineParams>().transit.radius_miles;
    assert!((radius - 0.25).abs() < f64::EPSILON);
}

// ---------------------------------------------------------------------------
// Executor
// ---------------------------------------------------------------------------

#[test]
fn test_queued_request_is_analysed_on_update() {
    let mut app = test_app();
    let ticket = app
        .world_mut()
        .resource_mut::<AnalysisQueue>()
        .push(RequestSource::Agent, r2_request("a", 10_000.0));
    app.update();

    assert!(app.world().resource::<AnalysisQueue>().is_empty());
    let log = app.world().resource::<AnalysisResultLog>();
    let entry = log.find_ticket(ticket).expect("result logged");
    assert_eq!(entry.request_id, "a");
    let report = entry.result.as_ref().expect("valid request");
    assert_eq!(report.parcel_id, "parcel-a");
    assert!(report.recommended_scenario().is_some());
}

#[test]
fn test_results_logged_in_submission_order() {
    let mut app = test_app();
    {
        let mut queue = app.world_mut().resource_mut::<AnalysisQueue>();
        for (i, lot) in [5_000.0, 10_000.0, 20_000.0, 40_000.0].iter().enumerate() {
            queue.push(RequestSource::Batch, r2_request(&format!("r{i}"), *lot));
        }
    }
    app.update();

    let log = app.world().resource::<AnalysisResultLog>();
    let ids: Vec<&str> = log.last_n(4).iter().map(|e| e.request_id.as_str()).collect();
    assert_eq!(ids, vec!["r0", "r1", "r2", "r3"]);
    let tickets: Vec<u64> = log.last_n(4).iter().map(|e| e.ticket).collect();
    assert_eq!(tickets, vec![0, 1, 2, 3]);
}

#[test]
fn test_invalid_request_logged_as_error() {
    let mut app = test_app();
    app.world_mut()
        .resource_mut::<AnalysisQueue>()
        .push(RequestSource::Api, r2_request("bad", -10.0));
    app.update();

    let log = app.world().resource::<AnalysisResultLog>();
    let last = &log.last_n(1)[0];
    assert_eq!(
        last.result,
        Err(ParcelValidationError::InvalidLotArea(-10.0))
    );
}

#[test]
fn test_completion_event_only_for_successes() {
    let mut app = test_app();
    {
        let mut queue = app.world_mut().resource_mut::<AnalysisQueue>();
        queue.push(RequestSource::Api, r2_request("ok", 10_000.0));
        queue.push(RequestSource::Api, r2_request("bad", f64::NAN));
    }
    app.update();

    let events = app.world().resource::<Events<AnalysisCompleted>>();
    let sent: Vec<&AnalysisCompleted> = events.iter_current_update_events().collect();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].request_id, "ok");
    assert!(sent[0].scenario_count > 0);
    assert!(sent[0].recommended.is_some());
}

#[test]
fn test_empty_queue_is_noop() {
    let mut app = test_app();
    app.update();
    app.update();
    assert!(app.world().resource::<AnalysisResultLog>().is_empty());
}
