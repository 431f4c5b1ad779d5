//! Headless agent: a blocking loop that reads JSON commands from stdin and
//! writes one JSON response per line to stdout.
//!
//! ## Protocol
//!
//! Each line of stdin is a JSON object with a `"cmd"` discriminator. Each
//! line of stdout carries `"protocol_version"` and `"type"`. See
//! [`entitlement::analysis_protocol`] for the schema.

use std::io::{BufRead, Write};

use bevy::prelude::*;

use entitlement::analysis_protocol::{
    make_response, AnalysisCommand, AnalysisResponse, ResponsePayload, PROTOCOL_VERSION,
};
use entitlement::{
    AnalysisQueue, AnalysisRequest, AnalysisResultLog, EngineParams, EntitlementPlugin,
    RequestSource, StandardsTables,
};

pub fn run_agent_mode(tables: StandardsTables, params: EngineParams) {
    // -- Minimal Bevy app: no window, no rendering --------------------------
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(tables);
    app.insert_resource(params);
    app.add_plugins(EntitlementPlugin);

    // Initial update so resources and events initialize.
    app.update();

    // -- I/O setup -----------------------------------------------------------
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();

    write_response(&mut stdout, &make_response(ResponsePayload::Ready));

    // stderr only; stdout is reserved for the protocol.
    eprintln!("entitlement agent v{PROTOCOL_VERSION} ready, waiting for commands on stdin");

    // -- Main command loop ---------------------------------------------------
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("stdin read error: {e}");
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let cmd: AnalysisCommand = match serde_json::from_str(&line) {
            Ok(c) => c,
            Err(e) => {
                let resp = make_response(ResponsePayload::Error {
                    message: format!("Parse error: {e}"),
                });
                write_response(&mut stdout, &resp);
                continue;
            }
        };

        let response = process_command(cmd, &mut app);
        let is_goodbye = matches!(response.payload, ResponsePayload::Goodbye);
        write_response(&mut stdout, &response);

        if is_goodbye {
            break;
        }
    }

    eprintln!("entitlement agent shutting down");
}

/// Write one response line. A response that fails to serialize is replaced
/// by an error line so the caller never waits on a missing reply.
fn write_response(out: &mut impl Write, response: &AnalysisResponse) {
    let line = serde_json::to_string(response).unwrap_or_else(|e| {
        serde_json::json!({
            "protocol_version": PROTOCOL_VERSION,
            "type": "error",
            "message": format!("Serialization error: {e}"),
        })
        .to_string()
    });
    let _ = writeln!(out, "{line}");
    let _ = out.flush();
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

fn process_command(cmd: AnalysisCommand, app: &mut App) -> AnalysisResponse {
    match cmd {
        AnalysisCommand::Analyze { request } => run_analysis(app, request),

        AnalysisCommand::AnalyzeAssemblage {
            request_id,
            parcels,
            proposed,
            jurisdiction,
        } => match AnalysisRequest::from_assemblage(request_id, &parcels, proposed, jurisdiction) {
            Ok(request) => run_analysis(app, request),
            Err(e) => make_response(ResponsePayload::Error {
                message: e.to_string(),
            }),
        },

        AnalysisCommand::Params => {
            let params = app
                .world()
                .get_resource::<EngineParams>()
                .cloned()
                .unwrap_or_default();
            make_response(ResponsePayload::Params { params })
        }

        AnalysisCommand::Quit => make_response(ResponsePayload::Goodbye),
    }
}

/// Queue one request, run a single update so the executor picks it up, then
/// read the result back from the log.
fn run_analysis(app: &mut App, request: AnalysisRequest) -> AnalysisResponse {
    let ticket = app
        .world_mut()
        .resource_mut::<AnalysisQueue>()
        .push(RequestSource::Agent, request);

    app.update();

    let logged = app
        .world()
        .get_resource::<AnalysisResultLog>()
        .and_then(|log| log.find_ticket(ticket).map(|entry| entry.result.clone()));

    match logged {
        Some(Ok(report)) => make_response(ResponsePayload::Report {
            report: Box::new(report),
        }),
        Some(Err(e)) => make_response(ResponsePayload::Error {
            message: e.to_string(),
        }),
        None => make_response(ResponsePayload::Error {
            message: format!("Analysis #{ticket} produced no result"),
        }),
    }
}
