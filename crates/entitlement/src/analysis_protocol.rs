//! Text protocol types for the headless analysis agent.
//!
//! Defines the JSON command/response envelope that the web layer and scripts
//! use to drive the engine over newline-delimited JSON on stdin/stdout. The
//! I/O loop itself lives in `crates/app/src/agent_mode.rs`.

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisReport, AnalysisRequest};
use crate::engine_params::EngineParams;
use crate::laws::JurisdictionStatus;
use crate::parcel::{ParcelAttributes, ProposedProjectOptions};

// ---------------------------------------------------------------------------
// Commands (stdin → engine)
// ---------------------------------------------------------------------------

/// A single command read from one line of stdin. `cmd` is the tag.
#[derive(Debug, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum AnalysisCommand {
    /// Analyse one parcel.
    Analyze { request: AnalysisRequest },

    /// Combine adjacent parcels into one assemblage, then analyse it.
    AnalyzeAssemblage {
        #[serde(default)]
        request_id: String,
        parcels: Vec<ParcelAttributes>,
        #[serde(default)]
        proposed: Option<ProposedProjectOptions>,
        #[serde(default)]
        jurisdiction: JurisdictionStatus,
    },

    /// Report the engine parameters currently in effect.
    Params,

    /// End the session.
    Quit,
}

// ---------------------------------------------------------------------------
// Responses (engine → stdout)
// ---------------------------------------------------------------------------

/// Every response carries the protocol version and a tagged payload.
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub protocol_version: u32,
    #[serde(flatten)]
    pub payload: ResponsePayload,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponsePayload {
    /// The engine is ready to accept commands.
    Ready,

    /// A completed analysis.
    Report { report: Box<AnalysisReport> },

    /// The command could not be parsed or the request was rejected.
    Error { message: String },

    /// Response to `params`.
    Params { params: EngineParams },

    /// The session is ending (response to `quit`).
    Goodbye,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Bump when the command/response schema changes.
pub const PROTOCOL_VERSION: u32 = 1;

pub fn make_response(payload: ResponsePayload) -> AnalysisResponse {
    AnalysisResponse {
        protocol_version: PROTOCOL_VERSION,
        payload,
    }
}
