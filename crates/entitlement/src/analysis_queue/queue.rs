use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisRequest;

/// Who submitted a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestSource {
    Agent,
    Api,
    Batch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedAnalysis {
    /// Monotonic per-queue ticket, used to match results to submissions.
    pub ticket: u64,
    pub source: RequestSource,
    pub request: AnalysisRequest,
}

/// Pending analysis requests, drained once per update.
#[derive(Resource, Debug, Clone, Default)]
pub struct AnalysisQueue {
    pending: Vec<QueuedAnalysis>,
    next_ticket: u64,
}

impl AnalysisQueue {
    /// Enqueue a request and return its ticket.
    pub fn push(&mut self, source: RequestSource, request: AnalysisRequest) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.pending.push(QueuedAnalysis {
            ticket,
            source,
            request,
        });
        ticket
    }

    pub fn drain(&mut self) -> Vec<QueuedAnalysis> {
        self.pending.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
