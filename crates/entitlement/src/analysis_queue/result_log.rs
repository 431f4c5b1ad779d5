//! Ring-buffer log of recently completed analyses.
//!
//! [`AnalysisResultLog`] keeps the last 64 results so callers (the agent loop,
//! tests) can read what happened without listening for events.

use bevy::prelude::*;

use crate::analysis::AnalysisReport;
use crate::error::ParcelValidationError;

/// Maximum number of entries retained in the ring buffer.
const MAX_ENTRIES: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct LoggedAnalysis {
    pub ticket: u64,
    pub request_id: String,
    pub result: Result<AnalysisReport, ParcelValidationError>,
}

/// The last [`MAX_ENTRIES`] analysis results, oldest first.
#[derive(Resource, Debug, Clone, Default)]
pub struct AnalysisResultLog {
    entries: Vec<LoggedAnalysis>,
}

impl AnalysisResultLog {
    /// Record a result, evicting the oldest entry when full.
    pub fn push(&mut self, entry: LoggedAnalysis) {
        if self.entries.len() >= MAX_ENTRIES {
            self.entries.remove(0);
        }
        self.entries.push(entry);
    }

    /// Return the last `n` entries (or fewer if the log is shorter).
    pub fn last_n(&self, n: usize) -> &[LoggedAnalysis] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn find_ticket(&self, ticket: u64) -> Option<&LoggedAnalysis> {
        self.entries.iter().rev().find(|e| e.ticket == ticket)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(ticket: u64) -> LoggedAnalysis {
        LoggedAnalysis {
            ticket,
            request_id: format!("r{ticket}"),
            result: Err(ParcelValidationError::InvalidLotArea(-1.0)),
        }
    }

    #[test]
    fn push_and_last_n() {
        let mut log = AnalysisResultLog::default();
        log.push(rejected(0));
        log.push(rejected(1));

        let last = log.last_n(1);
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].ticket, 1);
        assert_eq!(log.last_n(10).len(), 2);
    }

    #[test]
    fn evicts_oldest_when_full() {
        let mut log = AnalysisResultLog::default();
        for i in 0..70 {
            log.push(rejected(i));
        }
        assert_eq!(log.len(), MAX_ENTRIES);
        // 70 - 64
        assert_eq!(log.last_n(MAX_ENTRIES)[0].ticket, 6);
        assert!(log.find_ticket(3).is_none());
        assert_eq!(log.find_ticket(42).map(|e| e.request_id.as_str()), Some("r42"));
    }

    #[test]
    fn clear_empties_log() {
        let mut log = AnalysisResultLog::default();
        log.push(rejected(0));
        assert!(!log.is_empty());
        log.clear();
        assert!(log.is_empty());
    }
}
