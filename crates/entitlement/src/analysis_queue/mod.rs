//! Bevy-hosted analysis service: requests are queued, analysed in parallel on
//! the compute task pool, and their results kept in a ring-buffer log.

pub mod executor;
pub mod plugin;
pub mod queue;
pub mod result_log;

pub use executor::{run_queued_analyses, AnalysisCompleted};
pub use plugin::EntitlementPlugin;
pub use queue::{AnalysisQueue, QueuedAnalysis, RequestSource};
pub use result_log::{AnalysisResultLog, LoggedAnalysis};

#[cfg(test)]
mod tests;
