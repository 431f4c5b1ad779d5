pub mod analysis;
pub mod analysis_protocol;
pub mod analysis_queue;
pub mod annotate;
pub mod density_bonus;
pub mod engine_params;
pub mod error;
pub mod laws;
pub mod parcel;
pub mod recommend;
pub mod report_codec;
pub mod scenario;
pub mod standards;
pub mod transit_parking;

pub use analysis::{analyze_parcel, AnalysisReport, AnalysisRequest};
pub use analysis_queue::{
    AnalysisCompleted, AnalysisQueue, AnalysisResultLog, EntitlementPlugin, RequestSource,
};
pub use engine_params::{EngineParams, HeightStackingPolicy};
pub use error::{AssemblageError, ConfigError, ParcelValidationError, ReportCodecError};
pub use laws::{AffordabilityThreshold, JurisdictionStatus};
pub use parcel::{combine_parcels, ParcelAttributes, ProposedProjectOptions};
pub use recommend::Recommendation;
pub use report_codec::{decode_report, encode_report};
pub use scenario::{DevelopmentScenario, EligibilityResult, Law, LawOutcome};
pub use standards::{DevelopmentStandards, StandardsTables};
