// ---------------------------------------------------------------------------
// Error types for the few conditions that abort an analysis
// ---------------------------------------------------------------------------
//
// Ineligibility and unrecognised zone/overlay codes are normal outcomes and
// never surface here. Only structurally invalid input, malformed configuration
// and codec failures do.

use std::fmt;

/// A parcel or proposal that cannot be analysed because its shape is invalid.
///
/// Raised before any law is evaluated; indicates a caller bug rather than a
/// property of the parcel.
#[derive(Debug, Clone, PartialEq)]
pub enum ParcelValidationError {
    /// Lot area is negative, NaN or infinite.
    InvalidLotArea(f64),
    /// A dimension, distance or area field is negative, NaN or infinite.
    InvalidMeasurement { field: &'static str, value: f64 },
    /// Development tier outside 1..=3.
    InvalidDevelopmentTier(u8),
    /// Affordability target outside 0..=100 percent.
    InvalidAffordabilityTarget(f64),
    /// Unit-mix shares are negative or do not sum to one.
    InvalidUnitMix(String),
}

impl fmt::Display for ParcelValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParcelValidationError::InvalidLotArea(v) => {
                write!(f, "Invalid lot area: {v} sqft (must be finite and >= 0)")
            }
            ParcelValidationError::InvalidMeasurement { field, value } => {
                write!(f, "Invalid {field}: {value} (must be finite and >= 0)")
            }
            ParcelValidationError::InvalidDevelopmentTier(t) => {
                write!(f, "Invalid development tier: {t} (expected 1, 2 or 3)")
            }
            ParcelValidationError::InvalidAffordabilityTarget(v) => {
                write!(f, "Invalid affordability target: {v}% (expected 0-100)")
            }
            ParcelValidationError::InvalidUnitMix(msg) => write!(f, "Invalid unit mix: {msg}"),
        }
    }
}

impl std::error::Error for ParcelValidationError {}

/// Failure to combine parcels into an assemblage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblageError {
    /// No parcels were supplied.
    Empty,
}

impl fmt::Display for AssemblageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssemblageError::Empty => write!(f, "Cannot combine an empty list of parcels"),
        }
    }
}

impl std::error::Error for AssemblageError {}

/// Errors loading lookup tables or engine parameters from JSON.
#[derive(Debug)]
pub enum ConfigError {
    /// The document is not valid JSON for the expected shape.
    Json(serde_json::Error),
    /// The document parsed but a value violates a table invariant.
    InvalidValue(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Json(e) => write!(f, "Configuration parse error: {e}"),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Json(e) => Some(e),
            ConfigError::InvalidValue(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

/// Errors encoding or decoding an archived analysis report.
#[derive(Debug)]
pub enum ReportCodecError {
    /// Bytes do not start with the expected header.
    BadHeader,
    /// Archive format version is newer than this build supports.
    VersionMismatch { expected_max: u32, found: u32 },
    /// Bitcode decoding failed (corrupt or truncated data).
    Decode(String),
}

impl fmt::Display for ReportCodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportCodecError::BadHeader => write!(f, "Not an archived analysis report"),
            ReportCodecError::VersionMismatch {
                expected_max,
                found,
            } => write!(
                f,
                "Version mismatch: report is v{found}, but this build only supports up to v{expected_max}"
            ),
            ReportCodecError::Decode(msg) => write!(f, "Decoding error: {msg}"),
        }
    }
}

impl std::error::Error for ReportCodecError {}

impl From<bitcode::Error> for ReportCodecError {
    fn from(e: bitcode::Error) -> Self {
        ReportCodecError::Decode(e.to_string())
    }
}
