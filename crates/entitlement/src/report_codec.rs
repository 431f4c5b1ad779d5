// ---------------------------------------------------------------------------
// report_codec – compact archive encoding of an AnalysisReport
// ---------------------------------------------------------------------------
//
// Layout (little-endian):
//   [0..4]  Magic bytes: "SMDS"
//   [4..8]  Format version (u32)
//   [8..]   bitcode-encoded AnalysisReport
//
// JSON stays the interchange format for the web layer; this is the dense form
// used when reports are cached or exported in bulk.

use crate::analysis::AnalysisReport;
use crate::error::ReportCodecError;

/// Magic bytes identifying an archived report.
pub const REPORT_MAGIC: [u8; 4] = *b"SMDS";

/// Size of the archive header in bytes.
pub const REPORT_HEADER_SIZE: usize = 8;

/// Current archive format version.
pub const REPORT_FORMAT_VERSION: u32 = 1;

/// Encode a report with the archive header prepended.
pub fn encode_report(report: &AnalysisReport) -> Vec<u8> {
    let body = bitcode::encode(report);
    let mut out = Vec::with_capacity(REPORT_HEADER_SIZE + body.len());
    out.extend_from_slice(&REPORT_MAGIC);
    out.extend_from_slice(&REPORT_FORMAT_VERSION.to_le_bytes());
    out.extend_from_slice(&body);
    out
}

/// Decode an archived report, checking the header first.
///
/// # Errors
///
/// - [`ReportCodecError::BadHeader`] if the magic bytes are missing
/// - [`ReportCodecError::VersionMismatch`] for archives from a newer build
/// - [`ReportCodecError::Decode`] for corrupt or truncated payloads
pub fn decode_report(bytes: &[u8]) -> Result<AnalysisReport, ReportCodecError> {
    if bytes.len() < REPORT_HEADER_SIZE || bytes[..4] != REPORT_MAGIC {
        return Err(ReportCodecError::BadHeader);
    }
    let found = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if found > REPORT_FORMAT_VERSION {
        return Err(ReportCodecError::VersionMismatch {
            expected_max: REPORT_FORMAT_VERSION,
            found,
        });
    }
    let report = bitcode::decode(&bytes[REPORT_HEADER_SIZE..])?;
    Ok(report)
}
