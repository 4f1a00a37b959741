//! Error types for monitor-stream parsing

use thiserror::Error;

/// Errors that can occur while parsing a telemetry broadcast
///
/// Trace-line grammar mismatches are not errors (the decoder returns
/// `None` and the caller falls back to raw display); only the telemetry
/// format, which the firmware emits machine-generated, reports faults.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Line does not carry the `<UI C>:` telemetry marker
    #[error("not a telemetry broadcast")]
    NotTelemetry,

    /// Payload after the marker has no `=ID:VALUE` fields
    #[error("telemetry payload has no fields")]
    EmptyTelemetry,

    /// Field ID is not two hex digits
    #[error("invalid telemetry field id in: {0}")]
    InvalidFieldId(String),
}
