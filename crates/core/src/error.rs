use thiserror::Error;

/// Top-level error type for internal/programmer faults.
///
/// Admission denials are data (see [`crate::request::ExecutionResponse`]),
/// never an [`AdmissionError`] — this type exists only for faults that must
/// surface as a transport-level error or a process exit code.
#[derive(Debug, Error)]
pub enum AdmissionError {
    #[error("internal error: {0}")]
    Internal(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("transport error: {0}")]
    Transport(String),
}
