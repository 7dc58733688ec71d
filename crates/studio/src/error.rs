use thiserror::Error;

/// Errors raised by the massing core
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StudioError {
    /// Generator output could not be decomposed into mass entries
    #[error("Malformed layout: {0}")]
    MalformedLayout(String),

    /// No scene adapter attached yet
    #[error("Scene adapter unavailable")]
    AdapterUnavailable,

    /// A visual or id has no registry counterpart
    #[error("No mass registered for {0}")]
    LookupMiss(String),
}

/// Errors from the generator round trip
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("A generation request is already in flight")]
    Busy,

    #[error("Generator request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Generator answered {0}")]
    Status(reqwest::StatusCode),

    #[error("Generator task dropped before answering")]
    Cancelled,

    #[error("Failed to start async runtime: {0}")]
    Runtime(std::io::Error),
}
