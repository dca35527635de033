//! Error types for prospect-triage.

/// Top-level error type for the pipeline binary.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),

    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("CRM error: {0}")]
    Crm(#[from] CrmError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("Progress error: {0}")]
    Progress(#[from] ProgressError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {key}. {hint}")]
    MissingEnvVar { key: String, hint: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Roster ingestion errors.
///
/// A roster row that cannot identify a person is an error, not a default —
/// silently classifying a nameless row would poison the output.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("Roster file has no '{0}' column")]
    MissingColumn(String),

    #[error("Roster row {row} is missing a value for '{field}'")]
    MissingField { row: usize, field: String },

    #[error("Roster file contains no rows")]
    Empty,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// People-directory lookup errors.
///
/// The discovery waterfall converts these into trace notes — a failed
/// lookup never aborts a run.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Rate limit exceeded (429)")]
    RateLimited,

    #[error("Authentication failed (401)")]
    AuthFailed,

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("HTTP {status} - {body}")]
    Http { status: u16, body: String },

    #[error("Request error - {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// CRM query errors.
///
/// Like directory errors these end up as rationale text, never as a
/// run-level failure.
#[derive(Debug, thiserror::Error)]
pub enum CrmError {
    #[error("Rate limit exceeded (429)")]
    RateLimited,

    #[error("Authentication failed (401)")]
    AuthFailed,

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("HTTP {status} - {body}")]
    Http { status: u16, body: String },

    #[error("Request error - {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Output rendering errors.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Progress snapshot persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the pipeline.
pub type Result<T> = std::result::Result<T, Error>;
