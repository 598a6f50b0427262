use thiserror::Error;

/// A date string that is not a real `DD-MM-YY` calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date: {input:?}")]
pub struct InvalidDate {
    pub input: String,
}

impl InvalidDate {
    pub fn new(input: impl Into<String>) -> Self {
        Self { input: input.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("No {suffix} file found in the ZIP.")]
    NoTextEntry { suffix: String },
    #[error("Failed to extract text from the ZIP file: {0}")]
    CorruptArchive(String),
}

/// The user picked something that is not a ZIP archive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Please upload a ZIP file.")]
pub struct ValidationError {
    pub file_name: String,
}

/// Failure talking to the remote extraction service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("request to {endpoint} failed: {message}")]
    Request { endpoint: String, message: String },
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("failed to decode {endpoint} response: {message}")]
    Decode { endpoint: String, message: String },
}

impl NetworkError {
    pub fn endpoint(&self) -> &str {
        match self {
            Self::Request { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Decode { endpoint, .. } => endpoint,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no account is connected")]
    NotConnected,
}

/// Why an event cannot be pushed to the external calendar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("Invalid date format: {0}")]
    Date(String),
    #[error("Invalid time format: {0}")]
    Time(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
