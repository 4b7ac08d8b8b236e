// Error types for the release notes kit.
// Covers request construction, transport, decoding, and configuration failures.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReleaseNotesError {
    #[error("lookup URL could not be constructed: {0}")]
    MalformedUrl(String),

    #[error("lookup returned no data: {0}")]
    MalformedData(String),

    #[error("lookup response could not be parsed: {0}")]
    ParsingFailure(String),

    #[error("lookup returned no results")]
    NoResults,

    #[error("no app ID configured, call set_app before fetching release notes")]
    NotConfigured,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl ReleaseNotesError {
    /// Short, stable name for the error kind (used in logs and CLI output).
    pub fn kind(&self) -> &'static str {
        match self {
            ReleaseNotesError::MalformedUrl(_) => "malformedURL",
            ReleaseNotesError::MalformedData(_) => "malformedData",
            ReleaseNotesError::ParsingFailure(_) => "parsingFailure",
            ReleaseNotesError::NoResults => "noResults",
            ReleaseNotesError::NotConfigured => "notConfigured",
            ReleaseNotesError::Io(_) => "io",
            ReleaseNotesError::Other(_) => "other",
        }
    }
}

pub type Result<T> = std::result::Result<T, ReleaseNotesError>;
