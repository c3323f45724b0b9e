//! Roster source errors

/// Failure loading a roster from a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Player API returned status {0}")]
    Status(u16),

    #[error("Invalid player list: {0}")]
    Decode(String),
}
