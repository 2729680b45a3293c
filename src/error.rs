use thiserror::Error;

/// Failures writing or reading the saved score.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures loading an embedded passage corpus.
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Corpus not found: {0}")]
    NotFound(String),

    #[error("Corpus {name} is not valid: {reason}")]
    Invalid { name: String, reason: String },

    #[error("Corpus {0} has no passages")]
    Empty(String),
}
