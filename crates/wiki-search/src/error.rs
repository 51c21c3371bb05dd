#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Unsupported {what} version: {version}")]
    UnsupportedVersion { what: &'static str, version: u32 },

    #[error("Unknown persisted node class: {0}")]
    UnknownNodeClass(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Search node cannot be persisted: {0}")]
    NotPersistable(&'static str),

    #[error("A corpus search session is already active")]
    SessionActive,

    #[error("Corpus error: {0}")]
    Corpus(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;
