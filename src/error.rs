use thiserror::Error;

pub type Result<T> = std::result::Result<T, GrindError>;

#[derive(Error, Debug)]
pub enum GrindError {
    #[error("Git log source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// Manual From implementation for unboxed to boxed conversion
impl From<gix::discover::Error> for GrindError {
    fn from(err: gix::discover::Error) -> Self {
        GrindError::GitDiscover(Box::new(err))
    }
}
