use thiserror::Error;

#[derive(Error, Debug)]
pub enum PinsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Notes adapter error: {0}")]
    Adapter(String),
}

impl From<confique::Error> for PinsError {
    fn from(err: confique::Error) -> Self {
        PinsError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PinsError>;
