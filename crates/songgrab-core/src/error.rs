use thiserror::Error;

#[derive(Debug, Error)]
pub enum SonggrabError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("api error: {0}")]
    Api(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("csv error: {0}")]
    Csv(String),
}

pub type SonggrabResult<T> = Result<T, SonggrabError>;
