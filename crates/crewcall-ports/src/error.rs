use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PortError {
    #[error("not found")]
    NotFound,
    #[error("session expired or unauthorized")]
    Unauthorized,
    #[error("timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("persistence error: {0}")]
    Persistence(String),
}
