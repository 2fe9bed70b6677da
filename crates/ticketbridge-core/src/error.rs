use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid message id: {0:?}")]
    InvalidMessageId(String),
}
