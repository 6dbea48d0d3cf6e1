use thiserror::Error;

/// Validation failures raised when a persisted trade record is turned into a [`crate::Trade`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Trade record is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Invalid input for {0}: {1}")]
    InvalidInput(&'static str, String),
}
