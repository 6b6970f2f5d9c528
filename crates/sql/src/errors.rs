use thiserror::Error;

/// A statement could not be recognized as one of the supported shapes.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid SQL statement: {reason}")]
pub struct ParseError {
    pub reason: String,
}

impl ParseError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
