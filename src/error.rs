use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiffSelError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid columns for {table}: missing {missing:?}, unexpected {unexpected:?}")]
    Schema {
        table: String,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("inconsistent {what} between {left} and {right} at site {site}")]
    Alignment {
        what: String,
        left: String,
        right: String,
        site: i64,
    },

    #[error("error-control count of 0 for wildtype at site {site}")]
    DegenerateControl { site: i64 },

    #[error("translate_to_aa requires codon counts: {0}")]
    AlphabetMismatch(String),

    #[error("invalid parameter: {name} = {value}, {message}")]
    InvalidParameter {
        name: String,
        value: String,
        message: String,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("data error: {0}")]
    Data(String),
}

/// Type alias for Result with DiffSelError
pub type Result<T> = std::result::Result<T, DiffSelError>;

impl DiffSelError {
    /// Create a new InvalidParameter error
    pub fn invalid_parameter(
        name: impl Into<String>,
        value: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        DiffSelError::InvalidParameter {
            name: name.into(),
            value: value.to_string(),
            message: message.into(),
        }
    }

    /// Create a new Data error
    pub fn data(message: impl Into<String>) -> Self {
        DiffSelError::Data(message.into())
    }
}
