use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("field {field}: cannot parse {raw:?} as a number")]
pub struct ParseError {
    pub field: &'static str,
    pub raw: String,
}

impl ParseError {
    pub fn new(field: &'static str, raw: impl Into<String>) -> Self {
        Self {
            field,
            raw: raw.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("required field missing: {field}")]
pub struct ValidationError {
    pub field: &'static str,
}

impl ValidationError {
    pub fn missing(field: &'static str) -> Self {
        Self { field }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid input: {message}")]
pub struct InvalidInputError {
    pub message: String,
}

impl InvalidInputError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("configuration error: {message}")]
pub struct ConfigurationError {
    pub message: String,
}

impl ConfigurationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FinanceError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
