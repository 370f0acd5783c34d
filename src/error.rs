use thiserror::Error;

/// Errors that can occur while computing lime requirements.
#[derive(Error, Debug)]
pub enum LimeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    /// Soil texture text that matches no known texture class.
    #[error("Unrecognized soil texture: '{0}'")]
    Classification(String),

    /// A soil measurement outside its physical domain.
    #[error("Invalid input: {field} = {value} ({reason})")]
    InvalidInput {
        field: String,
        value: f64,
        reason: String,
    },

    /// A calculation parameter outside its allowed domain.
    #[error("Invalid parameter: {field} = {value} ({reason})")]
    InvalidParameter {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown lime product: '{0}'")]
    UnknownProduct(String),

    #[error("Empty input: no soil zones supplied")]
    EmptyInput,

    #[error("Zero area: total area of {zones} zone(s) is 0 ha")]
    ZeroArea { zones: usize },

    /// Incomplete or malformed lookup tables. Fatal at startup.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl LimeError {
    pub(crate) fn invalid_input(field: impl Into<String>, value: f64, reason: &str) -> Self {
        LimeError::InvalidInput {
            field: field.into(),
            value,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn invalid_parameter(
        field: impl Into<String>,
        value: impl ToString,
        reason: &str,
    ) -> Self {
        LimeError::InvalidParameter {
            field: field.into(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}
