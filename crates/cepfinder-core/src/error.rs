use thiserror::Error;

/// Validation and contract errors exposed by `cepfinder-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("zip code must contain exactly 8 digits: '{value}'")]
    InvalidZipCode { value: String },

    #[error("invalid provider '{value}', expected one of viacep, brasilapi")]
    InvalidProvider { value: String },
    #[error("provider list must contain at least one provider")]
    EmptyProviderList,
    #[error("provider '{value}' is listed more than once")]
    DuplicateProvider { value: String },

    #[error("environment variable {name} has invalid value '{value}'")]
    InvalidEnvValue { name: &'static str, value: String },
}
