use serde::{Deserialize, Serialize};

use super::zip_code::strip_non_digits;

/// Canonical address record, independent of the provider that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub zip_code: String,
    pub state: String,
    pub city: String,
    pub neighborhood: String,
    pub street: String,
}

impl Address {
    /// Builds a record, re-emitting `zip_code` as digits only.
    pub fn new(
        zip_code: &str,
        state: impl Into<String>,
        city: impl Into<String>,
        neighborhood: impl Into<String>,
        street: impl Into<String>,
    ) -> Self {
        Self {
            zip_code: strip_non_digits(zip_code),
            state: state.into(),
            city: city.into(),
            neighborhood: neighborhood.into(),
            street: street.into(),
        }
    }
}
