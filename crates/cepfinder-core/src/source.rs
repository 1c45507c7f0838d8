use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::ValidationError;

/// Identifier of an address lookup provider.
///
/// Built-in providers have associated constants; custom sources (and test
/// doubles) can mint their own with [`ProviderId::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProviderId(&'static str);

impl ProviderId {
    pub const VIACEP: Self = Self("viacep");
    pub const BRASILAPI: Self = Self("brasilapi");

    pub const BUILTIN: [Self; 2] = [Self::VIACEP, Self::BRASILAPI];

    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ProviderId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "viacep" => Ok(Self::VIACEP),
            "brasilapi" => Ok(Self::BRASILAPI),
            other => Err(ValidationError::InvalidProvider {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_builtin_providers_case_insensitively() {
        assert_eq!("ViaCEP".parse::<ProviderId>(), Ok(ProviderId::VIACEP));
        assert_eq!(" brasilapi ".parse::<ProviderId>(), Ok(ProviderId::BRASILAPI));
    }

    #[test]
    fn rejects_unknown_provider() {
        let err = "postmon".parse::<ProviderId>().expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidProvider { .. }));
    }

    #[test]
    fn serializes_as_plain_name() {
        let json = serde_json::to_string(&ProviderId::VIACEP).expect("serializes");
        assert_eq!(json, "\"viacep\"");
    }
}
