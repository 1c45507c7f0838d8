//! Reduces the failures of an exhausted lookup into one caller-facing error.

use std::fmt::{Display, Formatter};

use serde::Serialize;
use thiserror::Error;

use crate::data_source::{ErrorKind, ProviderFailure};
use crate::{ProviderId, ZipCode};

/// Outcome category of a lookup in which every provider failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateKind {
    NotFound,
    AllTimedOut,
    AllUnreachable,
    AllRateLimited,
    Mixed,
}

impl AggregateKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::AllTimedOut => "all_timed_out",
            Self::AllUnreachable => "all_unreachable",
            Self::AllRateLimited => "all_rate_limited",
            Self::Mixed => "mixed",
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::NotFound => "address.not_found",
            Self::AllTimedOut => "address.all_timed_out",
            Self::AllUnreachable => "address.all_unreachable",
            Self::AllRateLimited => "address.all_rate_limited",
            Self::Mixed => "address.all_failed",
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::NotFound => "Address not found",
            Self::AllTimedOut => "All providers timed out",
            Self::AllUnreachable => "All providers are unreachable",
            Self::AllRateLimited => "Rate limit exceeded on all providers",
            Self::Mixed => "Unable to fetch address from any provider",
        }
    }
}

impl Display for AggregateKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single error a caller sees when no provider could resolve a CEP.
///
/// `failures` is only populated for [`AggregateKind::Mixed`]; uniform
/// outcomes carry just the kind and the providers that were consulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("{} for zip code {}", .kind.message(), .zip_code)]
pub struct AggregateFailure {
    kind: AggregateKind,
    zip_code: ZipCode,
    providers: Vec<ProviderId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failures: Vec<ProviderFailure>,
}

impl AggregateFailure {
    pub const fn kind(&self) -> AggregateKind {
        self.kind
    }

    pub fn zip_code(&self) -> &ZipCode {
        &self.zip_code
    }

    pub fn providers(&self) -> &[ProviderId] {
        &self.providers
    }

    pub fn failures(&self) -> &[ProviderFailure] {
        &self.failures
    }

    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub const fn message(&self) -> &'static str {
        self.kind.message()
    }

    pub fn detail(&self) -> String {
        match self.kind {
            AggregateKind::NotFound => format!(
                "No provider could find address for zipCode: {}",
                self.zip_code
            ),
            AggregateKind::AllTimedOut => {
                String::from("Services are slow or unavailable. Please try again later")
            }
            AggregateKind::AllUnreachable => {
                String::from("Network connectivity issues. Please try again in a few moments")
            }
            AggregateKind::AllRateLimited => {
                String::from("Too many requests. Please try again later")
            }
            AggregateKind::Mixed => String::from("Multiple different errors occurred"),
        }
    }
}

/// Builds the aggregate for an ordered list of failures, one per attempt.
///
/// Uniform outcomes are checked first; anything else degrades to `Mixed`,
/// which keeps the full failure list in attempt order.
pub fn aggregate(zip_code: &ZipCode, failures: Vec<ProviderFailure>) -> AggregateFailure {
    let kind = aggregate_kind(&failures);
    let providers = failures.iter().map(|failure| failure.provider).collect();
    let failures = if kind == AggregateKind::Mixed {
        failures
    } else {
        Vec::new()
    };

    AggregateFailure {
        kind,
        zip_code: zip_code.clone(),
        providers,
        failures,
    }
}

fn aggregate_kind(failures: &[ProviderFailure]) -> AggregateKind {
    let all = |kind: ErrorKind| failures.iter().all(|failure| failure.kind == kind);

    if all(ErrorKind::NotFound) {
        AggregateKind::NotFound
    } else if all(ErrorKind::Timeout) {
        AggregateKind::AllTimedOut
    } else if all(ErrorKind::NetworkUnreachable) {
        AggregateKind::AllUnreachable
    } else if all(ErrorKind::RateLimited) {
        AggregateKind::AllRateLimited
    } else {
        AggregateKind::Mixed
    }
}
