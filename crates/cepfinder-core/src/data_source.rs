//! Address source trait and per-provider error types.
//!
//! This module defines the adapter contract (`AddressSource`) that every
//! provider implementation follows, the raw failure signal adapters emit
//! (`FetchError`), and the classified failure (`SourceError`) the resolver
//! works with.
//!
//! # Example
//!
//! ```rust,ignore
//! use cepfinder_core::{AddressSource, ViaCepAdapter, ZipCode};
//!
//! async fn fetch(adapter: &ViaCepAdapter) {
//!     let zip_code = ZipCode::parse("01310-100").expect("valid CEP");
//!     match adapter.fetch(&zip_code).await {
//!         Ok(address) => println!("{} - {}", address.street, address.city),
//!         Err(error) => eprintln!("viacep failed: {error}"),
//!     }
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::http_client::HttpError;
use crate::{Address, ProviderId, UtcDateTime, ZipCode};

/// Closed taxonomy of per-provider failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Timeout,
    /// The provider answered with a server-side error.
    Unavailable,
    RateLimited,
    NetworkUnreachable,
    Unknown,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Timeout => "timeout",
            Self::Unavailable => "unavailable",
            Self::RateLimited => "rate_limited",
            Self::NetworkUnreachable => "network_unreachable",
            Self::Unknown => "unknown",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified provider failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: ErrorKind,
    message: String,
}

impl SourceError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            ErrorKind::NotFound => "source.not_found",
            ErrorKind::Timeout => "source.timeout",
            ErrorKind::Unavailable => "source.unavailable",
            ErrorKind::RateLimited => "source.rate_limited",
            ErrorKind::NetworkUnreachable => "source.network_unreachable",
            ErrorKind::Unknown => "source.unknown",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Raw failure signal produced at the adapter boundary, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The provider answered with a non-success HTTP status.
    Status { status: u16, message: String },
    /// The request never produced a response.
    Transport(HttpError),
    /// Any other failure described only by text (e.g. an undecodable body).
    Message(String),
    /// A failure the adapter already classified; kept as-is by the classifier.
    Classified(SourceError),
}

impl FetchError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Status { message, .. } | Self::Message(message) => message,
            Self::Transport(error) => error.message(),
            Self::Classified(error) => error.message(),
        }
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            // Adapters already put the status into the message.
            Self::Status { message, .. } => f.write_str(message),
            Self::Transport(error) => write!(f, "{error}"),
            Self::Message(message) => f.write_str(message),
            Self::Classified(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<HttpError> for FetchError {
    fn from(error: HttpError) -> Self {
        Self::Transport(error)
    }
}

impl From<SourceError> for FetchError {
    fn from(error: SourceError) -> Self {
        Self::Classified(error)
    }
}

/// One failed attempt against one provider during a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderFailure {
    pub provider: ProviderId,
    pub kind: ErrorKind,
    pub message: String,
    pub timestamp: UtcDateTime,
}

impl ProviderFailure {
    pub fn new(provider: ProviderId, error: SourceError) -> Self {
        Self {
            provider,
            kind: error.kind,
            message: error.message,
            timestamp: UtcDateTime::now(),
        }
    }
}

/// Address provider contract.
///
/// Each implementation owns its endpoint and its mapping from the provider's
/// response shape to [`Address`]. One call is one outbound request: retrying
/// and failover belong to the resolver.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` as they are shared across lookups.
pub trait AddressSource: Send + Sync {
    /// Returns the provider identifier.
    fn id(&self) -> ProviderId;

    /// Base endpoint the adapter talks to, used for diagnostics.
    fn endpoint(&self) -> &str;

    /// Fetches and normalizes the address for `zip_code`.
    ///
    /// # Errors
    ///
    /// Returns the raw [`FetchError`] signal; a body-level "not found"
    /// sentinel is reported as [`FetchError::Classified`] with
    /// [`ErrorKind::NotFound`].
    fn fetch<'a>(
        &'a self,
        zip_code: &'a ZipCode,
    ) -> Pin<Box<dyn Future<Output = Result<Address, FetchError>> + Send + 'a>>;
}
