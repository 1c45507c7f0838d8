//! Maps raw adapter failures onto the [`ErrorKind`] taxonomy.
//!
//! Rules are evaluated in priority order and the first match wins:
//!
//! | # | Signal | Kind |
//! |---|--------|------|
//! | 1 | HTTP 404, "not found", "cep não encontrado" | `NotFound` |
//! | 2 | transport timeout, "timeout" | `Timeout` |
//! | 3 | HTTP 429, "rate limit", "too many requests" | `RateLimited` |
//! | 4 | refused/reset/DNS/unreachable transport codes, "network" | `NetworkUnreachable` |
//! | 5 | HTTP 5xx | `Unavailable` |
//! | 6 | anything else | `Unknown` |
//!
//! A [`FetchError::Classified`] input short-circuits all rules.

use crate::data_source::{ErrorKind, FetchError, SourceError};
use crate::http_client::TransportErrorCode;

const NOT_FOUND_PHRASES: [&str; 2] = ["not found", "cep não encontrado"];
const TIMEOUT_PHRASES: [&str; 1] = ["timeout"];
const RATE_LIMIT_PHRASES: [&str; 2] = ["rate limit", "too many requests"];
const NETWORK_PHRASES: [&str; 1] = ["network"];

/// Returns the kind of a raw failure.
pub fn classify(error: &FetchError) -> ErrorKind {
    if let FetchError::Classified(source_error) = error {
        return source_error.kind();
    }

    let status = match error {
        FetchError::Status { status, .. } => Some(*status),
        _ => None,
    };
    let code = match error {
        FetchError::Transport(http_error) => Some(http_error.code()),
        _ => None,
    };
    let text = error.text().to_lowercase();

    if status == Some(404) || mentions(&text, &NOT_FOUND_PHRASES) {
        ErrorKind::NotFound
    } else if code == Some(TransportErrorCode::Timeout) || mentions(&text, &TIMEOUT_PHRASES) {
        ErrorKind::Timeout
    } else if status == Some(429) || mentions(&text, &RATE_LIMIT_PHRASES) {
        ErrorKind::RateLimited
    } else if code.is_some_and(TransportErrorCode::is_connectivity)
        || mentions(&text, &NETWORK_PHRASES)
    {
        ErrorKind::NetworkUnreachable
    } else if status.is_some_and(|status| (500..600).contains(&status)) {
        ErrorKind::Unavailable
    } else {
        ErrorKind::Unknown
    }
}

fn mentions(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| text.contains(phrase))
}

/// Classifies `error` and keeps its message.
pub fn into_source_error(error: FetchError) -> SourceError {
    match error {
        FetchError::Classified(source_error) => source_error,
        other => {
            let kind = classify(&other);
            SourceError::new(kind, other.to_string())
        }
    }
}
