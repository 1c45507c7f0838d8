use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

/// Default per-request timeout applied by adapters.
pub const DEFAULT_TIMEOUT_MS: u64 = 3_000;

/// HTTP request envelope used by adapter transport calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub timeout_ms: u64,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// HTTP response envelope returned by an adapter transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok_json(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Transport failure category, mirroring the socket-level error codes a
/// client can observe before any HTTP status is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorCode {
    Timeout,
    ConnectionRefused,
    ConnectionReset,
    DnsNotFound,
    NetworkUnreachable,
    HostUnreachable,
    Other,
}

impl TransportErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::ConnectionRefused => "connection_refused",
            Self::ConnectionReset => "connection_reset",
            Self::DnsNotFound => "dns_not_found",
            Self::NetworkUnreachable => "network_unreachable",
            Self::HostUnreachable => "host_unreachable",
            Self::Other => "other",
        }
    }

    /// True for codes that mean the provider could not be reached at all.
    pub const fn is_connectivity(self) -> bool {
        matches!(
            self,
            Self::ConnectionRefused
                | Self::ConnectionReset
                | Self::DnsNotFound
                | Self::NetworkUnreachable
                | Self::HostUnreachable
        )
    }
}

impl Display for TransportErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport-level HTTP error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    code: TransportErrorCode,
    message: String,
}

impl HttpError {
    pub fn new(code: TransportErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TransportErrorCode::Timeout, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(TransportErrorCode::Other, message)
    }

    pub const fn code(&self) -> TransportErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for HttpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

impl std::error::Error for HttpError {}

/// Adapter transport contract.
///
/// Dropping the returned future must abandon the in-flight request so a
/// cancelled lookup releases its outbound connection.
pub trait HttpClient: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;
}

/// Production HTTP client using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Arc<reqwest::Client>,
}

impl ReqwestHttpClient {
    /// Create a new ReqwestHttpClient with default configuration.
    pub fn new() -> Self {
        Self {
            client: Arc::new(
                reqwest::Client::builder()
                    .user_agent(concat!("cepfinder/", env!("CARGO_PKG_VERSION")))
                    .build()
                    .unwrap_or_else(|_| reqwest::Client::new()),
            ),
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            let mut builder = self
                .client
                .get(&request.url)
                .timeout(Duration::from_millis(request.timeout_ms));

            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }

            let response = builder.send().await.map_err(|error| {
                let code = transport_code(&error);
                let message = match code {
                    TransportErrorCode::Timeout => format!("request timeout: {error}"),
                    code if code.is_connectivity() => format!("network error: {error}"),
                    _ => format!("request failed: {error}"),
                };
                HttpError::new(code, message)
            })?;

            let status = response.status().as_u16();
            let body = response.text().await.map_err(|error| {
                let code = transport_code(&error);
                HttpError::new(code, format!("failed to read response body: {error}"))
            })?;

            Ok(HttpResponse { status, body })
        })
    }
}

/// Walks the reqwest error chain looking for a socket-level cause.
fn transport_code(error: &reqwest::Error) -> TransportErrorCode {
    if error.is_timeout() {
        return TransportErrorCode::Timeout;
    }

    let mut cause = error.source();
    while let Some(current) = cause {
        if let Some(io_error) = current.downcast_ref::<io::Error>() {
            if let Some(code) = io_error_code(io_error.kind()) {
                return code;
            }
        }

        let text = current.to_string().to_ascii_lowercase();
        if text.contains("dns error") || text.contains("failed to lookup address") {
            return TransportErrorCode::DnsNotFound;
        }

        cause = current.source();
    }

    if error.is_connect() {
        TransportErrorCode::ConnectionRefused
    } else {
        TransportErrorCode::Other
    }
}

fn io_error_code(kind: io::ErrorKind) -> Option<TransportErrorCode> {
    match kind {
        io::ErrorKind::TimedOut => Some(TransportErrorCode::Timeout),
        io::ErrorKind::ConnectionRefused => Some(TransportErrorCode::ConnectionRefused),
        io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted => {
            Some(TransportErrorCode::ConnectionReset)
        }
        io::ErrorKind::NetworkUnreachable => Some(TransportErrorCode::NetworkUnreachable),
        io::ErrorKind::HostUnreachable => Some(TransportErrorCode::HostUnreachable),
        _ => None,
    }
}
