use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::data_source::{AddressSource, FetchError};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient, DEFAULT_TIMEOUT_MS};
use crate::{Address, ProviderId, ZipCode};

pub const BRASILAPI_BASE_URL: &str = "https://brasilapi.com.br/api/cep/v1";

/// BrasilAPI adapter (`GET {base}/{cep}`). Unknown CEPs come back as HTTP 404.
#[derive(Clone)]
pub struct BrasilApiAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl Default for BrasilApiAdapter {
    fn default() -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()))
    }
}

impl BrasilApiAdapter {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: String::from(BRASILAPI_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    async fn fetch_address(&self, zip_code: &ZipCode) -> Result<Address, FetchError> {
        let request = HttpRequest::get(format!("{}/{}", self.base_url, zip_code))
            .with_header("accept", "application/json")
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await?;
        if !response.is_success() {
            let mut message = format!("brasilapi upstream returned status {}", response.status);
            if let Ok(body) = serde_json::from_str::<BrasilApiErrorPayload>(&response.body) {
                message.push_str(": ");
                message.push_str(&body.message);
            }
            return Err(FetchError::status(response.status, message));
        }

        let payload: BrasilApiPayload = serde_json::from_str(&response.body).map_err(|error| {
            FetchError::message(format!("brasilapi returned an undecodable payload: {error}"))
        })?;

        Ok(Address::new(
            &payload.cep,
            payload.state,
            payload.city,
            payload.neighborhood.unwrap_or_default(),
            payload.street.unwrap_or_default(),
        ))
    }
}

impl AddressSource for BrasilApiAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::BRASILAPI
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }

    fn fetch<'a>(
        &'a self,
        zip_code: &'a ZipCode,
    ) -> Pin<Box<dyn Future<Output = Result<Address, FetchError>> + Send + 'a>> {
        Box::pin(self.fetch_address(zip_code))
    }
}

// BrasilAPI sends `null` for neighborhood/street on city-wide CEPs.
#[derive(Debug, Deserialize)]
struct BrasilApiPayload {
    cep: String,
    state: String,
    city: String,
    neighborhood: Option<String>,
    street: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BrasilApiErrorPayload {
    message: String,
}
