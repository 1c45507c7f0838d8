use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::data_source::{AddressSource, FetchError, SourceError};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient, DEFAULT_TIMEOUT_MS};
use crate::{Address, ProviderId, ZipCode};

pub const VIACEP_BASE_URL: &str = "https://viacep.com.br/ws";

/// ViaCEP adapter (`GET {base}/{cep}/json/`).
///
/// ViaCEP answers unknown CEPs with HTTP 200 and an `erro` flag in the body,
/// which this adapter reports as an already classified not-found failure.
#[derive(Clone)]
pub struct ViaCepAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl Default for ViaCepAdapter {
    fn default() -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()))
    }
}

impl ViaCepAdapter {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: String::from(VIACEP_BASE_URL),
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

    fn url_for(&self, zip_code: &ZipCode) -> String {
        format!("{}/{}/json/", self.base_url, zip_code)
    }

    async fn fetch_address(&self, zip_code: &ZipCode) -> Result<Address, FetchError> {
        let request = HttpRequest::get(self.url_for(zip_code))
            .with_header("accept", "application/json")
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await?;
        if !response.is_success() {
            return Err(FetchError::status(
                response.status,
                format!("viacep upstream returned status {}", response.status),
            ));
        }

        let payload: ViaCepPayload = serde_json::from_str(&response.body).map_err(|error| {
            FetchError::message(format!("viacep returned an undecodable payload: {error}"))
        })?;

        if payload.is_error() {
            return Err(SourceError::not_found(format!("CEP não encontrado: {zip_code}")).into());
        }

        normalize_address(payload)
    }
}

impl AddressSource for ViaCepAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::VIACEP
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

#[derive(Debug, Deserialize)]
struct ViaCepPayload {
    #[serde(default)]
    cep: String,
    #[serde(default)]
    uf: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    logradouro: String,
    /// `true` or `"true"` depending on the API revision.
    #[serde(default)]
    erro: Option<Value>,
}

impl ViaCepPayload {
    fn is_error(&self) -> bool {
        match &self.erro {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

fn normalize_address(payload: ViaCepPayload) -> Result<Address, FetchError> {
    if payload.cep.trim().is_empty() {
        return Err(FetchError::message("viacep payload is missing the cep field"));
    }

    Ok(Address::new(
        &payload.cep,
        payload.uf,
        payload.localidade,
        payload.bairro,
        payload.logradouro,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;
    use crate::data_source::ErrorKind;
    use crate::http_client::{HttpError, HttpResponse};
    use std::sync::Mutex;

    #[derive(Debug)]
    struct RecordingHttpClient {
        response: Result<HttpResponse, HttpError>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingHttpClient {
        fn responding(response: Result<HttpResponse, HttpError>) -> Arc<Self> {
            Arc::new(Self {
                response,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    fn zip(value: &str) -> ZipCode {
        ZipCode::parse(value).expect("valid zip code")
    }

    #[tokio::test]
    async fn maps_viacep_fields_onto_address() {
        let client = RecordingHttpClient::responding(Ok(HttpResponse::ok_json(
            r#"{"cep":"01310-100","logradouro":"Avenida Paulista","complemento":"de 612 a 1510 - lado par","bairro":"Bela Vista","localidade":"São Paulo","uf":"SP","ibge":"3550308"}"#,
        )));
        let adapter = ViaCepAdapter::with_http_client(client.clone());

        let address = adapter.fetch(&zip("01310100")).await.expect("should parse");

        assert_eq!(
            address,
            Address::new("01310100", "SP", "São Paulo", "Bela Vista", "Avenida Paulista")
        );
        let requests = client.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "https://viacep.com.br/ws/01310100/json/");
        assert_eq!(requests[0].timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[tokio::test]
    async fn erro_flag_is_classified_as_not_found() {
        for body in [r#"{"erro": true}"#, r#"{"erro": "true"}"#] {
            let client = RecordingHttpClient::responding(Ok(HttpResponse::ok_json(body)));
            let adapter = ViaCepAdapter::with_http_client(client);

            let error = adapter.fetch(&zip("00000000")).await.expect_err("must fail");
            assert!(matches!(error, FetchError::Classified(_)), "body {body}");
            assert_eq!(classify(&error), ErrorKind::NotFound);
        }
    }

    #[tokio::test]
    async fn non_success_status_is_reported_raw() {
        let client = RecordingHttpClient::responding(Ok(HttpResponse::new(503, "")));
        let adapter = ViaCepAdapter::with_http_client(client);

        let error = adapter.fetch(&zip("01310100")).await.expect_err("must fail");
        assert!(matches!(error, FetchError::Status { status: 503, .. }));
        assert_eq!(classify(&error), ErrorKind::Unavailable);
    }

    #[tokio::test]
    async fn html_error_page_is_unknown_failure() {
        let client =
            RecordingHttpClient::responding(Ok(HttpResponse::ok_json("<html>oops</html>")));
        let adapter = ViaCepAdapter::with_http_client(client);

        let error = adapter.fetch(&zip("01310100")).await.expect_err("must fail");
        assert_eq!(classify(&error), ErrorKind::Unknown);
    }

    #[tokio::test]
    async fn base_url_override_drops_trailing_slash() {
        let client = RecordingHttpClient::responding(Ok(HttpResponse::ok_json(r#"{"erro":true}"#)));
        let adapter = ViaCepAdapter::with_http_client(client.clone())
            .with_base_url("http://127.0.0.1:9000/ws/")
            .with_timeout_ms(250);

        let _ = adapter.fetch(&zip("01001000")).await;

        let requests = client.recorded_requests();
        assert_eq!(requests[0].url, "http://127.0.0.1:9000/ws/01001000/json/");
        assert_eq!(requests[0].timeout_ms, 250);
        assert_eq!(adapter.endpoint(), "http://127.0.0.1:9000/ws");
    }
}
