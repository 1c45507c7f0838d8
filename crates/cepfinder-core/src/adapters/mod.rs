mod brasilapi;
mod viacep;

use std::sync::Arc;

pub use brasilapi::{BrasilApiAdapter, BRASILAPI_BASE_URL};
pub use viacep::{ViaCepAdapter, VIACEP_BASE_URL};

use crate::data_source::AddressSource;
use crate::http_client::HttpClient;
use crate::{ProviderId, ValidationError};

/// Builds the built-in adapter for `provider` on a shared transport.
pub fn builtin_source(
    provider: ProviderId,
    http_client: Arc<dyn HttpClient>,
    timeout_ms: u64,
) -> Result<Arc<dyn AddressSource>, ValidationError> {
    match provider {
        ProviderId::VIACEP => Ok(Arc::new(
            ViaCepAdapter::with_http_client(http_client).with_timeout_ms(timeout_ms),
        )),
        ProviderId::BRASILAPI => Ok(Arc::new(
            BrasilApiAdapter::with_http_client(http_client).with_timeout_ms(timeout_ms),
        )),
        other => Err(ValidationError::InvalidProvider {
            value: other.as_str().to_owned(),
        }),
    }
}
