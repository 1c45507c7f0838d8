//! Cache-fronted address lookup.

use std::sync::Arc;
use std::time::Duration;

use crate::adapters::builtin_source;
use crate::aggregate::AggregateFailure;
use crate::cache::{AddressCache, CacheStore};
use crate::config::ResolverConfig;
use crate::data_source::AddressSource;
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::routing::{saturating_ms, FailoverResolver};
use crate::{Address, ValidationError, ZipCode};

/// Resolves zip codes through the cache first and the failover resolver
/// second. Only successful resolutions are cached.
pub struct AddressService {
    resolver: FailoverResolver,
    cache: Arc<dyn AddressCache>,
    cache_ttl: Duration,
}

impl std::fmt::Debug for AddressService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressService")
            .field("resolver", &self.resolver)
            .field("cache_ttl", &self.cache_ttl)
            .finish_non_exhaustive()
    }
}

impl AddressService {
    pub fn new(
        resolver: FailoverResolver,
        cache: Arc<dyn AddressCache>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            resolver,
            cache,
            cache_ttl,
        }
    }

    pub fn builder() -> AddressServiceBuilder {
        AddressServiceBuilder::new()
    }

    #[tracing::instrument(name = "address.lookup", skip_all, fields(zip_code = %zip_code))]
    pub async fn lookup(&self, zip_code: &ZipCode) -> Result<Address, AggregateFailure> {
        let key = zip_code.as_str();

        if let Some(address) = self.cache.get(key).await {
            tracing::info!("cache hit");
            return Ok(address);
        }

        let address = self.resolver.resolve(zip_code).await?;

        if !self.cache_ttl.is_zero() {
            self.cache
                .set(key.to_owned(), address.clone(), self.cache_ttl)
                .await;
            tracing::info!(ttl_ms = saturating_ms(self.cache_ttl), "cache populated");
        }

        Ok(address)
    }

    pub fn resolver(&self) -> &FailoverResolver {
        &self.resolver
    }

    pub fn cache(&self) -> &Arc<dyn AddressCache> {
        &self.cache
    }

    pub const fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }
}

/// Builder for [`AddressService`].
///
/// Without explicit sources, the configured built-in providers are created
/// on one shared HTTP client.
///
/// # Example
///
/// ```rust,ignore
/// use cepfinder_core::{AddressServiceBuilder, ResolverConfig};
///
/// let service = AddressServiceBuilder::from_config(ResolverConfig::from_env()?).build()?;
/// ```
#[derive(Default)]
pub struct AddressServiceBuilder {
    config: ResolverConfig,
    http_client: Option<Arc<dyn HttpClient>>,
    sources: Vec<Arc<dyn AddressSource>>,
    cache: Option<Arc<dyn AddressCache>>,
}

impl AddressServiceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: ResolverConfig) -> Self {
        Self::new().with_config(config)
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Transport shared by every built-in adapter.
    pub fn with_http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Adds a custom source. Once any source is added, the configured
    /// provider list is ignored and sources rotate in insertion order.
    pub fn with_source(mut self, source: Arc<dyn AddressSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn AddressCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> Result<AddressService, ValidationError> {
        let Self {
            config,
            http_client,
            sources,
            cache,
        } = self;

        let sources = if sources.is_empty() {
            let http_client: Arc<dyn HttpClient> =
                http_client.unwrap_or_else(|| Arc::new(ReqwestHttpClient::new()));
            config
                .providers
                .iter()
                .map(|provider| {
                    builtin_source(
                        *provider,
                        Arc::clone(&http_client),
                        config.request_timeout_ms(),
                    )
                })
                .collect::<Result<Vec<_>, _>>()?
        } else {
            sources
        };

        let resolver =
            FailoverResolver::new(sources)?.with_attempt_timeout(config.request_timeout);
        let cache: Arc<dyn AddressCache> =
            cache.unwrap_or_else(|| Arc::new(CacheStore::<Address>::new(config.cache_ttl)));

        Ok(AddressService::new(resolver, cache, config.cache_ttl))
    }
}
