//! Resolver configuration.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CEPFINDER_PROVIDERS` | `viacep,brasilapi` | Provider rotation order |
//! | `CEPFINDER_CACHE_TTL_MS` | `86400000` | Cache TTL, `0` disables caching |
//! | `CEPFINDER_REQUEST_TIMEOUT_MS` | `3000` | Per-provider request timeout |

use std::time::Duration;

use crate::cache::DEFAULT_CACHE_TTL;
use crate::http_client::DEFAULT_TIMEOUT_MS;
use crate::{ProviderId, ValidationError};

pub const PROVIDERS_ENV: &str = "CEPFINDER_PROVIDERS";
pub const CACHE_TTL_ENV: &str = "CEPFINDER_CACHE_TTL_MS";
pub const REQUEST_TIMEOUT_ENV: &str = "CEPFINDER_REQUEST_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    pub providers: Vec<ProviderId>,
    pub cache_ttl: Duration,
    pub request_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            providers: ProviderId::BUILTIN.to_vec(),
            cache_ttl: DEFAULT_CACHE_TTL,
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl ResolverConfig {
    /// Reads overrides from the process environment.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads overrides through `lookup`; unset variables keep their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(PROVIDERS_ENV) {
            config.providers = parse_providers(&value).map_err(|error| match error {
                ValidationError::EmptyProviderList => ValidationError::InvalidEnvValue {
                    name: PROVIDERS_ENV,
                    value: value.clone(),
                },
                other => other,
            })?;
        }
        if let Some(value) = lookup(CACHE_TTL_ENV) {
            config.cache_ttl = parse_millis(CACHE_TTL_ENV, &value)?;
        }
        if let Some(value) = lookup(REQUEST_TIMEOUT_ENV) {
            let timeout = parse_millis(REQUEST_TIMEOUT_ENV, &value)?;
            if timeout.is_zero() {
                return Err(ValidationError::InvalidEnvValue {
                    name: REQUEST_TIMEOUT_ENV,
                    value,
                });
            }
            config.request_timeout = timeout;
        }

        Ok(config)
    }

    pub fn with_providers(mut self, providers: Vec<ProviderId>) -> Self {
        self.providers = providers;
        self
    }

    pub fn with_cache_ttl(mut self, cache_ttl: Duration) -> Self {
        self.cache_ttl = cache_ttl;
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn request_timeout_ms(&self) -> u64 {
        self.request_timeout.as_millis().min(u128::from(u64::MAX)) as u64
    }
}

/// Parses a comma-separated provider list, keeping its order.
pub fn parse_providers(value: &str) -> Result<Vec<ProviderId>, ValidationError> {
    let mut providers = Vec::new();
    for item in value.split(',').map(str::trim).filter(|item| !item.is_empty()) {
        let provider = item.parse::<ProviderId>()?;
        if providers.contains(&provider) {
            return Err(ValidationError::DuplicateProvider {
                value: provider.as_str().to_owned(),
            });
        }
        providers.push(provider);
    }

    if providers.is_empty() {
        return Err(ValidationError::EmptyProviderList);
    }

    Ok(providers)
}

fn parse_millis(name: &'static str, value: &str) -> Result<Duration, ValidationError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ValidationError::InvalidEnvValue {
            name,
            value: value.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Option<String> {
        let map: HashMap<&'static str, String> = pairs
            .iter()
            .map(|(name, value)| (*name, (*value).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = ResolverConfig::from_lookup(lookup_from(&[])).expect("valid config");
        assert_eq!(config, ResolverConfig::default());
        assert_eq!(config.providers, vec![ProviderId::VIACEP, ProviderId::BRASILAPI]);
        assert_eq!(config.request_timeout_ms(), 3_000);
    }

    #[test]
    fn environment_overrides_every_field() {
        let config = ResolverConfig::from_lookup(lookup_from(&[
            (PROVIDERS_ENV, "brasilapi, viacep"),
            (CACHE_TTL_ENV, "60000"),
            (REQUEST_TIMEOUT_ENV, "1500"),
        ]))
        .expect("valid config");

        assert_eq!(config.providers, vec![ProviderId::BRASILAPI, ProviderId::VIACEP]);
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.request_timeout, Duration::from_millis(1_500));
    }

    #[test]
    fn zero_cache_ttl_is_allowed() {
        let config = ResolverConfig::from_lookup(lookup_from(&[(CACHE_TTL_ENV, "0")]))
            .expect("valid config");
        assert!(config.cache_ttl.is_zero());
    }

    #[test]
    fn rejects_malformed_values() {
        let err = ResolverConfig::from_lookup(lookup_from(&[(CACHE_TTL_ENV, "1h")]))
            .expect_err("must fail");
        assert_eq!(
            err,
            ValidationError::InvalidEnvValue {
                name: CACHE_TTL_ENV,
                value: String::from("1h"),
            }
        );

        let err = ResolverConfig::from_lookup(lookup_from(&[(REQUEST_TIMEOUT_ENV, "0")]))
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidEnvValue { .. }));

        let err = ResolverConfig::from_lookup(lookup_from(&[(PROVIDERS_ENV, " , ")]))
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidEnvValue { .. }));
    }

    #[test]
    fn provider_list_rejects_unknown_and_duplicate_entries() {
        assert!(matches!(
            parse_providers("viacep,postmon"),
            Err(ValidationError::InvalidProvider { .. })
        ));
        assert!(matches!(
            parse_providers("viacep,VIACEP"),
            Err(ValidationError::DuplicateProvider { .. })
        ));
        assert_eq!(parse_providers("viacep"), Ok(vec![ProviderId::VIACEP]));
    }
}
