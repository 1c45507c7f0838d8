//! Failover resolution across address providers.
//!
//! The resolver holds a rotation index shared by every lookup it serves.
//! A lookup starts at the current index and walks the provider list once;
//! every attempt, successful or not, advances the index by one position.
//! Attempts within a lookup are strictly sequential.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::aggregate::{aggregate, AggregateFailure};
use crate::classifier::into_source_error;
use crate::data_source::{AddressSource, FetchError, ProviderFailure};
use crate::http_client::{HttpError, DEFAULT_TIMEOUT_MS};
use crate::{Address, ProviderId, ValidationError, ZipCode};

/// Upper bound on a single provider call, including body decoding.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_millis(DEFAULT_TIMEOUT_MS);

/// Rotating failover resolver over an ordered provider list.
pub struct FailoverResolver {
    sources: Vec<Arc<dyn AddressSource>>,
    cursor: AtomicUsize,
    attempt_timeout: Duration,
}

impl std::fmt::Debug for FailoverResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FailoverResolver")
            .field("providers", &self.providers())
            .field("cursor", &self.rotation_index())
            .field("attempt_timeout", &self.attempt_timeout)
            .finish()
    }
}

impl FailoverResolver {
    /// Creates a resolver whose rotation starts at the first source.
    ///
    /// # Errors
    ///
    /// Fails when `sources` is empty or lists the same provider twice.
    pub fn new(sources: Vec<Arc<dyn AddressSource>>) -> Result<Self, ValidationError> {
        if sources.is_empty() {
            return Err(ValidationError::EmptyProviderList);
        }

        for (index, source) in sources.iter().enumerate() {
            let id = source.id();
            if sources[..index].iter().any(|earlier| earlier.id() == id) {
                return Err(ValidationError::DuplicateProvider {
                    value: id.as_str().to_owned(),
                });
            }
        }

        Ok(Self {
            sources,
            cursor: AtomicUsize::new(0),
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        })
    }

    pub fn with_attempt_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }

    /// Providers in configured order.
    pub fn providers(&self) -> Vec<ProviderId> {
        self.sources.iter().map(|source| source.id()).collect()
    }

    pub fn sources(&self) -> &[Arc<dyn AddressSource>] {
        &self.sources
    }

    /// Current rotation index, always in `0..provider_count`.
    pub fn rotation_index(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }

    /// Provider the next lookup will try first.
    pub fn next_provider(&self) -> ProviderId {
        self.sources[self.rotation_index()].id()
    }

    pub const fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    /// Resolves `zip_code`, trying each provider at most once.
    ///
    /// Returns the first successful record. When every provider fails the
    /// per-provider failures are reduced into one [`AggregateFailure`].
    pub async fn resolve(&self, zip_code: &ZipCode) -> Result<Address, AggregateFailure> {
        let started = Instant::now();
        let count = self.sources.len();
        let start = self.rotation_index();
        let mut failures = Vec::with_capacity(count);

        for attempt in 0..count {
            let source = &self.sources[(start + attempt) % count];
            let provider = source.id();
            tracing::debug!(%provider, attempt, "trying address provider");

            let outcome = self.attempt(source.as_ref(), zip_code).await;
            self.advance();

            match outcome {
                Ok(address) => {
                    if !failures.is_empty() {
                        tracing::info!(
                            %provider,
                            failed_attempts = failures.len(),
                            "provider fallback succeeded"
                        );
                    }
                    tracing::debug!(%provider, latency_ms = elapsed_ms(started), "address resolved");
                    return Ok(address);
                }
                Err(error) => {
                    let error = into_source_error(error);
                    tracing::warn!(
                        %provider,
                        kind = %error.kind(),
                        error = error.message(),
                        "address provider failed"
                    );
                    failures.push(ProviderFailure::new(provider, error));
                }
            }
        }

        let failure = aggregate(zip_code, failures);
        tracing::error!(
            kind = %failure.kind(),
            providers = count,
            latency_ms = elapsed_ms(started),
            "all address providers failed"
        );
        Err(failure)
    }

    async fn attempt(
        &self,
        source: &dyn AddressSource,
        zip_code: &ZipCode,
    ) -> Result<Address, FetchError> {
        match tokio::time::timeout(self.attempt_timeout, source.fetch(zip_code)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Transport(HttpError::timeout(format!(
                "{} did not answer within {} ms",
                source.id(),
                self.attempt_timeout.as_millis()
            )))),
        }
    }

    fn advance(&self) {
        let count = self.sources.len();
        // The closure always returns Some, so the update cannot fail.
        let _ = self
            .cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |index| {
                Some((index + 1) % count)
            });
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    saturating_ms(started.elapsed())
}

/// Whole milliseconds in `duration`, capped at `u64::MAX` for log fields.
pub(crate) fn saturating_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::AggregateKind;
    use crate::SourceError;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::AtomicU32;

    struct StubSource {
        id: ProviderId,
        result: Result<Address, FetchError>,
        calls: AtomicU32,
    }

    impl StubSource {
        fn ok(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                id: ProviderId::new(name),
                result: Ok(Address::new("01310100", "SP", "São Paulo", "Bela Vista", name)),
                calls: AtomicU32::new(0),
            })
        }

        fn failing(name: &'static str, error: FetchError) -> Arc<Self> {
            Arc::new(Self {
                id: ProviderId::new(name),
                result: Err(error),
                calls: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl AddressSource for StubSource {
        fn id(&self) -> ProviderId {
            self.id
        }

        fn endpoint(&self) -> &str {
            "stub://"
        }

        fn fetch<'a>(
            &'a self,
            _zip_code: &'a ZipCode,
        ) -> Pin<Box<dyn Future<Output = Result<Address, FetchError>> + Send + 'a>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result = self.result.clone();
            Box::pin(async move { result })
        }
    }

    fn zip() -> ZipCode {
        ZipCode::parse("01310100").expect("valid zip code")
    }

    #[test]
    fn rejects_empty_provider_list() {
        let err = FailoverResolver::new(Vec::new()).expect_err("must fail");
        assert_eq!(err, ValidationError::EmptyProviderList);
    }

    #[test]
    fn rejects_duplicate_providers() {
        let err = FailoverResolver::new(vec![StubSource::ok("a"), StubSource::ok("a")])
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::DuplicateProvider { .. }));
    }

    #[tokio::test]
    async fn success_advances_rotation_by_one() {
        let first = StubSource::ok("first");
        let second = StubSource::ok("second");
        let resolver = FailoverResolver::new(vec![first.clone(), second.clone()])
            .expect("valid resolver");

        let address = resolver.resolve(&zip()).await.expect("should resolve");
        assert_eq!(address.street, "first");
        assert_eq!(resolver.rotation_index(), 1);
        assert_eq!(resolver.next_provider(), ProviderId::new("second"));

        let address = resolver.resolve(&zip()).await.expect("should resolve");
        assert_eq!(address.street, "second");
        assert_eq!(resolver.rotation_index(), 0);
        assert_eq!((first.calls(), second.calls()), (1, 1));
    }

    #[tokio::test]
    async fn failure_falls_through_to_next_provider() {
        let broken = StubSource::failing("broken", FetchError::status(500, "upstream error"));
        let healthy = StubSource::ok("healthy");
        let resolver =
            FailoverResolver::new(vec![broken.clone(), healthy.clone()]).expect("valid resolver");

        let address = resolver.resolve(&zip()).await.expect("fallback should succeed");
        assert_eq!(address.street, "healthy");
        assert_eq!(resolver.rotation_index(), 0);
        assert_eq!((broken.calls(), healthy.calls()), (1, 1));
    }

    #[tokio::test]
    async fn exhausted_lookup_consults_every_provider_once() {
        let a = StubSource::failing(
            "a",
            FetchError::Classified(SourceError::not_found("CEP não encontrado")),
        );
        let b = StubSource::failing("b", FetchError::status(404, "not here"));
        let c = StubSource::failing("c", FetchError::message("address not found"));
        let resolver =
            FailoverResolver::new(vec![a.clone(), b.clone(), c.clone()]).expect("valid resolver");

        let failure = resolver.resolve(&zip()).await.expect_err("must fail");
        assert_eq!(failure.kind(), AggregateKind::NotFound);
        assert_eq!(
            failure.providers(),
            &[ProviderId::new("a"), ProviderId::new("b"), ProviderId::new("c")]
        );
        assert_eq!((a.calls(), b.calls(), c.calls()), (1, 1, 1));
        assert_eq!(resolver.rotation_index(), 0);
    }

    #[tokio::test]
    async fn stalled_provider_is_cut_off_by_attempt_timeout() {
        struct Stalled;

        impl AddressSource for Stalled {
            fn id(&self) -> ProviderId {
                ProviderId::new("stalled")
            }

            fn endpoint(&self) -> &str {
                "stub://stalled"
            }

            fn fetch<'a>(
                &'a self,
                _zip_code: &'a ZipCode,
            ) -> Pin<Box<dyn Future<Output = Result<Address, FetchError>> + Send + 'a>>
            {
                Box::pin(async move {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Err(FetchError::message("unreachable"))
                })
            }
        }

        let resolver = FailoverResolver::new(vec![Arc::new(Stalled)])
            .expect("valid resolver")
            .with_attempt_timeout(Duration::from_millis(20));

        let failure = resolver.resolve(&zip()).await.expect_err("must time out");
        assert_eq!(failure.kind(), AggregateKind::AllTimedOut);
    }

    #[tokio::test]
    async fn aborting_a_lookup_drops_the_in_flight_fetch() {
        use std::sync::atomic::AtomicBool;
        use tokio::sync::Notify;

        /// Flags its own drop, standing in for an open outbound request.
        struct InFlight(Arc<AtomicBool>);

        impl Drop for InFlight {
            fn drop(&mut self) {
                self.0.store(true, Ordering::SeqCst);
            }
        }

        struct Hanging {
            started: Arc<Notify>,
            dropped: Arc<AtomicBool>,
        }

        impl AddressSource for Hanging {
            fn id(&self) -> ProviderId {
                ProviderId::new("hanging")
            }

            fn endpoint(&self) -> &str {
                "stub://hanging"
            }

            fn fetch<'a>(
                &'a self,
                _zip_code: &'a ZipCode,
            ) -> Pin<Box<dyn Future<Output = Result<Address, FetchError>> + Send + 'a>>
            {
                Box::pin(async move {
                    let _request = InFlight(Arc::clone(&self.dropped));
                    self.started.notify_one();
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Err(FetchError::message("unreachable"))
                })
            }
        }

        let started = Arc::new(Notify::new());
        let dropped = Arc::new(AtomicBool::new(false));
        let source = Hanging {
            started: Arc::clone(&started),
            dropped: Arc::clone(&dropped),
        };
        let resolver = Arc::new(
            FailoverResolver::new(vec![Arc::new(source)])
                .expect("valid resolver")
                .with_attempt_timeout(Duration::from_secs(60)),
        );

        let task = tokio::spawn({
            let resolver = Arc::clone(&resolver);
            async move { resolver.resolve(&zip()).await }
        });

        started.notified().await;
        assert!(!dropped.load(Ordering::SeqCst));

        task.abort();
        let joined = task.await.expect_err("task was aborted");
        assert!(joined.is_cancelled());
        assert!(dropped.load(Ordering::SeqCst));
    }
}
