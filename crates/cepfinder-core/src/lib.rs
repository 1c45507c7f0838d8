//! # cepfinder Core
//!
//! Failover resolution of Brazilian postal codes (CEP) to normalized
//! addresses.
//!
//! ## Overview
//!
//! - **Canonical domain models** for zip codes and addresses
//! - **Provider adapters** for ViaCEP and BrasilAPI
//! - **Error classification** of heterogeneous provider failures
//! - **Failure aggregation** into one caller-facing error
//! - **Rotating failover** across providers with a shared rotation index
//! - **TTL cache** in front of every lookup
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (ViaCEP, BrasilAPI) |
//! | [`aggregate`] | Reduction of per-provider failures |
//! | [`cache`] | Address cache contract and in-memory TTL store |
//! | [`classifier`] | Raw provider error to [`ErrorKind`] |
//! | [`config`] | Resolver configuration and environment overrides |
//! | [`data_source`] | Source trait and failure types |
//! | [`domain`] | Domain models (ZipCode, Address) |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP client abstraction |
//! | [`routing`] | Failover resolver |
//! | [`service`] | Cache-fronted lookup service |
//! | [`source`] | Provider identifiers |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cepfinder_core::{AddressServiceBuilder, ResolverConfig, ZipCode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = AddressServiceBuilder::from_config(ResolverConfig::from_env()?).build()?;
//!
//!     let zip_code = ZipCode::parse("01310-100")?;
//!     let address = service.lookup(&zip_code).await?;
//!     println!("{}, {} - {}", address.street, address.city, address.state);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / Caller   │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ AddressService  │────▶│ Address Cache    │
//! └────────┬────────┘     └──────────────────┘
//!          │ miss
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Failover        │────▶│ Classifier /     │
//! │ Resolver        │     │ Aggregator       │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Address Source  │────▶│ HTTP Client      │
//! │ (Adapter Trait) │     │ (reqwest)        │
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! A lookup either yields an [`Address`] or one [`AggregateFailure`]:
//!
//! ```rust
//! use cepfinder_core::{AggregateFailure, AggregateKind};
//!
//! fn handle_failure(failure: &AggregateFailure) {
//!     match failure.kind() {
//!         AggregateKind::NotFound => {
//!             // Report to user
//!         }
//!         AggregateKind::AllRateLimited | AggregateKind::AllTimedOut => {
//!             // Retry later
//!         }
//!         _ => {}
//!     }
//! }
//! ```

pub mod adapters;
pub mod aggregate;
pub mod cache;
pub mod classifier;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod routing;
pub mod service;
pub mod source;

// Adapter implementations
pub use adapters::{builtin_source, BrasilApiAdapter, ViaCepAdapter};

// Failure aggregation and classification
pub use aggregate::{aggregate, AggregateFailure, AggregateKind};
pub use classifier::classify;

// Caching
pub use cache::{AddressCache, CacheStore};

// Configuration
pub use config::ResolverConfig;

// Data source trait and types
pub use data_source::{AddressSource, ErrorKind, FetchError, ProviderFailure, SourceError};

// Domain models
pub use domain::{strip_non_digits, Address, UtcDateTime, ZipCode};

// Error types
pub use error::ValidationError;

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient, TransportErrorCode,
};

// Resolution
pub use routing::FailoverResolver;
pub use service::{AddressService, AddressServiceBuilder};

// Source identifiers
pub use source::ProviderId;
