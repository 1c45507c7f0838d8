//! CLI argument definitions for cepfinder.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `lookup` | Resolve one or more CEPs to addresses |
//! | `sources` | List configured providers in rotation order |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--verbose` | `false` | Debug logging on stderr |
//! | `--providers` | `viacep,brasilapi` | Provider rotation order |
//! | `--cache-ttl-ms` | `86400000` | Cache TTL, `0` disables caching |
//! | `--timeout-ms` | `3000` | Per-provider request timeout |
//!
//! Options left unset fall back to the `CEPFINDER_*` environment variables.
//!
//! # Examples
//!
//! ```bash
//! cepfinder lookup 01310-100
//! cepfinder lookup 01310100 20040020 --pretty
//! cepfinder --providers brasilapi,viacep sources
//! ```

use std::time::Duration;

use cepfinder_core::config::parse_providers;
use cepfinder_core::{ResolverConfig, ValidationError};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "cepfinder",
    author,
    version,
    about = "Brazilian CEP lookup with provider failover",
    long_about = "cepfinder resolves Brazilian postal codes (CEP) to addresses by rotating \
across ViaCEP and BrasilAPI, falling back to the next provider when one fails.\n\
\n\
Results are printed as one JSON line per CEP on stdout; logs go to stderr."
)]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Emit debug logs on stderr.
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,

    /// Comma-separated provider rotation order (viacep, brasilapi).
    #[arg(long, global = true)]
    pub providers: Option<String>,

    /// Cache TTL in milliseconds; 0 disables caching.
    #[arg(long, global = true)]
    pub cache_ttl_ms: Option<u64>,

    /// Per-provider request timeout in milliseconds.
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Environment configuration with command-line overrides applied.
    pub fn resolver_config(&self) -> Result<ResolverConfig, ValidationError> {
        self.apply_overrides(ResolverConfig::from_env()?)
    }

    pub fn apply_overrides(
        &self,
        mut config: ResolverConfig,
    ) -> Result<ResolverConfig, ValidationError> {
        if let Some(providers) = &self.providers {
            config.providers = parse_providers(providers)?;
        }
        if let Some(cache_ttl_ms) = self.cache_ttl_ms {
            config.cache_ttl = Duration::from_millis(cache_ttl_ms);
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.request_timeout = Duration::from_millis(timeout_ms);
        }
        Ok(config)
    }
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve one or more CEPs.
    ///
    /// Each CEP is looked up concurrently against the same resolver, so the
    /// rotation index and cache are shared between them.
    ///
    /// # Examples
    ///
    ///   cepfinder lookup 01310-100
    ///   cepfinder lookup 01310100 20040020 --pretty
    Lookup(LookupArgs),

    /// List configured providers in rotation order.
    Sources(SourcesArgs),
}

/// Arguments for the `lookup` command.
#[derive(Debug, Args)]
pub struct LookupArgs {
    /// One or more CEPs, with or without punctuation (e.g. 01310-100).
    #[arg(required = true, num_args = 1..)]
    pub zip_codes: Vec<String>,
}

/// Arguments for the `sources` command.
#[derive(Debug, Args)]
pub struct SourcesArgs {}
