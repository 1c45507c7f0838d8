use std::io::Write;
use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinSet;

use cepfinder_core::{Address, AddressService, AggregateFailure, AggregateKind, ZipCode};

use crate::cli::LookupArgs;
use crate::error::CliError;
use crate::output::write_json;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupLine {
    zip_code: ZipCode,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<FailureView>,
}

#[derive(Debug, Serialize)]
struct FailureView {
    code: &'static str,
    message: &'static str,
    detail: String,
    #[serde(flatten)]
    failure: AggregateFailure,
}

impl LookupLine {
    fn new(zip_code: ZipCode, outcome: Result<Address, AggregateFailure>) -> Self {
        match outcome {
            Ok(address) => Self {
                zip_code,
                ok: true,
                address: Some(address),
                error: None,
            },
            Err(failure) => Self {
                zip_code,
                ok: false,
                address: None,
                error: Some(FailureView {
                    code: failure.code(),
                    message: failure.message(),
                    detail: failure.detail(),
                    failure,
                }),
            },
        }
    }

    fn failure_kind(&self) -> Option<AggregateKind> {
        self.error.as_ref().map(|view| view.failure.kind())
    }
}

pub async fn run<W: Write>(
    args: &LookupArgs,
    service: Arc<AddressService>,
    out: &mut W,
    pretty: bool,
) -> Result<(), CliError> {
    let zip_codes = args
        .zip_codes
        .iter()
        .map(|raw| ZipCode::parse(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let lines = lookup_all(service, zip_codes).await?;
    for line in &lines {
        write_json(out, line, pretty)?;
    }

    outcome(&lines)
}

/// Runs one task per zip code on the shared service, returning results in
/// input order.
async fn lookup_all(
    service: Arc<AddressService>,
    zip_codes: Vec<ZipCode>,
) -> Result<Vec<LookupLine>, CliError> {
    let mut tasks = JoinSet::new();
    for (index, zip_code) in zip_codes.into_iter().enumerate() {
        let service = Arc::clone(&service);
        tasks.spawn(async move {
            let outcome = service.lookup(&zip_code).await;
            (index, LookupLine::new(zip_code, outcome))
        });
    }

    let mut indexed = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        indexed.push(joined?);
    }
    indexed.sort_by_key(|(index, _)| *index);

    Ok(indexed.into_iter().map(|(_, line)| line).collect())
}

fn outcome(lines: &[LookupLine]) -> Result<(), CliError> {
    let kinds: Vec<AggregateKind> = lines.iter().filter_map(LookupLine::failure_kind).collect();
    if kinds.is_empty() {
        return Ok(());
    }

    let total = lines.len();
    let count = kinds.len();
    if kinds.iter().all(|kind| *kind == AggregateKind::NotFound) {
        Err(CliError::NotFound { count, total })
    } else {
        Err(CliError::ProviderOutage { count, total })
    }
}
