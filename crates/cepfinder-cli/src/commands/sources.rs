use std::io::Write;

use serde::Serialize;

use cepfinder_core::{AddressService, ProviderId};

use crate::error::CliError;
use crate::output::write_json;

#[derive(Debug, Serialize)]
struct SourceRow<'a> {
    position: usize,
    provider: ProviderId,
    endpoint: &'a str,
}

pub fn run<W: Write>(service: &AddressService, out: &mut W, pretty: bool) -> Result<(), CliError> {
    for row in rows(service) {
        write_json(out, &row, pretty)?;
    }
    Ok(())
}

/// Providers starting from the one the next lookup will try first.
fn rows(service: &AddressService) -> Vec<SourceRow<'_>> {
    let resolver = service.resolver();
    let sources = resolver.sources();
    let start = resolver.rotation_index();

    (0..sources.len())
        .map(|position| {
            let source = &sources[(start + position) % sources.len()];
            SourceRow {
                position,
                provider: source.id(),
                endpoint: source.endpoint(),
            }
        })
        .collect()
}
