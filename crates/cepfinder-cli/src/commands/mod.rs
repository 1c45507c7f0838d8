mod lookup;
mod sources;

use std::io::Write;
use std::sync::Arc;

use cepfinder_core::{AddressService, AddressServiceBuilder};

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<(), CliError> {
    let config = cli.resolver_config()?;
    let service = Arc::new(AddressServiceBuilder::from_config(config).build()?);

    dispatch(cli, service, out).await
}

async fn dispatch<W: Write>(
    cli: &Cli,
    service: Arc<AddressService>,
    out: &mut W,
) -> Result<(), CliError> {
    match &cli.command {
        Command::Lookup(args) => lookup::run(args, service, out, cli.pretty).await,
        Command::Sources(_) => sources::run(&service, out, cli.pretty),
    }
}
