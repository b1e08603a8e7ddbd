use anyhow::Context;
use clap::Parser;
use tracing::info;

use cl_cli::{args::Args, logging, repl};
use cl_core::VerificationFlow;
use cl_shared::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration, then apply command line overrides
    let mut config =
        AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply(&mut config);

    logging::init_tracing(&config.logging)?;

    info!(
        environment = %config.environment,
        version = env!("CARGO_PKG_VERSION"),
        "Starting CallerLookup"
    );

    let client = cl_infra::initialize(&config).context("Failed to initialize lookup client")?;
    let flow = VerificationFlow::new(client);

    repl::run(flow, repl::spawn_stdin_reader(), args.phone.clone()).await
}
