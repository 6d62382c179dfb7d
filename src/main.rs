use std::io;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use docmark::cli::{Cli, run};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let summary = run(&cli)?;
    if cli.summary {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_writer(io::stderr)
        .init();
}
