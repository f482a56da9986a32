//! `blake2fme` binary: calls the Blake2 `F` precompile and runs vector suites.

use blake2fme::cmd::MainCmd;
use clap::Parser;
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    MainCmd::parse().run()?;

    Ok(())
}
