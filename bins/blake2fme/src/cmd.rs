//! Subcommands.

pub mod run;
pub mod vectors;

use clap::Parser;

/// `blake2fme` entry point.
#[derive(Parser, Debug)]
#[command(infer_subcommands = true)]
pub enum MainCmd {
    /// Call the precompile once with hex input
    Run(run::Cmd),
    /// Run JSON test vector suites
    Vectors(vectors::Cmd),
}

/// Errors returned by the subcommands.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Single call failed before reaching the precompile.
    #[error(transparent)]
    Run(#[from] run::Error),
    /// Vector suite could not be loaded or had failures.
    #[error(transparent)]
    Vectors(#[from] vectors::Error),
}

impl MainCmd {
    /// Runs the selected subcommand.
    pub fn run(&self) -> Result<(), Error> {
        match self {
            Self::Run(cmd) => cmd.run().map_err(Into::into),
            Self::Vectors(cmd) => cmd.run().map_err(Into::into),
        }
    }
}
