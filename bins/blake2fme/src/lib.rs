//! Command line runner for the Blake2 `F` precompile.
//!
//! `blake2fme run` performs a single call, `blake2fme vectors` checks JSON vector suites.

pub mod cmd;
