//! `run` subcommand: one call to the Blake2 `F` precompile.

use clap::Parser;
use precompile::{PrecompileErrorKind, PrecompileResult, PrecompileSpecId, Precompiles};
use primitives::{hardfork::SpecId, hex, BLAKE2F_ADDRESS};
use serde::Serialize;
use tracing::debug;

/// Errors of the `run` subcommand.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input is not valid hex.
    #[error("invalid hex input: {0}")]
    InvalidInput(#[from] hex::FromHexError),
    /// Outcome could not be printed as JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Calls the precompile at 0x09 once.
///
/// Prints either the gas used and the returned bytes, or the error kind.
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Hex-encoded input, with or without `0x` prefix
    input: String,
    /// Gas limit of the call
    #[arg(long, default_value_t = u64::MAX)]
    gas_limit: u64,
    /// Hard fork deciding whether the precompile is active
    #[arg(long, default_value = "Latest")]
    spec: SpecId,
    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,
}

/// Result of one call in the shape the calling engine consumes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    /// Gas charged on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<u64>,
    /// Hex-encoded output on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_value: Option<String>,
    /// Error kind on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception_error: Option<PrecompileErrorKind>,
}

impl From<&PrecompileResult> for Outcome {
    fn from(result: &PrecompileResult) -> Self {
        match result {
            Ok(output) => Self {
                gas_used: Some(output.gas_used),
                return_value: Some(hex::encode(&output.bytes)),
                exception_error: None,
            },
            Err(err) => Self {
                gas_used: None,
                return_value: None,
                exception_error: Some(err.kind()),
            },
        }
    }
}

/// Decodes hex input, tolerating surrounding whitespace and a `0x` prefix.
pub fn decode_input(input: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let input = input.trim();
    hex::decode(input.strip_prefix("0x").unwrap_or(input))
}

/// Calls the Blake2 `F` precompile through the set active at `spec`.
pub fn call(spec: SpecId, input: &[u8], gas_limit: u64) -> PrecompileResult {
    debug!(%spec, len = input.len(), gas_limit, "calling blake2f");
    Precompiles::new(PrecompileSpecId::from_spec_id(spec)).invoke(&BLAKE2F_ADDRESS, input, gas_limit)
}

impl Cmd {
    /// Runs `run` command.
    pub fn run(&self) -> Result<(), Error> {
        let input = decode_input(&self.input)?;
        let result = call(self.spec, &input, self.gas_limit);
        let outcome = Outcome::from(&result);

        if self.json {
            println!("{}", serde_json::to_string(&outcome)?);
            return Ok(());
        }

        match result {
            Ok(output) => {
                println!("gas used: {}", output.gas_used);
                println!("output:   0x{}", hex::encode(&output.bytes));
            }
            Err(err) => println!("error: {} ({err})", err.kind()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VECTOR_7: &str = "0x0000000148c9bdf267e6096a3ba7ca8485ae67bb2bf894fe72f36e3cf1361d5f3af54fa5d182e6ad7f520e511f6c3e2b8c68059b6bbd41fbabd9831f79217e1319cde05b61626300000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000300000000000000000000000000000001";

    #[test]
    fn outcome_json_on_success() {
        let input = decode_input(VECTOR_7).unwrap();
        let outcome = Outcome::from(&call(SpecId::ISTANBUL, &input, 1));
        assert_eq!(outcome.gas_used, Some(1));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["gasUsed"], 1);
        assert!(json["returnValue"].as_str().unwrap().starts_with("b63a380cb2897d52"));
        assert!(json.get("exceptionError").is_none());
    }

    #[test]
    fn outcome_json_on_failure() {
        let input = decode_input(VECTOR_7).unwrap();
        let outcome = Outcome::from(&call(SpecId::ISTANBUL, &input[..212], u64::MAX));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["exceptionError"], "out_of_range");
        assert!(json.get("gasUsed").is_none());

        let outcome = Outcome::from(&call(SpecId::ISTANBUL, &input, 0));
        assert_eq!(outcome.exception_error, Some(PrecompileErrorKind::OutOfGas));
    }

    #[test]
    fn inactive_before_istanbul() {
        let input = decode_input(VECTOR_7).unwrap();
        let err = call(SpecId::PETERSBURG, &input, u64::MAX).unwrap_err();
        assert_eq!(err.kind(), PrecompileErrorKind::Fatal);
    }

    #[test]
    fn cli_parses_spec_names() {
        let cmd = Cmd::try_parse_from(["run", "--spec", "istanbul", "--gas-limit", "5", "00"]).unwrap();
        assert_eq!(cmd.spec, SpecId::ISTANBUL);
        assert_eq!(cmd.gas_limit, 5);
        assert!(Cmd::try_parse_from(["run", "--spec", "nope", "00"]).is_err());
    }

    #[test]
    fn single_hex_prefix() {
        assert_eq!(decode_input(" 0x0102 ").unwrap(), [1u8, 2]);
        assert_eq!(decode_input("0102").unwrap(), [1u8, 2]);
        assert!(decode_input("0x0x0102").is_err());
    }

    #[test]
    fn invalid_hex_is_an_error() {
        let cmd = Cmd::try_parse_from(["run", "0xzz"]).unwrap();
        assert!(matches!(cmd.run(), Err(Error::InvalidInput(_))));
    }
}
