//! Interface for the precompile. It contains the precompile result type,
//! the precompile output type, and the precompile error type.
use primitives::{Address, Bytes};
use std::string::String;

/// A precompile operation result type
///
/// Returns either `Ok(PrecompileOutput)` or `Err(error)`.
pub type PrecompileResult = Result<PrecompileOutput, PrecompileError>;

/// Precompile execution output
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PrecompileOutput {
    /// Gas used by the precompile
    pub gas_used: u64,
    /// Output bytes
    pub bytes: Bytes,
    /// Whether the precompile reverted
    pub reverted: bool,
}

impl PrecompileOutput {
    /// Returns new precompile output with the given gas used and output bytes.
    pub fn new(gas_used: u64, bytes: Bytes) -> Self {
        Self {
            gas_used,
            bytes,
            reverted: false,
        }
    }
}

/// Precompile function type. Takes input and gas limit and returns precompile result.
pub type PrecompileFn = fn(&[u8], u64) -> PrecompileResult;

/// Precompile and its address.
#[derive(Clone, Debug)]
pub struct PrecompileWithAddress(pub Address, pub PrecompileFn);

impl From<PrecompileWithAddress> for (Address, PrecompileFn) {
    fn from(value: PrecompileWithAddress) -> Self {
        (value.0, value.1)
    }
}

impl PrecompileWithAddress {
    /// Returns reference of address.
    #[inline]
    pub fn address(&self) -> &Address {
        &self.0
    }
}

/// Precompile error type.
///
/// Several causes may share one [`PrecompileErrorKind`]; the kind is what the calling
/// engine turns into its halt reason.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum PrecompileError {
    /// Gas limit is smaller than the cost of the requested rounds.
    #[error("out of gas")]
    OutOfGas,
    /// Blake2 input is not exactly 213 bytes.
    #[error("wrong input length for blake2")]
    Blake2WrongLength,
    /// Blake2 final block indicator flag is neither 0 nor 1.
    #[error("wrong final indicator flag for blake2")]
    Blake2WrongFinalIndicatorFlag,
    /// Fatal error with a custom error message
    #[error("{0}")]
    Fatal(String),
}

impl PrecompileError {
    /// Returns the kind reported to the caller.
    pub const fn kind(&self) -> PrecompileErrorKind {
        match self {
            Self::OutOfGas => PrecompileErrorKind::OutOfGas,
            Self::Blake2WrongLength | Self::Blake2WrongFinalIndicatorFlag => {
                PrecompileErrorKind::OutOfRange
            }
            Self::Fatal(_) => PrecompileErrorKind::Fatal,
        }
    }

    /// Returns `true` if the error is out of gas.
    pub fn is_oog(&self) -> bool {
        matches!(self, Self::OutOfGas)
    }
}

/// Error kind surfaced to the calling engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PrecompileErrorKind {
    /// Input is malformed.
    OutOfRange,
    /// Not enough gas for the requested work.
    OutOfGas,
    /// No precompile is active at the called address.
    Fatal,
}

impl PrecompileErrorKind {
    /// Returns the error string the engine reports for this kind.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OutOfRange => "value out of range",
            Self::OutOfGas => "out of gas",
            Self::Fatal => "fatal",
        }
    }
}

impl core::fmt::Display for PrecompileErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blake2_errors_share_out_of_range_kind() {
        assert_eq!(
            PrecompileError::Blake2WrongLength.kind(),
            PrecompileErrorKind::OutOfRange
        );
        assert_eq!(
            PrecompileError::Blake2WrongFinalIndicatorFlag.kind(),
            PrecompileErrorKind::OutOfRange
        );
        assert_ne!(
            PrecompileError::Blake2WrongLength,
            PrecompileError::Blake2WrongFinalIndicatorFlag
        );
    }

    #[test]
    fn out_of_gas() {
        let err = PrecompileError::OutOfGas;
        assert!(err.is_oog());
        assert_eq!(err.kind().as_str(), "out of gas");
        assert_eq!(err.to_string(), "out of gas");
        assert!(!PrecompileError::Blake2WrongLength.is_oog());
    }

    #[test]
    fn kind_strings() {
        assert_eq!(PrecompileErrorKind::OutOfRange.to_string(), "value out of range");
        assert_eq!(
            PrecompileError::Fatal("no precompile".into()).kind(),
            PrecompileErrorKind::Fatal
        );
    }
}
