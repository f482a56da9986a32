//! `vectors` subcommand: runs JSON suites of Blake2 `F` test vectors.

use super::run::{call, decode_input, Outcome};
use clap::Parser;
use precompile::PrecompileErrorKind;
use primitives::{hardfork::SpecId, hex};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// Gas limit used when a vector does not set one.
pub const DEFAULT_GAS_LIMIT: u64 = 10_000_000;

/// Errors of the `vectors` subcommand.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Path does not exist.
    #[error("path does not exist: {}", .0.display())]
    InvalidPath(PathBuf),
    /// No `.json` files under the path.
    #[error("no JSON vector files found in {}", .0.display())]
    NoJsonFiles(PathBuf),
    /// File could not be read.
    #[error("reading {}: {source}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// File is not a vector suite.
    #[error("parsing {}: {source}", path.display())]
    Json {
        /// File being parsed.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
    /// At least one vector failed.
    #[error("{failed} of {total} vectors failed")]
    Failed {
        /// Number of failed vectors.
        failed: usize,
        /// Number of vectors run.
        total: usize,
    },
}

/// Why a single vector failed.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum VectorErrorKind {
    /// Input is not valid hex.
    #[error("invalid hex input")]
    InvalidInput,
    /// Vector sets neither `expected` nor `error`.
    #[error("vector has no expectation")]
    NoExpectation,
    /// Call outcome differs from the expectation.
    #[error("unexpected outcome: got {got:?}, expected {expected:?}")]
    UnexpectedOutcome {
        /// What the precompile returned.
        got: Outcome,
        /// What the vector asks for.
        expected: Expectation,
    },
}

/// One test vector.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TestVector {
    /// Vector name.
    pub name: String,
    /// Hex-encoded input.
    pub input: String,
    /// Gas limit, [`DEFAULT_GAS_LIMIT`] when absent.
    #[serde(default)]
    pub gas: Option<u64>,
    /// Hex-encoded expected output.
    #[serde(default)]
    pub expected: Option<String>,
    /// Expected gas used, only checked on success.
    #[serde(default)]
    pub gas_used: Option<u64>,
    /// Expected error kind.
    #[serde(default)]
    pub error: Option<PrecompileErrorKind>,
}

/// Expected outcome of a vector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expectation {
    /// Call succeeds with this output and, if set, this gas.
    Output {
        /// Lowercase hex output.
        bytes: String,
        /// Expected gas used.
        gas_used: Option<u64>,
    },
    /// Call fails with this kind.
    Error(PrecompileErrorKind),
}

impl TestVector {
    /// Returns what this vector expects.
    pub fn expectation(&self) -> Result<Expectation, VectorErrorKind> {
        match (&self.expected, self.error) {
            (Some(bytes), None) => Ok(Expectation::Output {
                bytes: bytes.trim_start_matches("0x").to_ascii_lowercase(),
                gas_used: self.gas_used,
            }),
            (None, Some(kind)) => Ok(Expectation::Error(kind)),
            _ => Err(VectorErrorKind::NoExpectation),
        }
    }

    /// Runs the vector under `spec`.
    pub fn check(&self, spec: SpecId) -> Result<(), VectorErrorKind> {
        let expected = self.expectation()?;
        let input = decode_input(&self.input).map_err(|_| VectorErrorKind::InvalidInput)?;
        let result = call(spec, &input, self.gas.unwrap_or(DEFAULT_GAS_LIMIT));

        let matches = match (&result, &expected) {
            (Ok(output), Expectation::Output { bytes, gas_used }) => {
                hex::encode(&output.bytes) == *bytes
                    && gas_used.is_none_or(|gas| gas == output.gas_used)
            }
            (Err(err), Expectation::Error(kind)) => err.kind() == *kind,
            _ => false,
        };

        if matches {
            return Ok(());
        }
        Err(VectorErrorKind::UnexpectedOutcome {
            got: Outcome::from(&result),
            expected,
        })
    }
}

/// `vectors` subcommand
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Path to folder or file containing the vectors
    ///
    /// Folders will be searched recursively for files with the extension `.json`.
    #[arg(required = true, num_args = 1..)]
    paths: Vec<PathBuf>,
    /// Hard fork deciding whether the precompile is active
    #[arg(long, default_value = "Latest")]
    spec: SpecId,
    /// Keep going after a vector failure
    #[arg(long, alias = "no-fail-fast")]
    keep_going: bool,
}

/// Returns all `.json` files under `path`, or `path` itself if it is a file.
pub fn find_all_json_tests(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        vec![path.to_path_buf()]
    } else {
        WalkDir::new(path)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.path().extension() == Some("json".as_ref()))
            .map(DirEntry::into_path)
            .collect()
    }
}

/// Reads one vector suite, a JSON array of [`TestVector`].
pub fn load_suite(path: &Path) -> Result<Vec<TestVector>, Error> {
    let json = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}

impl Cmd {
    /// Runs `vectors` command.
    pub fn run(&self) -> Result<(), Error> {
        let mut total = 0;
        let mut failed = 0;

        for path in &self.paths {
            if !path.exists() {
                return Err(Error::InvalidPath(path.clone()));
            }
            let files = find_all_json_tests(path);
            if files.is_empty() {
                return Err(Error::NoJsonFiles(path.clone()));
            }

            for file in files {
                let suite = load_suite(&file)?;
                info!(path = %file.display(), vectors = suite.len(), spec = %self.spec, "running suite");

                for vector in &suite {
                    total += 1;
                    match vector.check(self.spec) {
                        Ok(()) => debug!(name = %vector.name, "passed"),
                        Err(kind) => {
                            failed += 1;
                            println!("FAIL {}: {} ({kind})", file.display(), vector.name);
                            if !self.keep_going {
                                return Err(Error::Failed { failed, total });
                            }
                        }
                    }
                }
            }
        }

        println!("{} of {total} vectors passed", total - failed);
        if failed > 0 {
            return Err(Error::Failed { failed, total });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLED: &str = include_str!("../../vectors/eip152.json");

    fn bundled() -> Vec<TestVector> {
        serde_json::from_str(BUNDLED).unwrap()
    }

    #[test]
    fn bundled_vectors_pass_from_istanbul() {
        let suite = bundled();
        assert_eq!(suite.len(), 10);
        for vector in &suite {
            assert_eq!(vector.check(SpecId::ISTANBUL), Ok(()), "{}", vector.name);
        }
    }

    #[test]
    fn bundled_vectors_fail_before_istanbul() {
        for vector in bundled() {
            assert!(matches!(
                vector.check(SpecId::PETERSBURG),
                Err(VectorErrorKind::UnexpectedOutcome { .. })
            ));
        }
    }

    #[test]
    fn mismatch_reports_outcome() {
        let vector: TestVector = serde_json::from_str(
            r#"{ "name": "wrong", "input": "", "expected": "00" }"#,
        )
        .unwrap();
        let Err(VectorErrorKind::UnexpectedOutcome { got, expected }) = vector.check(SpecId::LATEST)
        else {
            panic!("expected a mismatch");
        };
        assert_eq!(got.exception_error, Some(PrecompileErrorKind::OutOfRange));
        assert_eq!(
            expected,
            Expectation::Output {
                bytes: "00".into(),
                gas_used: None
            }
        );
    }

    #[test]
    fn vector_needs_one_expectation() {
        let vector: TestVector =
            serde_json::from_str(r#"{ "name": "none", "input": "00" }"#).unwrap();
        assert_eq!(vector.check(SpecId::LATEST), Err(VectorErrorKind::NoExpectation));

        let vector: TestVector = serde_json::from_str(
            r#"{ "name": "both", "input": "00", "expected": "00", "error": "out_of_range" }"#,
        )
        .unwrap();
        assert_eq!(vector.check(SpecId::LATEST), Err(VectorErrorKind::NoExpectation));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let res = serde_json::from_str::<TestVector>(r#"{ "name": "x", "input": "", "foo": 1 }"#);
        assert!(res.is_err());
    }
}
