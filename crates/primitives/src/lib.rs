//! # blake2f-primitives
//!
//! Types shared by the Blake2 `F` precompile and its runners: hard fork
//! identifiers that decide whether the precompile is reachable, and the
//! byte/address types re-exported from `alloy-primitives`.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(not(feature = "std"), no_std)]

pub mod hardfork;

pub use alloy_primitives::{self, address, hex, Address, Bytes};

/// Address of the Blake2 `F` precompile (EIP-152).
pub const BLAKE2F_ADDRESS: Address = address!("0x0000000000000000000000000000000000000009");
