//! # blake2f-precompile
//!
//! The Blake2 compression function `F` precompile (EIP-152) and the
//! hard fork gated set it is registered in.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc as std;

pub mod blake2;
pub mod interface;

pub use interface::*;
pub use primitives;

use once_cell::race::OnceBox;
use primitives::{hardfork::SpecId, Address};
use std::{boxed::Box, collections::BTreeMap, format};
use tracing::debug;

/// Precompiles active under one spec, keyed by address.
#[derive(Clone, Default, Debug)]
pub struct Precompiles {
    inner: BTreeMap<Address, PrecompileFn>,
}

impl Precompiles {
    /// Returns the precompiles for the given spec.
    pub fn new(spec: PrecompileSpecId) -> &'static Self {
        match spec {
            PrecompileSpecId::HOMESTEAD | PrecompileSpecId::BYZANTIUM => Self::homestead(),
            PrecompileSpecId::ISTANBUL
            | PrecompileSpecId::BERLIN
            | PrecompileSpecId::CANCUN
            | PrecompileSpecId::PRAGUE
            | PrecompileSpecId::LATEST => Self::istanbul(),
        }
    }

    /// Returns precompiles for specs before Istanbul. Blake2 `F` is not reachable there.
    pub fn homestead() -> &'static Self {
        static INSTANCE: OnceBox<Precompiles> = OnceBox::new();
        INSTANCE.get_or_init(|| Box::new(Precompiles::default()))
    }

    /// Returns precompiles for Istanbul spec and everything after it.
    pub fn istanbul() -> &'static Self {
        static INSTANCE: OnceBox<Precompiles> = OnceBox::new();
        INSTANCE.get_or_init(|| {
            let mut precompiles = Self::homestead().clone();
            precompiles.extend([
                // EIP-152: Add BLAKE2 compression function `F` precompile.
                blake2::FUN,
            ]);
            Box::new(precompiles)
        })
    }

    /// Returns an iterator over the precompiles addresses.
    #[inline]
    pub fn addresses(&self) -> impl ExactSizeIterator<Item = &Address> {
        self.inner.keys()
    }

    /// Is the given address a precompile.
    #[inline]
    pub fn contains(&self, address: &Address) -> bool {
        self.inner.contains_key(address)
    }

    /// Returns the precompile for the given address.
    #[inline]
    pub fn get(&self, address: &Address) -> Option<&PrecompileFn> {
        self.inner.get(address)
    }

    /// Is the precompiles list empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of precompiles.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Extends the precompiles with the given precompiles.
    ///
    /// Other precompiles with overwrite existing precompiles.
    #[inline]
    pub fn extend(&mut self, other: impl IntoIterator<Item = PrecompileWithAddress>) {
        self.inner
            .extend(other.into_iter().map(<(Address, PrecompileFn)>::from));
    }

    /// Calls the precompile at `address` the way the interpreter does for a `CALL`.
    ///
    /// An address with no active precompile is a [`PrecompileError::Fatal`], as the
    /// interpreter should never route such a call here.
    pub fn invoke(&self, address: &Address, input: &[u8], gas_limit: u64) -> PrecompileResult {
        let Some(precompile) = self.get(address) else {
            debug!(%address, "no active precompile");
            return Err(PrecompileError::Fatal(format!(
                "no precompile at address {address}"
            )));
        };
        precompile(input, gas_limit)
    }
}

/// Ethereum hardfork spec ids. Represents the specs where the precompile set changed upstream.
///
/// Only [`PrecompileSpecId::ISTANBUL`] changes the set served by this crate; the other
/// boundaries are kept so callers can map any [`SpecId`] through one type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrecompileSpecId {
    /// Frontier up to Spurious Dragon.
    HOMESTEAD,
    /// Byzantium up to Petersburg.
    BYZANTIUM,
    /// Istanbul introduced [EIP-152](https://eips.ethereum.org/EIPS/eip-152),
    /// the `F` precompile at address 0x09.
    ISTANBUL,
    /// Berlin up to Shanghai.
    BERLIN,
    /// Cancun.
    CANCUN,
    /// Prague and Osaka.
    PRAGUE,
    /// Latest spec.
    LATEST,
}

impl From<SpecId> for PrecompileSpecId {
    fn from(spec_id: SpecId) -> Self {
        Self::from_spec_id(spec_id)
    }
}

impl PrecompileSpecId {
    /// Returns the appropriate precompile Spec for the primitive [SpecId].
    pub const fn from_spec_id(spec_id: SpecId) -> Self {
        if spec_id.is_enabled_in(SpecId::PRAGUE) {
            Self::PRAGUE
        } else if spec_id.is_enabled_in(SpecId::CANCUN) {
            Self::CANCUN
        } else if spec_id.is_enabled_in(SpecId::BERLIN) {
            Self::BERLIN
        } else if spec_id.is_enabled_in(SpecId::ISTANBUL) {
            Self::ISTANBUL
        } else if spec_id.is_enabled_in(SpecId::BYZANTIUM) {
            Self::BYZANTIUM
        } else {
            Self::HOMESTEAD
        }
    }
}
