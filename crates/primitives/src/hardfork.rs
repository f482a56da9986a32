//! Hard fork identifiers.
//!
//! The Blake2 `F` precompile is only reachable from [`SpecId::ISTANBUL`] onwards, so the
//! runners carry a [`SpecId`] as their activation context.
#![allow(non_camel_case_types)]

use core::{fmt, str::FromStr};
use num_enum::TryFromPrimitive;
pub use SpecId::*;

/// Specification IDs in activation order.
///
/// Ordering is meaningful: `a >= b` means every rule introduced in `b` also applies in `a`.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpecId {
    /// Frontier, block 0.
    FRONTIER = 0,
    /// Frontier Thawing, block 200000.
    FRONTIER_THAWING,
    /// Homestead, block 1150000.
    HOMESTEAD,
    /// DAO Fork, block 1920000.
    DAO_FORK,
    /// Tangerine Whistle, block 2463000.
    TANGERINE,
    /// Spurious Dragon, block 2675000.
    SPURIOUS_DRAGON,
    /// Byzantium, block 4370000.
    BYZANTIUM,
    /// Constantinople, superseded by Petersburg at the same block.
    CONSTANTINOPLE,
    /// Petersburg, block 7280000.
    PETERSBURG,
    /// Istanbul, block 9069000. Introduces EIP-152.
    ISTANBUL,
    /// Muir Glacier, block 9200000.
    MUIR_GLACIER,
    /// Berlin, block 12244000.
    BERLIN,
    /// London, block 12965000.
    LONDON,
    /// Arrow Glacier, block 13773000.
    ARROW_GLACIER,
    /// Gray Glacier, block 15050000.
    GRAY_GLACIER,
    /// Paris/Merge, block 15537394.
    MERGE,
    /// Shanghai, timestamp 1681338455.
    SHANGHAI,
    /// Cancun, timestamp 1710338135.
    CANCUN,
    /// Prague, timestamp 1746612311.
    #[default]
    PRAGUE,
    /// Osaka.
    OSAKA,
}

/// Hard fork names as accepted by [`SpecId::from_str`] and printed by [`SpecId`]'s `Display`.
const NAMES: [(SpecId, &str); 20] = [
    (FRONTIER, "Frontier"),
    (FRONTIER_THAWING, "Frontier Thawing"),
    (HOMESTEAD, "Homestead"),
    (DAO_FORK, "DAO Fork"),
    (TANGERINE, "Tangerine"),
    (SPURIOUS_DRAGON, "Spurious"),
    (BYZANTIUM, "Byzantium"),
    (CONSTANTINOPLE, "Constantinople"),
    (PETERSBURG, "Petersburg"),
    (ISTANBUL, "Istanbul"),
    (MUIR_GLACIER, "MuirGlacier"),
    (BERLIN, "Berlin"),
    (LONDON, "London"),
    (ARROW_GLACIER, "Arrow Glacier"),
    (GRAY_GLACIER, "Gray Glacier"),
    (MERGE, "Merge"),
    (SHANGHAI, "Shanghai"),
    (CANCUN, "Cancun"),
    (PRAGUE, "Prague"),
    (OSAKA, "Osaka"),
];

impl SpecId {
    /// The most recent hard fork known to this crate.
    pub const LATEST: Self = Self::OSAKA;

    /// Returns the [`SpecId`] for the given [`u8`].
    #[inline]
    pub fn try_from_u8(spec_id: u8) -> Option<Self> {
        Self::try_from(spec_id).ok()
    }

    /// Returns `true` if the given specification ID is enabled in this spec.
    #[inline]
    pub const fn is_enabled_in(self, other: Self) -> bool {
        self as u8 >= other as u8
    }

    /// Returns the human readable hard fork name.
    pub fn name(self) -> &'static str {
        // NAMES is indexed by discriminant.
        NAMES[self as usize].1
    }
}

/// Error type for unknown hardfork names. Returned by [`SpecId::from_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnknownHardfork;

impl fmt::Display for UnknownHardfork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown hardfork")
    }
}

impl core::error::Error for UnknownHardfork {}

impl FromStr for SpecId {
    type Err = UnknownHardfork;

    /// Parses a hard fork name, ignoring ASCII case, or its numeric id.
    /// `Latest` maps to [`SpecId::LATEST`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("latest") {
            return Ok(Self::LATEST);
        }
        if let Ok(id) = s.parse::<u8>() {
            return Self::try_from_u8(id).ok_or(UnknownHardfork);
        }
        NAMES
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(s))
            .map(|(spec, _)| *spec)
            .ok_or(UnknownHardfork)
    }
}

impl fmt::Display for SpecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_discriminants() {
        for (i, (spec, _)) in NAMES.iter().enumerate() {
            assert_eq!(*spec as usize, i);
            assert_eq!(SpecId::try_from_u8(i as u8), Some(*spec));
        }
        assert_eq!(SpecId::try_from_u8(NAMES.len() as u8), None);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Istanbul".parse(), Ok(ISTANBUL));
        assert_eq!("istanbul".parse(), Ok(ISTANBUL));
        assert_eq!("MUIRGLACIER".parse(), Ok(MUIR_GLACIER));
        assert_eq!("latest".parse(), Ok(SpecId::LATEST));
        assert_eq!("Constantinople2".parse::<SpecId>(), Err(UnknownHardfork));
    }

    #[test]
    fn parse_numeric_id() {
        assert_eq!("9".parse(), Ok(ISTANBUL));
        assert_eq!("0".parse(), Ok(FRONTIER));
        assert_eq!("20".parse::<SpecId>(), Err(UnknownHardfork));
        assert_eq!("-1".parse::<SpecId>(), Err(UnknownHardfork));
    }

    #[test]
    fn display_round_trips() {
        for (spec, name) in NAMES {
            assert_eq!(spec.to_string(), name);
            assert_eq!(name.parse(), Ok(spec));
        }
    }

    #[test]
    fn enabled_in_follows_order() {
        assert!(ISTANBUL.is_enabled_in(ISTANBUL));
        assert!(BERLIN.is_enabled_in(ISTANBUL));
        assert!(!PETERSBURG.is_enabled_in(ISTANBUL));
    }
}
