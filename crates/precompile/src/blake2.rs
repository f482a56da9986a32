//! Blake2 precompile. More details in [`run`]

use crate::{PrecompileError, PrecompileOutput, PrecompileResult, PrecompileWithAddress};
use primitives::{Bytes, BLAKE2F_ADDRESS};
use tracing::trace;

/// Gas charged per round.
pub const F_ROUND: u64 = 1;
/// Exact length of a well formed input.
pub const INPUT_LENGTH: usize = 213;
/// Length of the returned state.
pub const OUTPUT_LENGTH: usize = 64;

const H_OFFSET: usize = 4;
const M_OFFSET: usize = H_OFFSET + 8 * 8;
const T_OFFSET: usize = M_OFFSET + 16 * 8;
const F_OFFSET: usize = T_OFFSET + 2 * 8;

/// Blake2 precompile
pub const FUN: PrecompileWithAddress = PrecompileWithAddress(BLAKE2F_ADDRESS, run);

/// Typed arguments of one `F` invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Blake2Input {
    /// Number of rounds to run.
    pub rounds: u32,
    /// State vector.
    pub h: [u64; 8],
    /// Message block.
    pub m: [u64; 16],
    /// Offset counter.
    pub t: [u64; 2],
    /// Final block indicator flag.
    pub f: bool,
}

impl Blake2Input {
    /// Parses the EIP-152 input layout:
    ///
    /// `[4 bytes rounds (BE)][64 bytes h][128 bytes m][8 bytes t_0][8 bytes t_1][1 byte f]`,
    /// all words other than `rounds` little-endian.
    ///
    /// Input must be exactly [`INPUT_LENGTH`] bytes and `f` must be `0` or `1`.
    pub fn decode(input: &[u8]) -> Result<Self, PrecompileError> {
        let Ok(input) = <&[u8; INPUT_LENGTH]>::try_from(input) else {
            return Err(PrecompileError::Blake2WrongLength);
        };

        let f = match input[F_OFFSET] {
            1 => true,
            0 => false,
            _ => return Err(PrecompileError::Blake2WrongFinalIndicatorFlag),
        };

        let rounds = u32::from_be_bytes([input[0], input[1], input[2], input[3]]);
        let h = core::array::from_fn(|i| le_word(input, H_OFFSET + i * 8));
        let m = core::array::from_fn(|i| le_word(input, M_OFFSET + i * 8));
        let t = [le_word(input, T_OFFSET), le_word(input, T_OFFSET + 8)];

        Ok(Self { rounds, h, m, t, f })
    }

    /// Gas needed to run this input.
    #[inline]
    pub const fn gas_cost(&self) -> u64 {
        self.rounds as u64 * F_ROUND
    }
}

#[inline]
fn le_word(input: &[u8; INPUT_LENGTH], offset: usize) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&input[offset..offset + 8]);
    u64::from_le_bytes(word)
}

/// reference: <https://eips.ethereum.org/EIPS/eip-152>
///
/// Input is fully validated before gas is checked, and gas is checked before any round runs,
/// so malformed input is never charged and an unaffordable call does no work.
pub fn run(input: &[u8], gas_limit: u64) -> PrecompileResult {
    let input = Blake2Input::decode(input).inspect_err(|err| {
        trace!(len = input.len(), %err, "blake2 input rejected");
    })?;

    let gas_used = input.gas_cost();
    if gas_used > gas_limit {
        trace!(rounds = input.rounds, gas_limit, "blake2 out of gas");
        return Err(PrecompileError::OutOfGas);
    }

    let Blake2Input { rounds, h, m, t, f } = input;
    let h = algo::compress(rounds, &h, &m, t, f);

    let mut out = [0u8; OUTPUT_LENGTH];
    for (chunk, word) in out.chunks_exact_mut(8).zip(h.iter()) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }

    trace!(rounds, gas_used, "blake2 compressed");
    Ok(PrecompileOutput::new(gas_used, Bytes::copy_from_slice(&out)))
}

/// Blake2 algorithm
pub mod algo {
    /// SIGMA from spec: <https://datatracker.ietf.org/doc/html/rfc7693#section-2.7>
    pub const SIGMA: [[usize; 16]; 10] = [
        [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
        [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
        [11, 8, 12, 0, 5, 2, 15, 13, 10, 14, 3, 6, 7, 1, 9, 4],
        [7, 9, 3, 1, 13, 12, 11, 14, 2, 6, 5, 10, 4, 0, 15, 8],
        [9, 0, 5, 7, 2, 4, 10, 15, 14, 1, 11, 12, 6, 8, 3, 13],
        [2, 12, 6, 10, 0, 11, 8, 3, 4, 13, 7, 5, 15, 14, 1, 9],
        [12, 5, 1, 15, 14, 13, 4, 10, 0, 7, 6, 3, 9, 2, 8, 11],
        [13, 11, 7, 14, 12, 1, 3, 9, 5, 0, 15, 4, 8, 6, 2, 10],
        [6, 15, 14, 9, 11, 3, 0, 8, 12, 2, 13, 7, 1, 4, 10, 5],
        [10, 2, 8, 4, 7, 6, 1, 5, 15, 11, 9, 14, 3, 12, 13, 0],
    ];

    /// IV from: <https://datatracker.ietf.org/doc/html/rfc7693#section-2.6>
    pub const IV: [u64; 8] = [
        0x6a09e667f3bcc908,
        0xbb67ae8584caa73b,
        0x3c6ef372fe94f82b,
        0xa54ff53a5f1d36f1,
        0x510e527fade682d1,
        0x9b05688c2b3e6c1f,
        0x1f83d9abfb41bd6b,
        0x5be0cd19137e2179,
    ];

    #[inline(always)]
    #[allow(clippy::many_single_char_names)]
    /// G function: <https://tools.ietf.org/html/rfc7693#section-3.1>
    pub fn g(v: &mut [u64; 16], a: usize, b: usize, c: usize, d: usize, x: u64, y: u64) {
        v[a] = v[a].wrapping_add(v[b]).wrapping_add(x);
        v[d] = (v[d] ^ v[a]).rotate_right(32);
        v[c] = v[c].wrapping_add(v[d]);
        v[b] = (v[b] ^ v[c]).rotate_right(24);

        v[a] = v[a].wrapping_add(v[b]).wrapping_add(y);
        v[d] = (v[d] ^ v[a]).rotate_right(16);
        v[c] = v[c].wrapping_add(v[d]);
        v[b] = (v[b] ^ v[c]).rotate_right(63);
    }

    /// Compression function F takes as an argument the state vector "h",
    /// message block vector "m", 2w-bit offset counter "t", and final block
    /// indicator flag "f". Local vector v[0..15] is used in processing. F
    /// returns a new state vector. Rounds are numbered from 0 to `rounds - 1`
    /// and reuse [`SIGMA`] cyclically.
    #[allow(clippy::many_single_char_names)]
    pub fn compress(rounds: u32, h: &[u64; 8], m: &[u64; 16], t: [u64; 2], f: bool) -> [u64; 8] {
        let mut v = [0u64; 16];
        v[..8].copy_from_slice(h); // First half from state.
        v[8..].copy_from_slice(&IV); // Second half from IV.

        v[12] ^= t[0];
        v[13] ^= t[1];

        if f {
            v[14] = !v[14]; // Invert all bits if the last-block-flag is set.
        }

        for r in 0..rounds {
            round(&mut v, m, &SIGMA[r as usize % 10]);
        }

        core::array::from_fn(|i| h[i] ^ v[i] ^ v[i + 8])
    }

    #[inline(always)]
    fn round(v: &mut [u64; 16], m: &[u64; 16], s: &[usize; 16]) {
        // columns
        g(v, 0, 4, 8, 12, m[s[0]], m[s[1]]);
        g(v, 1, 5, 9, 13, m[s[2]], m[s[3]]);
        g(v, 2, 6, 10, 14, m[s[4]], m[s[5]]);
        g(v, 3, 7, 11, 15, m[s[6]], m[s[7]]);

        // diagonals
        g(v, 0, 5, 10, 15, m[s[8]], m[s[9]]);
        g(v, 1, 6, 11, 12, m[s[10]], m[s[11]]);
        g(v, 2, 7, 8, 13, m[s[12]], m[s[13]]);
        g(v, 3, 4, 9, 14, m[s[14]], m[s[15]]);
    }
}
