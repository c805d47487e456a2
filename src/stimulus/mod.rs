//! Random stimulus and expected results for the testbenches.
//!
//! Operands are drawn as integers in `[0, length)` and encoded as
//! stochastic streams by comparing them against an LFSR sequence, the same
//! way an SNG does in hardware. The reference models in [`model`] then
//! compute the exact bit the device must produce on every cycle.

mod datasets;
pub mod model;

pub use datasets::{AdderTreeData, DotProductData, MatrixMultData};

use rand::Rng;

use crate::bits::{clog2, to_binary};
use crate::lfsr::Lfsr;

pub const DATA_VECTORS: &str = "data_vectors.mif";
pub const WEIGHT_VECTORS: &str = "weight_vectors.mif";
pub const SELECT_STREAMS: &str = "select_streams.mif";
pub const DP_RESULTS: &str = "dp_results.mif";
pub const INPUT_MATRICES: &str = "input_matrices.mif";
pub const WEIGHT_MATRICES: &str = "weight_matrices.mif";
pub const MM_SELECT_STREAMS: &str = "mm_select_streams.mif";
pub const MM_RESULT: &str = "mm_result.mif";
pub const ADDER_INPUTS: &str = "adder_inputs.mif";
pub const ADDER_RESULTS: &str = "adder_results.mif";

/// Narrowest LFSR used for stimulus.
pub const MIN_SEQUENCE_WIDTH: u32 = 3;

/// One data file: name within `tb/data/` and its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFile {
    pub name: &'static str,
    pub contents: String,
}

impl DataFile {
    fn new(name: &'static str, contents: String) -> Self {
        Self { name, contents }
    }
}

/// Width of the LFSR that produces a `length`-long sequence.
pub fn sequence_width(length: usize) -> u32 {
    (clog2(length) as u32).max(MIN_SEQUENCE_WIDTH)
}

/// `length` values of a zero-inserting LFSR started from a random seed.
pub fn lfsr_sequence<R: Rng>(length: usize, rng: &mut R) -> Vec<u64> {
    let width = sequence_width(length);
    let seed = rng.gen_range(0..1u64 << width);
    Lfsr::new(width, seed).take(length).collect()
}

/// Stochastic encoding of `value`: bit `t` is set when `sequence[t] < value`.
pub fn encode(value: u64, sequence: &[u64]) -> Vec<bool> {
    sequence.iter().map(|&r| r < value).collect()
}

/// Select stream over `n` inputs derived from a fresh LFSR sequence.
pub fn select_sequence<R: Rng>(n: usize, length: usize, rng: &mut R) -> Vec<usize> {
    lfsr_sequence(length, rng)
        .into_iter()
        .map(|r| (r % n as u64) as usize)
        .collect()
}

/// Random operand values in `[0, length)`.
pub fn random_values<R: Rng>(count: usize, length: usize, rng: &mut R) -> Vec<u64> {
    (0..count).map(|_| rng.gen_range(0..length as u64)).collect()
}

/// Transpose per-element streams into per-cycle words.
pub fn words(streams: &[Vec<bool>], length: usize) -> Vec<Vec<bool>> {
    (0..length)
        .map(|t| streams.iter().map(|s| s[t]).collect())
        .collect()
}

// ── .mif formatting ──

/// One word per line, element 0 in the least significant (rightmost) bit.
pub fn mif_words(words: &[Vec<bool>]) -> String {
    let mut out = String::new();
    for word in words {
        out.extend(word.iter().rev().map(|&b| bit(b)));
        out.push('\n');
    }
    out
}

/// One bit per line.
pub fn mif_bits(bits: &[bool]) -> String {
    let mut out = String::with_capacity(bits.len() * 2);
    for &b in bits {
        out.push(bit(b));
        out.push('\n');
    }
    out
}

/// One `width`-bit binary number per line.
pub fn mif_numbers(values: &[usize], width: usize) -> String {
    let mut out = String::new();
    for &v in values {
        out.push_str(&to_binary(v as u64, width));
        out.push('\n');
    }
    out
}

fn bit(b: bool) -> char {
    if b {
        '1'
    } else {
        '0'
    }
}
