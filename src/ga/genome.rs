//! Bitstring genomes and their cache keys.
//!
//! A [`Genome`] is an owned, fixed-length sequence of bits. Operators take
//! genomes by value or by exclusive reference, so two individuals never share
//! backing storage.
//!
//! A [`GenomeKey`] packs the bits into 64-bit words together with the bit
//! length. Packing is injective: equal bit sequences give equal keys and any
//! difference in a single bit (or in length) gives a different key.

use rand::Rng;
use std::fmt;
use std::str::FromStr;

const WORD_BITS: usize = 64;

/// A candidate solution: a fixed-length vector of bits.
///
/// # Examples
///
/// ```
/// use u_bitga::ga::Genome;
///
/// let g: Genome = "1011".parse().unwrap();
/// assert_eq!(g.len(), 4);
/// assert_eq!(g.count_ones(), 3);
/// assert_eq!(g.to_string(), "1011");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Genome {
    bits: Vec<bool>,
}

impl Genome {
    /// Creates a genome of `dim` independent, unbiased random bits.
    pub fn random<R: Rng>(dim: usize, rng: &mut R) -> Self {
        Self {
            bits: (0..dim).map(|_| rng.random_bool(0.5)).collect(),
        }
    }

    /// Creates a genome of `dim` zero bits.
    pub fn zeros(dim: usize) -> Self {
        Self {
            bits: vec![false; dim],
        }
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Returns `true` for a zero-length genome.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// The bits, in order.
    pub fn as_bits(&self) -> &[bool] {
        &self.bits
    }

    /// Mutable access to the bits. The length cannot change.
    pub fn bits_mut(&mut self) -> &mut [bool] {
        &mut self.bits
    }

    /// Consumes the genome and returns its bits.
    pub fn into_bits(self) -> Vec<bool> {
        self.bits
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Returns the bitwise complement.
    pub fn complement(&self) -> Self {
        Self {
            bits: self.bits.iter().map(|&b| !b).collect(),
        }
    }

    /// Canonical cache key for this genome.
    pub fn key(&self) -> GenomeKey {
        encode(&self.bits)
    }
}

impl From<Vec<bool>> for Genome {
    fn from(bits: Vec<bool>) -> Self {
        Self { bits }
    }
}

impl From<&[u8]> for Genome {
    /// Builds a genome from 0/1 values; any non-zero value is a set bit.
    fn from(values: &[u8]) -> Self {
        Self {
            bits: values.iter().map(|&v| v != 0).collect(),
        }
    }
}

impl AsRef<[bool]> for Genome {
    fn as_ref(&self) -> &[bool] {
        &self.bits
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_bits(f, self.bits.iter().copied())
    }
}

/// Error returned when parsing a genome from a string that is not made of
/// `0` and `1` characters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid genome character {found:?} at position {position}")]
pub struct ParseGenomeError {
    pub position: usize,
    pub found: char,
}

impl FromStr for Genome {
    type Err = ParseGenomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .enumerate()
            .map(|(position, c)| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                found => Err(ParseGenomeError { position, found }),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Genome::from)
    }
}

/// Collision-free identity of a bit sequence, used as the fitness cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenomeKey {
    len: usize,
    words: Box<[u64]>,
}

impl GenomeKey {
    /// Number of bits encoded in the key.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when the key encodes a zero-length genome.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn bit(&self, i: usize) -> bool {
        (self.words[i / WORD_BITS] >> (i % WORD_BITS)) & 1 == 1
    }
}

impl fmt::Display for GenomeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_bits(f, (0..self.len).map(|i| self.bit(i)))
    }
}

/// Encodes a bit sequence into its [`GenomeKey`].
///
/// Pure function of the bits; allocates only the key itself.
pub fn encode(bits: &[bool]) -> GenomeKey {
    let mut words = vec![0u64; bits.len().div_ceil(WORD_BITS)];
    for (i, &bit) in bits.iter().enumerate() {
        if bit {
            words[i / WORD_BITS] |= 1 << (i % WORD_BITS);
        }
    }
    GenomeKey {
        len: bits.len(),
        words: words.into_boxed_slice(),
    }
}

fn write_bits(f: &mut fmt::Formatter<'_>, bits: impl Iterator<Item = bool>) -> fmt::Result {
    for b in bits {
        f.write_str(if b { "1" } else { "0" })?;
    }
    Ok(())
}
