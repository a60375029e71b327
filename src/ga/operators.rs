//! Bitstring crossover and mutation operators.
//!
//! Every operator works on owned genomes: crossover consumes two parents and
//! returns two new children, mutation flips bits of a genome the caller owns
//! exclusively. No child ever shares storage with a parent still in use.
//!
//! # Crossover Operators
//!
//! - [`n_point_crossover`]: exchange tails after each of `n` sorted cut points
//! - [`uniform_crossover`]: swap each bit position independently
//!
//! # Mutation Operators
//!
//! - [`mutate`]: flip each bit independently with a given probability
//!
//! # References
//!
//! - De Jong (1975), *An Analysis of the Behavior of a Class of Genetic
//!   Adaptive Systems* (n-point crossover)
//! - Syswerda (1989), "Uniform Crossover in Genetic Algorithms"

use super::config::GaConfig;
use super::genome::Genome;
use rand::Rng;

// ============================================================================
// Crossover operators
// ============================================================================

/// Recombination applied to each selected pair of parents.
///
/// Derived from the configuration by [`Crossover::from_config`]: a zero
/// crossover rate disables recombination, zero split points select uniform
/// crossover, anything else is n-point crossover.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Crossover {
    /// Parents pass through unchanged.
    None,

    /// N-point crossover with `n` distinct cut points per pair.
    NPoint(usize),

    /// Uniform crossover; each bit position swaps with `swap_rate`.
    Uniform {
        /// Per-bit swap probability, typically 0.5.
        swap_rate: f64,
    },
}

impl Crossover {
    /// Picks the operator described by a validated configuration.
    pub fn from_config(config: &GaConfig) -> Self {
        if config.crossover_rate <= 0.0 {
            Crossover::None
        } else if config.crossover_splits == 0 {
            Crossover::Uniform {
                swap_rate: config.uniform_swap_rate,
            }
        } else {
            Crossover::NPoint(config.crossover_splits)
        }
    }

    /// Recombines two parents into two children.
    ///
    /// # Panics
    /// Panics if the parents differ in length, or if `NPoint(n)` asks for
    /// more cut points than the genome has interior positions. Both are ruled
    /// out by configuration validation.
    pub fn apply<R: Rng>(&self, a: Genome, b: Genome, rng: &mut R) -> (Genome, Genome) {
        match *self {
            Crossover::None => (a, b),
            Crossover::NPoint(n) => {
                let splits = random_splits(a.len(), n, rng);
                n_point_crossover(a, b, &splits)
            }
            Crossover::Uniform { swap_rate } => uniform_crossover(a, b, swap_rate, rng),
        }
    }
}

/// Draws `n` distinct cut points from `[1, dim - 1]`, sorted ascending.
///
/// Sampling is without replacement.
///
/// # Panics
/// Panics if `n > dim - 1` (for `n > 0`).
pub fn random_splits<R: Rng>(dim: usize, n: usize, rng: &mut R) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }
    assert!(
        dim > n,
        "{n} distinct cut points need a genome of at least {} bits, got {dim}",
        n + 1
    );
    let mut splits: Vec<usize> = rand::seq::index::sample(rng, dim - 1, n)
        .into_iter()
        .map(|i| i + 1)
        .collect();
    splits.sort_unstable();
    splits
}

/// N-point crossover at explicit cut points.
///
/// `splits` must be sorted ascending. After each cut point the tails of the
/// two genomes are exchanged, so segments alternate between the parents.
/// An empty split list returns the parents unchanged.
///
/// ```
/// use u_bitga::ga::{n_point_crossover, Genome};
///
/// let a: Genome = "1111".parse().unwrap();
/// let b: Genome = "0000".parse().unwrap();
/// let (c, d) = n_point_crossover(a, b, &[2]);
/// assert_eq!(c.to_string(), "1100");
/// assert_eq!(d.to_string(), "0011");
/// ```
///
/// # Panics
/// Panics if the parents have different lengths or a cut point is beyond
/// the genome.
pub fn n_point_crossover(a: Genome, b: Genome, splits: &[usize]) -> (Genome, Genome) {
    assert_eq!(a.len(), b.len(), "parents must have equal length");
    debug_assert!(splits.windows(2).all(|w| w[0] <= w[1]), "splits must be sorted");

    let mut a = a.into_bits();
    let mut b = b.into_bits();
    for &cut in splits {
        assert!(cut <= a.len(), "cut point {cut} beyond genome of {} bits", a.len());
        a[cut..].swap_with_slice(&mut b[cut..]);
    }
    (Genome::from(a), Genome::from(b))
}

/// Uniform crossover: swaps each bit position independently with `swap_rate`.
///
/// # Panics
/// Panics if the parents have different lengths or `swap_rate` is outside
/// `[0, 1]`.
pub fn uniform_crossover<R: Rng>(
    a: Genome,
    b: Genome,
    swap_rate: f64,
    rng: &mut R,
) -> (Genome, Genome) {
    assert_eq!(a.len(), b.len(), "parents must have equal length");

    let mut a = a.into_bits();
    let mut b = b.into_bits();
    for (x, y) in a.iter_mut().zip(b.iter_mut()) {
        if rng.random_bool(swap_rate) {
            std::mem::swap(x, y);
        }
    }
    (Genome::from(a), Genome::from(b))
}

// ============================================================================
// Mutation operators
// ============================================================================

/// Bit-flip mutation: flips each bit independently with probability `rate`.
///
/// Returns the number of flipped bits. `rate = 1.0` yields the complement,
/// `rate = 0.0` leaves the genome unchanged.
///
/// # Panics
/// Panics if `rate` is outside `[0, 1]`.
pub fn mutate<R: Rng>(genome: &mut Genome, rate: f64, rng: &mut R) -> usize {
    let mut flipped = 0;
    for bit in genome.bits_mut() {
        if rng.random_bool(rate) {
            *bit = !*bit;
            flipped += 1;
        }
    }
    flipped
}

// ============================================================================
// Tests
// ============================================================================
