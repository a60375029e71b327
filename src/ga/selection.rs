//! Selection strategies for the GA.
//!
//! Selection builds the next mating pool by drawing genomes, with
//! replacement, from the current population. Fitness is maximized.
//!
//! # References
//!
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and
//!   Machine Learning*, ch. 1 (roulette wheel)
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use super::genome::Genome;
use crate::error::{ConfigError, GaError};
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Selection strategy for building the mating pool.
///
/// # Examples
///
/// ```
/// use u_bitga::ga::Selection;
///
/// let sel: Selection = "roulette wheel".parse().unwrap();
/// assert_eq!(sel, Selection::Roulette);
/// assert!("tournament".parse::<Selection>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Uniform random selection: every index is equally likely, regardless
    /// of fitness.
    ///
    /// # Complexity
    /// O(1) per draw
    Random,

    /// Fitness-proportional (roulette wheel) selection.
    ///
    /// Each individual is drawn with probability `fitness / total`. A
    /// cumulative-probability table is built once per call and each draw
    /// spins a uniform value in `[0, 1)`, picking the first entry whose
    /// cumulative probability exceeds the spin.
    ///
    /// Negative fitness values carry zero weight. When no individual has a
    /// positive weight (all zero, all negative, or a non-finite total) the
    /// call falls back to uniform random selection.
    ///
    /// # Complexity
    /// O(n) table construction, O(n) per draw (linear scan)
    #[default]
    Roulette,
}

impl Selection {
    /// Draws `size` genomes from `population`, with replacement.
    ///
    /// `fitness[i]` is the fitness of `population[i]`.
    ///
    /// # Errors
    ///
    /// - [`GaError::InvalidSelectionSize`] if `size` is outside
    ///   `[1, population.len()]`
    /// - [`GaError::FitnessLengthMismatch`] if the slices differ in length
    pub fn select<R: Rng>(
        &self,
        population: &[Genome],
        fitness: &[f64],
        size: usize,
        rng: &mut R,
    ) -> Result<Vec<Genome>, GaError> {
        let n = population.len();
        if size == 0 || size > n {
            return Err(GaError::InvalidSelectionSize {
                requested: size,
                population: n,
            });
        }
        if fitness.len() != n {
            return Err(GaError::FitnessLengthMismatch {
                fitness: fitness.len(),
                population: n,
            });
        }

        let indices = match self {
            Selection::Random => uniform_indices(n, size, rng),
            Selection::Roulette => roulette_indices(fitness, size, rng),
        };
        Ok(indices.into_iter().map(|i| population[i].clone()).collect())
    }

    /// Canonical name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            Selection::Random => "random selection",
            Selection::Roulette => "roulette wheel",
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Selection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random selection" | "random" => Ok(Selection::Random),
            "roulette wheel" | "roulette" => Ok(Selection::Roulette),
            _ => Err(ConfigError::UnknownSelection(s.to_string())),
        }
    }
}

fn uniform_indices<R: Rng>(n: usize, size: usize, rng: &mut R) -> Vec<usize> {
    (0..size).map(|_| rng.random_range(0..n)).collect()
}

/// Roulette wheel over raw fitness values.
///
/// The table is `cumsum(w_i / total)` with `w_i = max(f_i, 0)`.
fn roulette_indices<R: Rng>(fitness: &[f64], size: usize, rng: &mut R) -> Vec<usize> {
    let n = fitness.len();
    let weights: Vec<f64> = fitness
        .iter()
        .map(|&f| if f > 0.0 { f } else { 0.0 })
        .collect();
    let total: f64 = weights.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        log::debug!("roulette wheel has no positive weight (total = {total}), drawing uniformly");
        return uniform_indices(n, size, rng);
    }

    let mut cumulative = 0.0;
    let wheel: Vec<f64> = weights
        .iter()
        .map(|&w| {
            cumulative += w / total;
            cumulative
        })
        .collect();

    let last_positive = weights.iter().rposition(|&w| w > 0.0).unwrap_or(n - 1);
    (0..size)
        .map(|_| spin_wheel(&wheel, last_positive, rng.random()))
        .collect()
}

/// First slot whose cumulative share exceeds `spin`, a draw from `[0, 1)`.
///
/// Strict comparison skips zero-weight slots, whose share equals the one
/// before them. Rounding can leave the table just below 1.0; such spins land
/// on the last positive slot.
fn spin_wheel(wheel: &[f64], last_positive: usize, spin: f64) -> usize {
    wheel
        .iter()
        .position(|&c| c > spin)
        .unwrap_or(last_positive)
}
