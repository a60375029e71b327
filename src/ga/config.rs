//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

use super::selection::Selection;
use crate::error::ConfigError;

/// Configuration for the bitstring Genetic Algorithm.
///
/// Controls population size, selection strategy, operator rates, the
/// stagnation escape, and reproducibility. Builders store values as given;
/// [`validate`](Self::validate) rejects anything out of range.
///
/// # Defaults
///
/// ```
/// use u_bitga::ga::{GaConfig, Selection};
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 40);
/// assert_eq!(config.selection, Selection::Roulette);
/// assert_eq!(config.crossover_splits, 2);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_bitga::ga::{GaConfig, Selection};
///
/// let config = GaConfig::default()
///     .with_population_size(100)
///     .with_selection(Selection::Random)
///     .with_crossover_rate(0.8)
///     .with_crossover_splits(0)
///     .with_mutation_rate(0.01)
///     .with_seed(42);
/// assert!(config.validate(50).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of individuals in the population. Must be even and at least 2.
    pub population_size: usize,

    /// Selection strategy for building the mating pool.
    pub selection: Selection,

    /// Probability that an adjacent pair undergoes crossover (0.0–1.0).
    ///
    /// Zero disables crossover entirely.
    pub crossover_rate: f64,

    /// Number of cut points for n-point crossover.
    ///
    /// Zero selects uniform crossover. Must not exceed `dim - 1`.
    pub crossover_splits: usize,

    /// Per-bit swap probability used by uniform crossover (0.0–1.0).
    pub uniform_swap_rate: f64,

    /// Per-bit flip probability (0.0–1.0). Zero disables regular mutation.
    pub mutation_rate: f64,

    /// Per-bit flip probability of the one-shot emergency mutation pass
    /// applied when the population stagnates (0.0 exclusive – 1.0).
    pub emergency_mutation_rate: f64,

    /// Stagnation threshold, in multiples of the population size.
    ///
    /// The emergency pass fires once the consecutive cache hits exceed
    /// `stagnation_factor * population_size` while `mutation_rate` is zero.
    pub stagnation_factor: usize,

    /// Whether the emergency pass also forgets all cached fitness values.
    pub clear_cache_on_emergency: bool,

    /// Optional cap on the number of generations after initialization.
    ///
    /// The evaluation budget is the primary stop condition. The cap guards
    /// against runs that keep hitting the cache with a tiny non-zero
    /// mutation rate and never spend their budget.
    pub max_generations: Option<usize>,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 40,
            selection: Selection::Roulette,
            crossover_rate: 0.6,
            crossover_splits: 2,
            uniform_swap_rate: 0.5,
            mutation_rate: 0.0,
            emergency_mutation_rate: 0.1,
            stagnation_factor: 3,
            clear_cache_on_emergency: false,
            max_generations: None,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Builds a configuration from loosely typed parameters.
    ///
    /// Mirrors `configure(pop_size, selection_mode, crossover_rate,
    /// crossover_splits, mutation_rate)` as issued by tuning harnesses that
    /// pass the selection mode as a name and the split count as a signed
    /// integer. Range checks that depend on the genome length still happen in
    /// [`validate`](Self::validate).
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownSelection`] or [`ConfigError::NegativeSplits`].
    pub fn from_params(
        population_size: usize,
        selection: &str,
        crossover_rate: f64,
        crossover_splits: i64,
        mutation_rate: f64,
    ) -> Result<Self, ConfigError> {
        let selection: Selection = selection.parse()?;
        let crossover_splits = usize::try_from(crossover_splits)
            .map_err(|_| ConfigError::NegativeSplits(crossover_splits))?;
        Ok(Self::default()
            .with_population_size(population_size)
            .with_selection(selection)
            .with_crossover_rate(crossover_rate)
            .with_crossover_splits(crossover_splits)
            .with_mutation_rate(mutation_rate))
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Sets the number of n-point crossover cut points (0 = uniform).
    pub fn with_crossover_splits(mut self, n: usize) -> Self {
        self.crossover_splits = n;
        self
    }

    /// Sets the uniform crossover per-bit swap rate.
    pub fn with_uniform_swap_rate(mut self, rate: f64) -> Self {
        self.uniform_swap_rate = rate;
        self
    }

    /// Sets the per-bit mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the emergency mutation rate.
    pub fn with_emergency_mutation_rate(mut self, rate: f64) -> Self {
        self.emergency_mutation_rate = rate;
        self
    }

    /// Sets the stagnation factor.
    pub fn with_stagnation_factor(mut self, factor: usize) -> Self {
        self.stagnation_factor = factor;
        self
    }

    /// Sets whether the emergency pass clears the fitness cache.
    pub fn with_clear_cache_on_emergency(mut self, clear: bool) -> Self {
        self.clear_cache_on_emergency = clear;
        self
    }

    /// Caps the number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = Some(n);
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of consecutive cache hits that must be exceeded before the
    /// emergency mutation pass fires.
    pub fn stagnation_threshold(&self) -> usize {
        self.stagnation_factor.saturating_mul(self.population_size)
    }

    /// Validates the configuration for genomes of `dim` bits.
    ///
    /// Returns the first problem found.
    pub fn validate(&self, dim: usize) -> Result<(), ConfigError> {
        if dim == 0 {
            return Err(ConfigError::ZeroDimension);
        }
        if self.population_size < 2 {
            return Err(ConfigError::PopulationTooSmall(self.population_size));
        }
        if self.population_size % 2 == 1 {
            return Err(ConfigError::OddPopulation(self.population_size));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(ConfigError::CrossoverRate(self.crossover_rate));
        }
        if self.crossover_splits > dim - 1 {
            return Err(ConfigError::TooManySplits {
                splits: self.crossover_splits,
                dim,
            });
        }
        if !(0.0..=1.0).contains(&self.uniform_swap_rate) {
            return Err(ConfigError::UniformSwapRate(self.uniform_swap_rate));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::MutationRate(self.mutation_rate));
        }
        if !(self.emergency_mutation_rate > 0.0 && self.emergency_mutation_rate <= 1.0) {
            return Err(ConfigError::EmergencyMutationRate(
                self.emergency_mutation_rate,
            ));
        }
        if self.stagnation_factor == 0 {
            return Err(ConfigError::StagnationFactor);
        }
        if self.max_generations == Some(0) {
            return Err(ConfigError::ZeroMaxGenerations);
        }
        Ok(())
    }
}
