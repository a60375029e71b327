//! Fitness memoization.
//!
//! Objective evaluations are expensive and counted against the budget, so
//! every genome is evaluated at most once per run. The cache also tracks how
//! many lookups in a row were hits; a long streak means the search has
//! stopped producing new genomes, which drives the emergency mutation in the
//! runner.

use super::genome::{Genome, GenomeKey};
use super::types::Objective;
use std::collections::HashMap;

/// Memoizes objective values by genome identity.
#[derive(Debug, Clone, Default)]
pub struct FitnessCache {
    entries: HashMap<GenomeKey, f64>,
    consecutive_hits: usize,
    hits: usize,
    misses: usize,
}

impl FitnessCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the fitness of `genome`, calling `objective` only on a miss.
    ///
    /// A hit increments the consecutive-hit streak. A miss stores the new
    /// value and resets the streak to zero.
    pub fn evaluate<O: Objective + ?Sized>(&mut self, genome: &Genome, objective: &mut O) -> f64 {
        let key = genome.key();
        if let Some(&fitness) = self.entries.get(&key) {
            self.consecutive_hits += 1;
            self.hits += 1;
            return fitness;
        }
        let fitness = objective.evaluate(genome.as_bits());
        self.entries.insert(key, fitness);
        self.consecutive_hits = 0;
        self.misses += 1;
        fitness
    }

    /// Cached fitness for a key, if present.
    pub fn get(&self, key: &GenomeKey) -> Option<f64> {
        self.entries.get(key).copied()
    }

    /// Length of the current run of consecutive hits.
    pub fn consecutive_hits(&self) -> usize {
        self.consecutive_hits
    }

    /// Clears the consecutive-hit streak without touching stored values.
    pub fn reset_consecutive_hits(&mut self) {
        self.consecutive_hits = 0;
    }

    /// Total hits since construction.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Total misses (objective calls made through the cache) since construction.
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Number of distinct genomes stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` once every genome of `dim` bits is stored, so no
    /// lookup can reach the objective again.
    pub fn covers(&self, dim: usize) -> bool {
        dim < 128 && self.entries.len() as u128 >= 1u128 << dim
    }

    /// Drops every stored value and the hit streak. Lifetime counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.consecutive_hits = 0;
    }
}
