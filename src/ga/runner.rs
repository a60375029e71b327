//! GA evolutionary loop execution.
//!
//! [`BitGa`] owns everything one run needs: the objective, the fitness cache,
//! the random stream, and the best-so-far record. Its lifecycle is
//! `new → configure → run (once) → read results`.
//!
//! Each generation performs: emergency mutation (only when stagnating) →
//! selection → crossover → mutation → evaluation. The loop stops when the
//! objective's evaluation counter reaches the budget; the check happens at
//! the top of each generation, so the final generation may overshoot. Short
//! genomes can have fewer distinct values than the budget; the loop then
//! stops once the cache holds all of them.

use super::cache::FitnessCache;
use super::config::GaConfig;
use super::genome::Genome;
use super::operators::{mutate, Crossover};
use super::types::Objective;
use crate::error::GaError;
use crate::random::rng_from_seed;
use rand::Rng;

/// The best genome seen so far and its fitness.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BestRecord {
    pub genome: Genome,
    pub fitness: f64,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// The objective's evaluation counter reached the budget.
    BudgetExhausted,
    /// The configured generation cap was reached first.
    MaxGenerations,
    /// Every genome of the search space is cached, so the budget can no
    /// longer be spent.
    SearchSpaceExhausted,
}

/// Snapshot taken after each generation is evaluated.
///
/// Generation 0 is the initial population.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    pub generation: usize,
    /// Best fitness ever seen, up to and including this generation.
    pub best_fitness: f64,
    /// Best fitness within this generation's population.
    pub generation_best: f64,
    /// Mean fitness of this generation's population.
    pub mean_fitness: f64,
    /// Objective evaluations used so far.
    pub evaluations: usize,
    /// Consecutive cache hits after this generation's evaluation.
    pub consecutive_hits: usize,
    /// Whether the emergency mutation pass ran at the start of this generation.
    pub emergency: bool,
}

/// Result of a GA run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaResult {
    /// The best genome found during the entire run.
    pub best_genome: Genome,

    /// Fitness of `best_genome`.
    pub best_fitness: f64,

    /// Generations executed after initialization.
    pub generations: usize,

    /// Objective evaluations used, as reported by the objective.
    pub evaluations: usize,

    /// Number of emergency mutation passes.
    pub emergency_mutations: usize,

    /// Distinct genomes in the cache at the end of the run.
    pub cache_size: usize,

    /// Total cache hits during the run.
    pub cache_hits: usize,

    /// Why the run stopped.
    pub termination: Termination,

    /// Per-generation statistics, starting with the initial population.
    pub history: Vec<GenerationStats>,
}

/// A single, exclusively owned GA run.
///
/// # Usage
///
/// ```
/// use u_bitga::ga::{BitGa, CountingObjective, GaConfig, Selection};
///
/// let onemax = CountingObjective::new(|bits: &[bool]| {
///     bits.iter().filter(|&&b| b).count() as f64
/// });
/// let mut ga = BitGa::new(onemax, 1000, 20);
/// ga.configure(
///     GaConfig::default()
///         .with_population_size(20)
///         .with_selection(Selection::Roulette)
///         .with_mutation_rate(0.05)
///         .with_seed(42),
/// )
/// .unwrap();
///
/// let result = ga.run().unwrap();
/// assert!(result.evaluations >= 1000);
/// assert!(ga.best_fitness().unwrap() >= 15.0);
/// ```
#[derive(Debug)]
pub struct BitGa<O: Objective> {
    objective: O,
    budget: usize,
    dim: usize,
    config: Option<GaConfig>,
    cache: FitnessCache,
    best: Option<BestRecord>,
    result: Option<GaResult>,
}

impl<O: Objective> BitGa<O> {
    /// Creates an unconfigured run over genomes of `dim` bits with an
    /// evaluation budget of `budget` objective calls.
    pub fn new(objective: O, budget: usize, dim: usize) -> Self {
        Self {
            objective,
            budget,
            dim,
            config: None,
            cache: FitnessCache::new(),
            best: None,
            result: None,
        }
    }

    /// Validates and locks in the configuration.
    ///
    /// On error the previously stored configuration, if any, is untouched.
    pub fn configure(&mut self, config: GaConfig) -> Result<(), GaError> {
        config.validate(self.dim)?;
        self.config = Some(config);
        Ok(())
    }

    /// Configures from loosely typed parameters; see [`GaConfig::from_params`].
    pub fn configure_params(
        &mut self,
        population_size: usize,
        selection: &str,
        crossover_rate: f64,
        crossover_splits: i64,
        mutation_rate: f64,
    ) -> Result<(), GaError> {
        let config = GaConfig::from_params(
            population_size,
            selection,
            crossover_rate,
            crossover_splits,
            mutation_rate,
        )?;
        self.configure(config)
    }

    /// Runs the evolutionary loop to completion.
    ///
    /// # Errors
    ///
    /// - [`GaError::NotConfigured`] if no configuration was accepted
    /// - [`GaError::AlreadyRun`] if this instance already ran
    pub fn run(&mut self) -> Result<&GaResult, GaError> {
        if self.result.is_some() {
            return Err(GaError::AlreadyRun);
        }
        let config = self.config.clone().ok_or(GaError::NotConfigured)?;
        let mut rng = rng_from_seed(config.seed);
        let crossover = Crossover::from_config(&config);
        let n = config.population_size;

        log::info!(
            "GA start: dim={}, budget={}, population={}, selection={}, crossover={:?} (rate {}), \
             mutation rate {}",
            self.dim,
            self.budget,
            n,
            config.selection,
            crossover,
            config.crossover_rate,
            config.mutation_rate
        );

        // 1. Initialize and evaluate
        let mut population: Vec<Genome> =
            (0..n).map(|_| Genome::random(self.dim, &mut rng)).collect();
        let mut fitness = self.evaluate_population(&population);

        let mut history = vec![self.stats(0, &fitness, false)];
        let mut generation = 0usize;
        let mut emergency_mutations = 0usize;

        // 2. Evolutionary loop
        let termination = loop {
            if self.objective.evaluations() >= self.budget {
                break Termination::BudgetExhausted;
            }
            if self.cache.covers(self.dim) {
                break Termination::SearchSpaceExhausted;
            }
            if config.max_generations.is_some_and(|max| generation >= max) {
                break Termination::MaxGenerations;
            }

            // Emergency: the search keeps revisiting cached genomes and has no
            // mutation of its own. One explicit pass at the elevated rate; the
            // stored mutation rate stays zero.
            let emergency = config.mutation_rate == 0.0
                && self.cache.consecutive_hits() > config.stagnation_threshold();
            if emergency {
                log::warn!(
                    "generation {}: {} consecutive cache hits, mutating population at rate {}",
                    generation + 1,
                    self.cache.consecutive_hits(),
                    config.emergency_mutation_rate
                );
                for genome in population.iter_mut() {
                    mutate(genome, config.emergency_mutation_rate, &mut rng);
                }
                self.cache.reset_consecutive_hits();
                if config.clear_cache_on_emergency {
                    self.cache.clear();
                }
                emergency_mutations += 1;
            }

            // Selection. After an emergency pass the fitness vector still
            // describes the pre-mutation population.
            let mut offspring = config.selection.select(&population, &fitness, n, &mut rng)?;

            // Crossover
            if config.crossover_rate > 0.0 {
                offspring = recombine_pairs(offspring, crossover, config.crossover_rate, &mut rng);
            }

            // Mutation
            if config.mutation_rate > 0.0 {
                for genome in offspring.iter_mut() {
                    mutate(genome, config.mutation_rate, &mut rng);
                }
            }

            // Evaluation
            fitness = self.evaluate_population(&offspring);
            population = offspring;
            generation += 1;

            let stats = self.stats(generation, &fitness, emergency);
            log::debug!(
                "generation {}: best {:.4}, mean {:.4}, evaluations {}, consecutive hits {}",
                stats.generation,
                stats.best_fitness,
                stats.mean_fitness,
                stats.evaluations,
                stats.consecutive_hits
            );
            history.push(stats);
        };

        let best = self
            .best
            .clone()
            .expect("validated population_size >= 2, so the initial population was evaluated");

        log::info!(
            "GA finished ({:?}): best {} after {} generations, {} evaluations, \
             {} emergency passes",
            termination,
            best.fitness,
            generation,
            self.objective.evaluations(),
            emergency_mutations
        );

        let result = GaResult {
            best_genome: best.genome,
            best_fitness: best.fitness,
            generations: generation,
            evaluations: self.objective.evaluations(),
            emergency_mutations,
            cache_size: self.cache.len(),
            cache_hits: self.cache.hits(),
            termination,
            history,
        };
        Ok(&*self.result.insert(result))
    }

    /// Best fitness seen so far, if anything was evaluated.
    pub fn best_fitness(&self) -> Option<f64> {
        self.best.as_ref().map(|b| b.fitness)
    }

    /// Genome with the best fitness seen so far.
    pub fn best_genome(&self) -> Option<&Genome> {
        self.best.as_ref().map(|b| &b.genome)
    }

    /// Best-so-far record.
    pub fn best(&self) -> Option<&BestRecord> {
        self.best.as_ref()
    }

    /// Result of the completed run.
    pub fn result(&self) -> Option<&GaResult> {
        self.result.as_ref()
    }

    /// The accepted configuration.
    pub fn config(&self) -> Option<&GaConfig> {
        self.config.as_ref()
    }

    /// The fitness cache.
    pub fn cache(&self) -> &FitnessCache {
        &self.cache
    }

    /// The objective.
    pub fn objective(&self) -> &O {
        &self.objective
    }

    /// Consumes the run and hands the objective back, e.g. to reset it for
    /// the next independent run.
    pub fn into_objective(self) -> O {
        self.objective
    }

    /// Evaluation budget.
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Genome length in bits.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Evaluates every genome through the cache and updates the best-so-far
    /// record when an individual strictly improves on it.
    fn evaluate_population(&mut self, population: &[Genome]) -> Vec<f64> {
        let fitness: Vec<f64> = population
            .iter()
            .map(|genome| self.cache.evaluate(genome, &mut self.objective))
            .collect();

        for (genome, &f) in population.iter().zip(&fitness) {
            let improves = self.best.as_ref().map_or(true, |best| f > best.fitness);
            if improves {
                self.best = Some(BestRecord {
                    genome: genome.clone(),
                    fitness: f,
                });
            }
        }
        fitness
    }

    fn stats(&self, generation: usize, fitness: &[f64], emergency: bool) -> GenerationStats {
        let generation_best = fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean_fitness = if fitness.is_empty() {
            0.0
        } else {
            fitness.iter().sum::<f64>() / fitness.len() as f64
        };
        GenerationStats {
            generation,
            best_fitness: self.best_fitness().unwrap_or(f64::NEG_INFINITY),
            generation_best,
            mean_fitness,
            evaluations: self.objective.evaluations(),
            consecutive_hits: self.cache.consecutive_hits(),
            emergency,
        }
    }
}

/// Applies crossover to adjacent pairs `(0, 1), (2, 3), …`, each pair gated
/// by its own Bernoulli trial against `rate`.
fn recombine_pairs<R: Rng>(
    pool: Vec<Genome>,
    crossover: Crossover,
    rate: f64,
    rng: &mut R,
) -> Vec<Genome> {
    let mut next = Vec::with_capacity(pool.len());
    let mut parents = pool.into_iter();
    while let (Some(a), Some(b)) = (parents.next(), parents.next()) {
        let (a, b) = if rng.random_bool(rate) {
            crossover.apply(a, b, rng)
        } else {
            (a, b)
        };
        next.push(a);
        next.push(b);
    }
    next
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::ga::{CountingObjective, Selection};
    use crate::random::create_rng;

    fn ones(bits: &[bool]) -> f64 {
        bits.iter().filter(|&&b| b).count() as f64
    }

    fn onemax() -> CountingObjective<fn(&[bool]) -> f64> {
        CountingObjective::new(ones as fn(&[bool]) -> f64)
    }

    fn static_config() -> GaConfig {
        GaConfig::default()
            .with_population_size(10)
            .with_selection(Selection::Random)
            .with_crossover_rate(0.0)
            .with_mutation_rate(0.0)
            .with_seed(42)
    }

    #[test]
    fn test_run_requires_configuration() {
        let mut ga = BitGa::new(onemax(), 100, 16);
        assert_eq!(ga.run().unwrap_err(), GaError::NotConfigured);
        assert_eq!(ga.objective().evaluations(), 0);
        assert!(ga.best().is_none());
    }

    #[test]
    fn test_invalid_configuration_keeps_previous() {
        let mut ga = BitGa::new(onemax(), 100, 16);
        assert_eq!(
            ga.configure(GaConfig::default().with_population_size(11)),
            Err(GaError::Config(ConfigError::OddPopulation(11)))
        );
        assert!(ga.config().is_none());

        ga.configure(static_config()).unwrap();
        assert_eq!(
            ga.configure(static_config().with_crossover_rate(1.5)),
            Err(GaError::Config(ConfigError::CrossoverRate(1.5)))
        );
        assert_eq!(ga.config(), Some(&static_config()));
    }

    #[test]
    fn test_failed_configuration_blocks_run() {
        let mut ga = BitGa::new(onemax(), 100, 4);
        assert!(ga.configure(static_config().with_crossover_splits(4)).is_err());
        assert_eq!(ga.run().unwrap_err(), GaError::NotConfigured);
    }

    #[test]
    fn test_configure_params() {
        let mut ga = BitGa::new(onemax(), 100, 16);
        ga.configure_params(10, "roulette wheel", 0.5, 2, 0.1).unwrap();
        assert_eq!(ga.config().map(|c| c.selection), Some(Selection::Roulette));

        assert_eq!(
            ga.configure_params(10, "best", 0.5, 2, 0.1),
            Err(GaError::Config(ConfigError::UnknownSelection("best".into())))
        );
        assert_eq!(
            ga.configure_params(10, "random", 0.5, -2, 0.1),
            Err(GaError::Config(ConfigError::NegativeSplits(-2)))
        );
    }

    #[test]
    fn test_second_run_rejected() {
        let mut ga = BitGa::new(onemax(), 50, 16);
        ga.configure(static_config().with_mutation_rate(0.2)).unwrap();
        let evaluations = ga.run().unwrap().evaluations;
        assert_eq!(ga.run().unwrap_err(), GaError::AlreadyRun);
        assert_eq!(ga.objective().evaluations(), evaluations);
    }

    #[test]
    fn test_exact_budget_with_fresh_genomes() {
        // Half-rate mutation on 64 bits makes every child new, so each
        // generation costs exactly one evaluation per individual.
        let mut ga = BitGa::new(onemax(), 50, 64);
        ga.configure(static_config().with_mutation_rate(0.5)).unwrap();
        let result = ga.run().unwrap();

        assert_eq!(result.evaluations, 50);
        assert_eq!(result.generations, 4);
        assert_eq!(result.history.len(), 5);
        assert_eq!(result.termination, Termination::BudgetExhausted);
        assert_eq!(result.emergency_mutations, 0);
    }

    #[test]
    fn test_stops_when_every_genome_is_cached() {
        // 3 bits give 8 genomes, fewer than the budget of 20.
        let mut ga = BitGa::new(onemax(), 20, 3);
        ga.configure(
            static_config()
                .with_crossover_rate(0.5)
                .with_crossover_splits(1)
                .with_mutation_rate(0.1)
                .with_seed(1)
                .with_max_generations(10_000),
        )
        .unwrap();
        let result = ga.run().unwrap();

        assert_eq!(result.termination, Termination::SearchSpaceExhausted);
        assert_eq!(result.evaluations, 8);
        assert_eq!(result.cache_size, 8);
        assert_eq!(result.best_fitness, 3.0);
        assert!(result.generations < 10_000);
    }

    #[test]
    fn test_emergency_only_run_stops_on_exhausted_space() {
        let mut ga = BitGa::new(onemax(), 100, 2);
        ga.configure(
            static_config()
                .with_crossover_splits(1)
                .with_seed(5)
                .with_max_generations(10_000),
        )
        .unwrap();
        let result = ga.run().unwrap();

        assert_eq!(result.termination, Termination::SearchSpaceExhausted);
        assert_eq!(result.evaluations, 4);
    }

    #[test]
    fn test_budget_takes_precedence_over_exhausted_space() {
        // 40 random one-bit genomes cover both values.
        let mut ga = BitGa::new(onemax(), 0, 1);
        ga.configure(
            static_config()
                .with_population_size(40)
                .with_crossover_splits(0),
        )
        .unwrap();
        let result = ga.run().unwrap();

        assert_eq!(result.cache_size, 2);
        assert_eq!(result.termination, Termination::BudgetExhausted);
    }

    #[test]
    fn test_static_population_escapes_through_emergency() {
        let mut ga = BitGa::new(onemax(), 50, 32);
        ga.configure(static_config()).unwrap();
        let result = ga.run().unwrap().clone();

        assert!(
            (50..60).contains(&result.evaluations),
            "expected the budget to be reached with less than one generation of overshoot, got {}",
            result.evaluations
        );
        assert!(result.emergency_mutations >= 1);
        assert!(result.history.iter().any(|s| s.emergency));

        // The override is scoped to the emergency pass.
        let config = ga.config().unwrap();
        assert_eq!(config.mutation_rate, 0.0);
    }

    #[test]
    fn test_emergency_waits_for_threshold() {
        // 10 individuals, factor 3: hits reach 10, 20, 30, 40 after
        // generations 1-4, so the first emergency is at generation 5.
        let mut ga = BitGa::new(onemax(), 1_000, 32);
        ga.configure(static_config().with_max_generations(5)).unwrap();
        let result = ga.run().unwrap();

        let flags: Vec<bool> = result.history.iter().map(|s| s.emergency).collect();
        assert_eq!(flags, vec![false, false, false, false, false, true]);
        assert_eq!(result.history[4].consecutive_hits, 40);
        assert_eq!(result.termination, Termination::MaxGenerations);
    }

    #[test]
    fn test_no_emergency_with_mutation() {
        let mut ga = BitGa::new(onemax(), 200, 4);
        ga.configure(
            static_config()
                .with_mutation_rate(1e-9)
                .with_max_generations(30),
        )
        .unwrap();
        let result = ga.run().unwrap();
        assert_eq!(result.emergency_mutations, 0);
    }

    #[test]
    fn test_max_generations_guard() {
        let mut ga = BitGa::new(onemax(), 1_000, 32);
        ga.configure(
            static_config()
                .with_mutation_rate(1e-12)
                .with_max_generations(20),
        )
        .unwrap();
        let result = ga.run().unwrap();
        assert_eq!(result.termination, Termination::MaxGenerations);
        assert_eq!(result.generations, 20);
        assert!(result.evaluations < 1_000);
    }

    #[test]
    fn test_emergency_can_clear_cache() {
        let mut ga = BitGa::new(onemax(), 60, 32);
        ga.configure(static_config().with_clear_cache_on_emergency(true))
            .unwrap();
        let result = ga.run().unwrap();
        assert!(result.emergency_mutations >= 1);
        assert!(result.cache_size < result.evaluations);
    }

    #[test]
    fn test_best_so_far_is_monotonic_and_consistent() {
        let mut ga = BitGa::new(onemax(), 2_000, 30);
        ga.configure(
            GaConfig::default()
                .with_population_size(20)
                .with_crossover_rate(0.7)
                .with_crossover_splits(1)
                .with_mutation_rate(0.03)
                .with_seed(7),
        )
        .unwrap();
        let result = ga.run().unwrap().clone();

        for window in result.history.windows(2) {
            assert!(
                window[1].best_fitness >= window[0].best_fitness,
                "best-so-far decreased: {} -> {}",
                window[0].best_fitness,
                window[1].best_fitness
            );
        }
        for stats in &result.history {
            assert!(stats.generation_best <= stats.best_fitness);
        }
        assert_eq!(result.best_fitness, ones(result.best_genome.as_bits()));
        assert_eq!(ga.best_fitness(), Some(result.best_fitness));
        assert_eq!(ga.best_genome(), Some(&result.best_genome));
        assert_eq!(
            result.best_fitness,
            result.history.last().map(|s| s.best_fitness).unwrap()
        );
    }

    #[test]
    fn test_onemax_improves() {
        for splits in [2, 0] {
            let mut ga = BitGa::new(onemax(), 4_000, 30);
            ga.configure(
                GaConfig::default()
                    .with_population_size(40)
                    .with_selection(Selection::Roulette)
                    .with_crossover_rate(0.6)
                    .with_crossover_splits(splits)
                    .with_mutation_rate(1.0 / 30.0)
                    .with_seed(42),
            )
            .unwrap();
            let result = ga.run().unwrap();
            assert!(
                result.best_fitness >= 22.0,
                "roulette with {splits} splits only reached {}",
                result.best_fitness
            );
        }
    }

    #[test]
    fn test_negative_fitness_with_roulette() {
        let objective = CountingObjective::new(|bits: &[bool]| -ones(bits));
        let mut ga = BitGa::new(objective, 300, 16);
        ga.configure(
            GaConfig::default()
                .with_population_size(10)
                .with_selection(Selection::Roulette)
                .with_mutation_rate(0.1)
                .with_seed(3),
        )
        .unwrap();
        let result = ga.run().unwrap();
        assert!(result.best_fitness <= 0.0);
        assert!(result.evaluations >= 300);
    }

    #[test]
    fn test_same_seed_same_run() {
        let run = |seed: u64| {
            let mut ga = BitGa::new(onemax(), 500, 24);
            ga.configure(
                GaConfig::default()
                    .with_population_size(16)
                    .with_mutation_rate(0.05)
                    .with_seed(seed),
            )
            .unwrap();
            ga.run().unwrap().clone()
        };
        assert_eq!(run(11), run(11));
    }

    #[test]
    fn test_zero_budget_only_initializes() {
        let mut ga = BitGa::new(onemax(), 0, 8);
        ga.configure(static_config()).unwrap();
        let result = ga.run().unwrap();
        assert_eq!(result.generations, 0);
        assert_eq!(result.history.len(), 1);
        assert!(result.evaluations <= 10);
    }

    #[test]
    fn test_recombine_pairs_gating() {
        let mut rng = create_rng(42);
        let pool: Vec<Genome> = (0..6)
            .map(|i| Genome::from(vec![i % 2 == 0; 8]))
            .collect();

        let untouched = recombine_pairs(pool.clone(), Crossover::NPoint(1), 0.0, &mut rng);
        assert_eq!(untouched, pool);

        let crossed = recombine_pairs(pool.clone(), Crossover::NPoint(1), 1.0, &mut rng);
        assert_eq!(crossed.len(), 6);
        for pair in crossed.chunks(2) {
            let ones = pair[0].count_ones();
            assert!(ones > 0 && ones < 8, "every pair must recombine: {}", pair[0]);
            assert_eq!(pair[1], pair[0].complement());
        }
    }
}
