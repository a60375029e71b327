//! Independent repeated runs of one configuration.
//!
//! Stochastic results are judged over many runs. Every repetition gets its
//! own [`BitGa`], its own objective instance, and its own random stream
//! derived from a base seed, so runs share no mutable state. With the
//! `parallel` feature the repetitions can be spread over rayon's pool.

use super::config::GaConfig;
use super::runner::{BitGa, GaResult};
use super::types::Objective;
use crate::error::{ConfigError, GaError};
use crate::random::derive_seed;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// How a configuration is repeated.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RepetitionSettings {
    /// Number of independent runs.
    pub repetitions: usize,

    /// Evaluation budget of each run.
    pub budget: usize,

    /// Genome length in bits.
    pub dim: usize,

    /// Base seed; run `i` uses a seed derived from it. `None` seeds every
    /// run randomly.
    pub base_seed: Option<u64>,

    /// Run repetitions in parallel (requires the `parallel` feature).
    pub parallel: bool,
}

impl RepetitionSettings {
    /// Sequential, randomly seeded repetitions.
    pub fn new(repetitions: usize, budget: usize, dim: usize) -> Self {
        Self {
            repetitions,
            budget,
            dim,
            base_seed: None,
            parallel: false,
        }
    }

    /// Sets the base seed.
    pub fn with_base_seed(mut self, seed: u64) -> Self {
        self.base_seed = Some(seed);
        self
    }

    /// Enables or disables parallel repetitions.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    fn config_for(&self, config: &GaConfig, run: usize) -> GaConfig {
        let mut config = config.clone();
        config.seed = self.base_seed.map(|base| derive_seed(base, run as u64));
        config
    }
}

/// Outcome of a batch of repetitions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RepetitionSummary {
    /// One result per run, in run order.
    pub results: Vec<GaResult>,

    /// Mean of the runs' best fitness.
    pub mean_best_fitness: f64,

    /// Highest best fitness over all runs.
    pub max_best_fitness: f64,

    /// Mean objective evaluations per run.
    pub mean_evaluations: f64,
}

impl RepetitionSummary {
    fn from_results(results: Vec<GaResult>) -> Self {
        let n = results.len() as f64;
        let mean_best_fitness = results.iter().map(|r| r.best_fitness).sum::<f64>() / n;
        let max_best_fitness = results
            .iter()
            .map(|r| r.best_fitness)
            .fold(f64::NEG_INFINITY, f64::max);
        let mean_evaluations = results.iter().map(|r| r.evaluations as f64).sum::<f64>() / n;
        Self {
            results,
            mean_best_fitness,
            max_best_fitness,
            mean_evaluations,
        }
    }
}

/// Runs `config` `settings.repetitions` times, building a fresh objective
/// for each run with `make_objective(run_index)`.
///
/// # Errors
///
/// Configuration errors are reported before any run starts.
pub fn run_repetitions<O, F>(
    config: &GaConfig,
    settings: &RepetitionSettings,
    make_objective: F,
) -> Result<RepetitionSummary, GaError>
where
    O: Objective + Send,
    F: Fn(usize) -> O + Sync,
{
    if settings.repetitions == 0 {
        return Err(ConfigError::ZeroRepetitions.into());
    }
    config.validate(settings.dim)?;

    let run_one = |run: usize| -> Result<GaResult, GaError> {
        let mut ga = BitGa::new(make_objective(run), settings.budget, settings.dim);
        ga.configure(settings.config_for(config, run))?;
        let result = ga.run()?.clone();
        log::debug!("repetition {run}: best {}", result.best_fitness);
        Ok(result)
    };

    let results = if settings.parallel {
        run_parallel(settings.repetitions, &run_one)?
    } else {
        (0..settings.repetitions)
            .map(run_one)
            .collect::<Result<Vec<_>, _>>()?
    };

    let summary = RepetitionSummary::from_results(results);
    log::info!(
        "{} repetitions: mean best {:.4}, max best {:.4}",
        settings.repetitions,
        summary.mean_best_fitness,
        summary.max_best_fitness
    );
    Ok(summary)
}

/// Runs the repetitions one after another on a single objective, calling
/// [`Objective::reset`] before each run.
///
/// `settings.parallel` is ignored: a shared objective cannot serve
/// concurrent runs.
pub fn run_repetitions_reusing<O: Objective>(
    objective: &mut O,
    config: &GaConfig,
    settings: &RepetitionSettings,
) -> Result<RepetitionSummary, GaError> {
    if settings.repetitions == 0 {
        return Err(ConfigError::ZeroRepetitions.into());
    }
    config.validate(settings.dim)?;

    let mut results = Vec::with_capacity(settings.repetitions);
    for run in 0..settings.repetitions {
        objective.reset();
        let mut ga = BitGa::new(&mut *objective, settings.budget, settings.dim);
        ga.configure(settings.config_for(config, run))?;
        results.push(ga.run()?.clone());
    }
    objective.reset();
    Ok(RepetitionSummary::from_results(results))
}

#[cfg(feature = "parallel")]
fn run_parallel<R>(repetitions: usize, run_one: &R) -> Result<Vec<GaResult>, GaError>
where
    R: Fn(usize) -> Result<GaResult, GaError> + Sync,
{
    (0..repetitions).into_par_iter().map(run_one).collect()
}

#[cfg(not(feature = "parallel"))]
fn run_parallel<R>(repetitions: usize, run_one: &R) -> Result<Vec<GaResult>, GaError>
where
    R: Fn(usize) -> Result<GaResult, GaError> + Sync,
{
    log::debug!(
        "parallel repetitions requested without the `parallel` feature; running sequentially"
    );
    (0..repetitions).map(run_one).collect()
}
