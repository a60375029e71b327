//! Bitstring Genetic Algorithm.
//!
//! A budget-bounded GA over fixed-length bitstrings. The objective is an
//! opaque, counted black box ([`Objective`]); the engine memoizes every
//! evaluation ([`FitnessCache`]) and escapes stagnation with a one-shot
//! emergency mutation pass when the population stops producing new genomes.
//!
//! # Key Types
//!
//! - [`Genome`]: Fixed-length bit vector, with a collision-free [`GenomeKey`]
//! - [`GaConfig`]: Population size, selection, operator rates, stagnation escape
//! - [`BitGa`]: One exclusively owned run: `new → configure → run → results`
//! - [`GaResult`]: Best genome, fitness, and per-generation statistics
//!
//! # Operators
//!
//! - [`Selection`]: uniform random or roulette wheel
//! - [`Crossover`]: none, n-point, or uniform, per adjacent pair
//! - [`mutate`]: independent per-bit flips
//!
//! # Submodules
//!
//! - [`operators`]: Pure crossover and mutation functions
//! - [`repetitions`]: Independent repeated runs with summary statistics
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Eiben & Smith (2015), *Introduction to Evolutionary Computing*, 2nd ed.

mod cache;
mod config;
mod genome;
pub mod operators;
pub mod repetitions;
mod runner;
mod selection;
mod types;

pub use cache::FitnessCache;
pub use config::GaConfig;
pub use genome::{encode, Genome, GenomeKey, ParseGenomeError};
pub use operators::{mutate, n_point_crossover, random_splits, uniform_crossover, Crossover};
pub use repetitions::{
    run_repetitions, run_repetitions_reusing, RepetitionSettings, RepetitionSummary,
};
pub use runner::{BestRecord, BitGa, GaResult, GenerationStats, Termination};
pub use selection::Selection;
pub use types::{CountingObjective, Objective};
