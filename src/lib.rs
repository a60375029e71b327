//! Budget-bounded genetic algorithm over fixed-length bitstrings.
//!
//! Searches `{0, 1}^dim` to maximize an expensive black-box objective under a
//! strict evaluation budget:
//!
//! - **Genome codec**: bit vectors with collision-free cache keys.
//! - **Fitness cache**: every genome is evaluated at most once per run; the
//!   streak of consecutive cache hits is the stagnation signal.
//! - **Operators**: uniform random or roulette wheel selection, n-point or
//!   uniform crossover, per-bit mutation.
//! - **Generation loop**: selection → crossover → mutation → evaluation until
//!   the objective's evaluation counter reaches the budget, with an emergency
//!   mutation pass when the population stagnates.
//!
//! # Architecture
//!
//! The engine is single-threaded. A [`ga::BitGa`] exclusively owns its
//! objective, cache, random stream, and best-so-far record. Parallelism is
//! only offered across independent repetitions ([`ga::repetitions`], behind
//! the `parallel` feature).
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` for configurations and results
//! - `parallel`: rayon-backed independent repetitions

pub mod error;
pub mod ga;
pub mod random;

pub use error::{ConfigError, GaError};
