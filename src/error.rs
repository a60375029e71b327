//! Error types.
//!
//! Configuration problems are reported eagerly by [`ConfigError`] when a
//! configuration is validated. Usage problems surface as [`GaError`] when the
//! engine is driven incorrectly. Neither is retried or recovered internally.

/// Invalid GA configuration values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("population size must be at least 2, got {0}")]
    PopulationTooSmall(usize),
    #[error("population size must be even so individuals pair up for crossover, got {0}")]
    OddPopulation(usize),
    #[error("unknown selection mode {0:?}: expected \"random selection\" or \"roulette wheel\"")]
    UnknownSelection(String),
    #[error("crossover rate must be within [0, 1], got {0}")]
    CrossoverRate(f64),
    #[error("crossover split count must be non-negative, got {0}")]
    NegativeSplits(i64),
    #[error("{splits} crossover splits need at least {} bits, genome has {dim}", .splits + 1)]
    TooManySplits { splits: usize, dim: usize },
    #[error("mutation rate must be within [0, 1], got {0}")]
    MutationRate(f64),
    #[error("emergency mutation rate must be within (0, 1], got {0}")]
    EmergencyMutationRate(f64),
    #[error("uniform crossover swap rate must be within [0, 1], got {0}")]
    UniformSwapRate(f64),
    #[error("stagnation factor must be at least 1")]
    StagnationFactor,
    #[error("genome dimension must be at least 1")]
    ZeroDimension,
    #[error("max_generations must be positive or None")]
    ZeroMaxGenerations,
    #[error("at least one repetition is required")]
    ZeroRepetitions,
}

/// Errors raised while driving the GA.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GaError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("the GA must be configured before it is run")]
    NotConfigured,
    #[error("this GA instance has already been run; create a new instance per run")]
    AlreadyRun,
    #[error("selection size must be within [1, {population}], got {requested}")]
    InvalidSelectionSize { requested: usize, population: usize },
    #[error("fitness vector has {fitness} entries but population has {population}")]
    FitnessLengthMismatch { fitness: usize, population: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::TooManySplits { splits: 5, dim: 4 }.to_string(),
            "5 crossover splits need at least 6 bits, genome has 4"
        );
        assert!(ConfigError::OddPopulation(11).to_string().contains("11"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: GaError = ConfigError::CrossoverRate(1.5).into();
        assert_eq!(err, GaError::Config(ConfigError::CrossoverRate(1.5)));
        assert!(err.to_string().starts_with("invalid configuration"));
    }
}
