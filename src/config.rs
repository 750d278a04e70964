//! Construction options for skip lists.

use std::error::Error;
use std::fmt;

/// Max level used by `Default`. 16 levels comfortably index ~65k entries
/// at probability 1/2 and still work well past that.
pub const DEFAULT_MAX_LEVEL: usize = 16;

/// Upper bound accepted for `max_level`.
pub const MAX_LEVEL_LIMIT: usize = 32;

/// Chance that a new node grows one more level.
pub const DEFAULT_PROBABILITY: f64 = 0.5;

/// Options fixed at construction time.
///
/// ```
/// use skipkv::{Options, SkipMap};
///
/// let map = SkipMap::with_options(Options::new(8).with_seed(42)).unwrap();
/// assert_eq!(map.max_level(), 8);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Options {
    /// Highest level a node may reach, in `1..=MAX_LEVEL_LIMIT`.
    pub max_level: usize,
    /// Probability of promoting a node to the next level, in `(0, 1)`.
    pub probability: f64,
    /// Seed for level selection. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Options {
    pub fn new(max_level: usize) -> Options {
        Options {
            max_level,
            probability: DEFAULT_PROBABILITY,
            seed: None,
        }
    }

    pub fn with_probability(mut self, probability: f64) -> Options {
        self.probability = probability;
        self
    }

    /// Make level selection deterministic.
    pub fn with_seed(mut self, seed: u64) -> Options {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_level == 0 {
            return Err(ConfigError::ZeroMaxLevel);
        }
        if self.max_level > MAX_LEVEL_LIMIT {
            return Err(ConfigError::MaxLevelTooLarge {
                requested: self.max_level,
                limit: MAX_LEVEL_LIMIT,
            });
        }
        // Also rejects NaN.
        if !(self.probability > 0.0 && self.probability < 1.0) {
            return Err(ConfigError::InvalidProbability(self.probability));
        }
        Ok(())
    }
}

impl Default for Options {
    fn default() -> Self {
        Options::new(DEFAULT_MAX_LEVEL)
    }
}

/// Error returned when construction options are unusable.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A list needs at least one level.
    ZeroMaxLevel,
    /// More levels than the list supports.
    MaxLevelTooLarge { requested: usize, limit: usize },
    /// Promotion probability outside the open interval (0, 1).
    InvalidProbability(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroMaxLevel => write!(f, "max level must be at least 1"),
            ConfigError::MaxLevelTooLarge { requested, limit } => {
                write!(f, "max level {} exceeds the limit of {}", requested, limit)
            }
            ConfigError::InvalidProbability(p) => {
                write!(f, "level probability {} is outside (0, 1)", p)
            }
        }
    }
}

impl Error for ConfigError {}
