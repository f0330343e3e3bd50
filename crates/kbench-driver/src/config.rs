//! Harness configuration, validation, and error types.
//!
//! [`HarnessConfig`] carries everything a run needs to know up front,
//! including the element count `N` declared by the kernel variant being
//! benchmarked. It is built by the kernel binary and optionally overridden
//! from the command line.

use std::error::Error;
use std::fmt;

use kbench_arena::{ArenaConfig, ArenaError};

/// What a run does besides invoking the kernel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunMode {
    /// Ramp-initialised run with no timing and no verification.
    Functional,
    /// Ramp-initialised run with per-repetition timing and a bandwidth report.
    #[default]
    Timing,
    /// Fixture-initialised run verified against an output fixture.
    Testing,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Functional => write!(f, "functional"),
            Self::Timing => write!(f, "timing"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Configuration for one harness run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Number of `f32` elements the kernel needs (`N`).
    pub element_count: usize,
    /// Fixture element count when it differs from `element_count`
    /// (`N_test`). `None` = use `element_count`.
    pub test_element_count: Option<usize>,
    /// Untimed repetitions before the timed loop. Skipped in testing mode.
    pub warmup: u32,
    /// Timed repetitions.
    pub repetitions: u32,
    /// Run mode.
    pub mode: RunMode,
    /// Arena mapping parameters.
    pub arena: ArenaConfig,
}

impl HarnessConfig {
    /// Default warmup repetition count.
    pub const DEFAULT_WARMUP: u32 = 0;

    /// Default timed repetition count.
    pub const DEFAULT_REPETITIONS: u32 = 5;

    /// Create a timing-mode config for a kernel needing `element_count` floats.
    pub fn new(element_count: usize) -> Self {
        Self {
            element_count,
            test_element_count: None,
            warmup: Self::DEFAULT_WARMUP,
            repetitions: Self::DEFAULT_REPETITIONS,
            mode: RunMode::default(),
            arena: ArenaConfig::default(),
        }
    }

    /// Element count fixtures must hold.
    pub fn expected_count(&self) -> usize {
        self.test_element_count.unwrap_or(self.element_count)
    }

    /// Bytes the kernel touches per repetition (`N * 4`), if it fits a `usize`.
    pub fn byte_size(&self) -> Option<usize> {
        self.element_count.checked_mul(std::mem::size_of::<f32>())
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.element_count == 0 {
            return Err(ConfigError::ZeroElementCount);
        }
        if self.byte_size().is_none() {
            return Err(ConfigError::ElementCountOverflow {
                element_count: self.element_count,
            });
        }
        if self.test_element_count == Some(0) {
            return Err(ConfigError::ZeroElementCount);
        }
        if self.mode == RunMode::Timing && self.repetitions == 0 {
            return Err(ConfigError::NoTimedRepetitions);
        }
        self.arena.validate().map_err(ConfigError::Arena)?;
        Ok(())
    }
}

/// Errors detected by [`HarnessConfig::validate()`].
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// `element_count` (or the fixture override) is zero.
    ZeroElementCount,
    /// `element_count * 4` does not fit in a `usize`.
    ElementCountOverflow {
        /// The configured element count.
        element_count: usize,
    },
    /// Timing mode with zero repetitions has nothing to measure.
    NoTimedRepetitions,
    /// Arena configuration is invalid.
    Arena(ArenaError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroElementCount => write!(f, "element count must be at least 1"),
            Self::ElementCountOverflow { element_count } => {
                write!(f, "element count {element_count} overflows the byte size")
            }
            Self::NoTimedRepetitions => {
                write!(f, "timing mode needs at least one repetition")
            }
            Self::Arena(e) => write!(f, "arena: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Arena(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kbench_arena::HugePages;

    #[test]
    fn default_config_values() {
        let config = HarnessConfig::new(1024);
        assert_eq!(config.warmup, 0);
        assert_eq!(config.repetitions, 5);
        assert_eq!(config.mode, RunMode::Timing);
        assert_eq!(config.arena.hugepage_size, 1 << 30);
        assert_eq!(config.arena.hugepages, HugePages::Off);
        config.validate().unwrap();
    }

    #[test]
    fn test_count_overrides_expected_count() {
        let mut config = HarnessConfig::new(1000);
        assert_eq!(config.expected_count(), 1000);
        config.test_element_count = Some(640);
        assert_eq!(config.expected_count(), 640);
        assert_eq!(config.byte_size(), Some(4000));
    }

    #[test]
    fn zero_elements_rejected() {
        assert_eq!(
            HarnessConfig::new(0).validate(),
            Err(ConfigError::ZeroElementCount)
        );
        let mut config = HarnessConfig::new(10);
        config.test_element_count = Some(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroElementCount));
    }

    #[test]
    fn byte_overflow_rejected() {
        let config = HarnessConfig::new(usize::MAX / 2);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ElementCountOverflow { .. })
        ));
    }

    #[test]
    fn timing_needs_repetitions() {
        let mut config = HarnessConfig::new(10);
        config.repetitions = 0;
        assert_eq!(config.validate(), Err(ConfigError::NoTimedRepetitions));

        config.mode = RunMode::Testing;
        config.validate().unwrap();
    }

    #[test]
    fn invalid_arena_surfaces_as_config_error() {
        let mut config = HarnessConfig::new(10);
        config.arena.hugepage_size = 12345;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Arena(
                ArenaError::InvalidHugePageSize { size: 12345 }
            ))
        ));
    }
}
