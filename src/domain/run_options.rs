use std::time::Duration;

use rand::Rng;

use super::errors::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Static,
    Rendered,
}

impl FetchMode {
    pub fn from_dynamic(dynamic: bool) -> Self {
        match dynamic {
            true => FetchMode::Rendered,
            false => FetchMode::Static,
        }
    }
}

/// Bounds for the pause after each successful page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayRange {
    min: Duration,
    max: Duration,
}

impl DelayRange {
    /// Bounds are seconds; both must fit in a [`Duration`] and `min <= max`.
    pub fn new(min: f64, max: f64) -> Result<Self, ConfigError> {
        match (
            Duration::try_from_secs_f64(min),
            Duration::try_from_secs_f64(max),
        ) {
            (Ok(lower), Ok(upper)) if lower <= upper => Ok(DelayRange {
                min: lower,
                max: upper,
            }),
            _ => Err(ConfigError::Delay { min, max }),
        }
    }

    pub fn none() -> Self {
        DelayRange {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    pub fn min(&self) -> f64 {
        self.min.as_secs_f64()
    }

    pub fn max(&self) -> f64 {
        self.max.as_secs_f64()
    }

    pub fn sample(&self) -> Duration {
        self.sample_with(&mut rand::thread_rng())
    }

    pub fn sample_with<R: Rng>(&self, rng: &mut R) -> Duration {
        match self.min == self.max {
            true => self.min,
            false => rng.gen_range(self.min..=self.max),
        }
    }
}

pub struct RunOptions {
    pub mode: FetchMode,
    pub delay: DelayRange,
    pub proxies: Vec<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            mode: FetchMode::Static,
            delay: DelayRange::none(),
            proxies: vec![],
        }
    }
}

impl RunOptions {
    /// Round robin over the proxy list, keyed by the number of successes so far.
    pub fn proxy_for(&self, success_index: usize) -> Option<&str> {
        match self.proxies.is_empty() {
            true => None,
            false => Some(self.proxies[success_index % self.proxies.len()].as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOutcome {
    pub successes: usize,
    pub failures: usize,
    pub total: usize,
}

impl RunOutcome {
    pub fn record_success(&mut self) {
        self.successes += 1;
        self.total += 1;
    }

    pub fn record_failure(&mut self) {
        self.failures += 1;
        self.total += 1;
    }
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Success: {} | Failed: {} | Total: {}",
            self.successes, self.failures, self.total
        )
    }
}
