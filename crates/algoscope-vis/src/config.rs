//! Playback configuration.

use std::time::Duration;

use algoscope_algorithms::{GeneratorOptions, Pace, Value, DEFAULT_MAX, DEFAULT_MIN, DEFAULT_SIZE};

use crate::error::{Error, Result};

/// Environment variable for the initial step delay in milliseconds.
pub const ENV_SPEED_MS: &str = "ALGOSCOPE_SPEED_MS";
/// Environment variable for the sub-step delay ratio.
pub const ENV_SUB_STEP_RATIO: &str = "ALGOSCOPE_SUB_STEP_RATIO";
/// Environment variable for the generated array size.
pub const ENV_DATASET_SIZE: &str = "ALGOSCOPE_DATASET_SIZE";
/// Environment variable for a fixed generator seed.
pub const ENV_SEED: &str = "ALGOSCOPE_SEED";

/// Settings shared by the controller and the binary.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackConfig {
    /// Delay after each full step
    pub default_speed_ms: u64,
    /// Lower bound accepted by [`clamp_speed`](Self::clamp_speed)
    pub min_speed_ms: u64,
    /// Upper bound accepted by [`clamp_speed`](Self::clamp_speed)
    pub max_speed_ms: u64,
    /// Fraction of the step delay applied after a sub-step
    pub sub_step_ratio: f64,
    /// Number of values in generated arrays
    pub dataset_size: usize,
    pub value_min: Value,
    pub value_max: Value,
    /// Fixed seed for reproducible datasets
    pub seed: Option<u64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            default_speed_ms: 100,
            min_speed_ms: 10,
            max_speed_ms: 500,
            sub_step_ratio: 0.5,
            dataset_size: DEFAULT_SIZE,
            value_min: DEFAULT_MIN,
            value_max: DEFAULT_MAX,
            seed: None,
        }
    }
}

impl PlaybackConfig {
    /// Create config from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_SPEED_MS) {
            config.default_speed_ms = config.clamp_speed(parse(ENV_SPEED_MS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_SUB_STEP_RATIO) {
            let ratio: f64 = parse(ENV_SUB_STEP_RATIO, &raw)?;
            if !(0.0..=1.0).contains(&ratio) {
                return Err(Error::Config(format!(
                    "{ENV_SUB_STEP_RATIO} must be between 0 and 1, got {ratio}"
                )));
            }
            config.sub_step_ratio = ratio;
        }
        if let Some(raw) = lookup(ENV_DATASET_SIZE) {
            config.dataset_size = parse(ENV_DATASET_SIZE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SEED) {
            config.seed = Some(parse(ENV_SEED, &raw)?);
        }

        Ok(config)
    }

    /// Clamp a requested speed into `[min_speed_ms, max_speed_ms]`.
    pub fn clamp_speed(&self, speed_ms: u64) -> u64 {
        speed_ms.clamp(self.min_speed_ms, self.max_speed_ms)
    }

    /// Delay after a step of the given pace at `speed_ms`.
    pub fn delay(&self, pace: Pace, speed_ms: u64) -> Duration {
        let full = Duration::from_millis(speed_ms);
        match pace {
            Pace::Full => full,
            Pace::Sub => full.mul_f64(self.sub_step_ratio),
        }
    }

    /// Generator settings derived from this config.
    pub fn generator_options(&self) -> GeneratorOptions {
        let options = GeneratorOptions::default().with_range(self.value_min, self.value_max);
        match self.seed {
            Some(seed) => options.with_seed(seed),
            None => options,
        }
    }
}

fn parse<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("{key}: cannot parse '{raw}'")))
}
