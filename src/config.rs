//! Run configuration assembled from defaults and `LATENCYGATE_*` environment variables.

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::{LatencyGateError, runner::RunConfig};

pub const DEFAULT_PACKAGE: &str = "latencygate::demo::latency";

pub const ENV_PACKAGE: &str = "LATENCYGATE_PACKAGE";
pub const ENV_FORKS: &str = "LATENCYGATE_FORKS";
pub const ENV_WARMUP: &str = "LATENCYGATE_WARMUP";
pub const ENV_MEASUREMENT: &str = "LATENCYGATE_MEASUREMENT";
pub const ENV_ITERATION_MS: &str = "LATENCYGATE_ITERATION_MS";
pub const ENV_RESULTS_FILE: &str = "LATENCYGATE_RESULTS_FILE";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateConfig {
    pub package: String,
    pub run: RunConfig,
    pub results_file: Option<PathBuf>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            package: DEFAULT_PACKAGE.to_string(),
            run: RunConfig::default(),
            results_file: None,
        }
    }
}

impl GateConfig {
    pub fn from_env() -> Result<Self, LatencyGateError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source; unset keys keep their defaults.
    /// Values are parsed only; `CommandLineConfig::apply` and `LatencyGate::run`
    /// validate the final settings.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LatencyGateError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(package) = lookup(ENV_PACKAGE) {
            config.package = package;
        }
        if let Some(raw) = lookup(ENV_FORKS) {
            config.run.forks = parse_var(ENV_FORKS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_WARMUP) {
            config.run.warmup_iterations = parse_var(ENV_WARMUP, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MEASUREMENT) {
            config.run.measurement_iterations = parse_var(ENV_MEASUREMENT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_ITERATION_MS) {
            let millis: u64 = parse_var(ENV_ITERATION_MS, &raw)?;
            config.run.iteration_time = Duration::from_millis(millis);
        }
        if let Some(path) = lookup(ENV_RESULTS_FILE) {
            config.results_file = Some(PathBuf::from(path));
        }
        Ok(config)
    }
}

pub(crate) fn parse_var<T: FromStr>(name: &str, raw: &str) -> Result<T, LatencyGateError> {
    raw.trim()
        .parse()
        .map_err(|_| LatencyGateError::invalid_input(format!("{name} has invalid value {raw:?}")))
}
