use std::{path::PathBuf, time::Duration};

use crate::{
    LatencyGateError, Registry,
    config::{GateConfig, parse_var},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Run,
    List,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandLineConfig {
    pub command: Command,
    pub package: Option<String>,
    pub forks: Option<u32>,
    pub warmup: Option<u32>,
    pub measurement: Option<u32>,
    pub iteration_ms: Option<u64>,
    pub results: Option<PathBuf>,
}

impl CommandLineConfig {
    pub fn from_args(args: &[&str]) -> Result<Self, String> {
        let mut config = Self {
            command: Command::Run,
            package: None,
            forks: None,
            warmup: None,
            measurement: None,
            iteration_ms: None,
            results: None,
        };
        let mut iter = args.iter().skip(1);
        while let Some(arg) = iter.next() {
            match *arg {
                "--package" => config.package = Some(flag_value(&mut iter, arg)?.to_string()),
                "--forks" => config.forks = Some(parse_flag(&mut iter, arg)?),
                "--warmup" => config.warmup = Some(parse_flag(&mut iter, arg)?),
                "--measurement" => config.measurement = Some(parse_flag(&mut iter, arg)?),
                "--iteration-ms" => config.iteration_ms = Some(parse_flag(&mut iter, arg)?),
                "--results" => config.results = Some(PathBuf::from(flag_value(&mut iter, arg)?)),
                "run" => config.command = Command::Run,
                "list" => config.command = Command::List,
                other if other.starts_with('-') => {
                    return Err(format!("unknown flag {other}"));
                }
                other => return Err(format!("unknown command {other}")),
            }
        }
        Ok(config)
    }

    /// Layers flag values over `base`, which usually comes from the environment.
    pub fn apply(&self, mut base: GateConfig) -> Result<GateConfig, LatencyGateError> {
        if let Some(package) = &self.package {
            base.package = package.clone();
        }
        if let Some(forks) = self.forks {
            base.run.forks = forks;
        }
        if let Some(warmup) = self.warmup {
            base.run.warmup_iterations = warmup;
        }
        if let Some(measurement) = self.measurement {
            base.run.measurement_iterations = measurement;
        }
        if let Some(ms) = self.iteration_ms {
            base.run.iteration_time = Duration::from_millis(ms);
        }
        if let Some(results) = &self.results {
            base.results_file = Some(results.clone());
        }
        base.run.validate()?;
        Ok(base)
    }

    pub fn help() -> &'static str {
        "Usage: latencygate [run|list] [--package ID] [--forks N] [--warmup N] \
         [--measurement N] [--iteration-ms N] [--results PATH]\n"
    }
}

/// One line per discovered benchmark, sorted by identifier.
pub fn list_lines(registry: &Registry, package: &str) -> Vec<String> {
    let mut ids: Vec<&'static str> = registry.discover(package).into_iter().collect();
    ids.sort_unstable();
    ids.into_iter()
        .filter_map(|id| registry.get(id).ok())
        .map(|bench| {
            let threshold = bench.threshold();
            format!(
                "{} mode={} threshold={} ns enabled={}",
                bench.id(),
                bench.mode(),
                threshold.max_ns,
                threshold.enabled
            )
        })
        .collect()
}

fn flag_value<'a, 'b: 'a, I>(iter: &mut I, flag: &str) -> Result<&'b str, String>
where
    I: Iterator<Item = &'a &'b str>,
{
    iter.next()
        .copied()
        .ok_or_else(|| format!("{flag} requires a value"))
}

fn parse_flag<'a, 'b: 'a, I, T>(iter: &mut I, flag: &str) -> Result<T, String>
where
    I: Iterator<Item = &'a &'b str>,
    T: std::str::FromStr,
{
    let raw = flag_value(iter, flag)?;
    parse_var(flag, raw).map_err(|e| e.to_string())
}
