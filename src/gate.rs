use std::io::{self, Write};

use tracing::{debug, info, warn};

use crate::{
    LatencyGateError, Mode, RunResult, Threshold,
    registry::Registry,
    results::ResultStore,
    runner::{BenchRunner, RunConfig, TimingRunner},
    soft_assert::{SoftAssertionError, SoftAssertions},
};

const OK_MARKER: &str = "==OK==";
const FAILED_MARKER: &str = "==FAILED==";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Exceeded,
    /// Throughput scores cannot be compared to a latency threshold.
    Unsupported,
}

impl Verdict {
    pub fn judge(result: &RunResult, threshold: &Threshold) -> Self {
        if result.mode.is_throughput() {
            Verdict::Unsupported
        } else if threshold.admits(result.score) {
            Verdict::Pass
        } else {
            Verdict::Exceeded
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    pub label: String,
    pub mode: Mode,
    pub score: f64,
    pub unit: &'static str,
    pub threshold_ns: u64,
    pub verdict: Verdict,
}

impl Outcome {
    pub fn judge(result: &RunResult, threshold: &Threshold) -> Self {
        Self {
            label: result.label.clone(),
            mode: result.mode,
            score: result.score,
            unit: result.unit(),
            threshold_ns: threshold.max_ns,
            verdict: Verdict::judge(result, threshold),
        }
    }

    pub fn passed(&self) -> bool {
        self.verdict.is_pass()
    }

    pub fn reason(&self) -> Option<String> {
        match self.verdict {
            Verdict::Pass => None,
            Verdict::Exceeded => Some(format!(
                "score {:.3} {} is not below threshold {} ns",
                self.score, self.unit, self.threshold_ns
            )),
            Verdict::Unsupported => Some(format!(
                "mode {} is not supported, only latency modes can be checked against a threshold",
                self.mode
            )),
        }
    }

    pub fn line(&self) -> String {
        let marker = if self.passed() { OK_MARKER } else { FAILED_MARKER };
        let mut line = format!(
            "{marker} {} mode={} score={:.3} {} threshold={} ns",
            self.label, self.mode, self.score, self.unit, self.threshold_ns
        );
        if let Some(reason) = self.reason() {
            line.push_str(": ");
            line.push_str(&reason);
        }
        line
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GateReport {
    pub package: String,
    pub outcomes: Vec<Outcome>,
    pub errors: Vec<String>,
    pub skipped: Vec<String>,
    assertions: SoftAssertions,
}

impl GateReport {
    fn new(package: &str) -> Self {
        Self {
            package: package.to_string(),
            outcomes: Vec::new(),
            errors: Vec::new(),
            skipped: Vec::new(),
            assertions: SoftAssertions::new(),
        }
    }

    pub fn passed(&self) -> bool {
        self.assertions.is_clean()
    }

    pub fn failures(&self) -> &[String] {
        self.assertions.failures()
    }

    pub fn summary(&self) -> String {
        let passed = self.outcomes.iter().filter(|o| o.passed()).count();
        format!(
            "package {}: {} passed, {} failed, {} skipped",
            self.package,
            passed,
            self.assertions.failures().len(),
            self.skipped.len()
        )
    }

    pub fn assert_all(self) -> Result<(), SoftAssertionError> {
        self.assertions.assert_all()
    }
}

/// Runs every enabled benchmark of a package once and checks it against its threshold.
#[derive(Debug)]
pub struct LatencyGate<R> {
    registry: Registry,
    runner: R,
    config: RunConfig,
    store: Option<ResultStore>,
}

impl<R: BenchRunner> LatencyGate<R> {
    pub fn new(registry: Registry, runner: R) -> Self {
        Self {
            registry,
            runner,
            config: RunConfig::default(),
            store: None,
        }
    }

    pub fn with_config(mut self, config: RunConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_store(mut self, store: ResultStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn run<W: Write>(
        &mut self,
        package: &str,
        out: &mut W,
    ) -> Result<GateReport, LatencyGateError> {
        self.config.validate()?;
        let mut ids: Vec<&'static str> = self.registry.discover(package).into_iter().collect();
        ids.sort_unstable();
        info!(package, benchmarks = ids.len(), "evaluating latency thresholds");

        let mut report = GateReport::new(package);
        for id in ids {
            let bench = *self.registry.get(id)?;
            let threshold = bench.threshold();
            if !threshold.enabled {
                debug!(bench = id, "threshold disabled, skipping");
                report.skipped.push(id.to_string());
                continue;
            }
            debug!(bench = id, mode = %bench.mode(), "running benchmark");
            match self.runner.run(&bench, &self.config) {
                Ok(result) => {
                    if let Some(store) = &self.store {
                        store.record(&result)?;
                    }
                    let outcome = Outcome::judge(&result, &threshold);
                    writeln!(out, "{}", outcome.line())
                        .map_err(|e| LatencyGateError::io(e.to_string()))?;
                    let passed = report
                        .assertions
                        .check(outcome.passed(), || outcome.line());
                    if !passed {
                        warn!(
                            bench = id,
                            score = outcome.score,
                            threshold_ns = threshold.max_ns,
                            "latency check failed"
                        );
                    }
                    report.outcomes.push(outcome);
                }
                Err(err) => {
                    warn!(bench = id, error = %err, "benchmark did not produce a result");
                    let line = format!(
                        "{FAILED_MARKER} {id} mode={} threshold={} ns: {err}",
                        bench.mode(),
                        threshold.max_ns
                    );
                    writeln!(out, "{line}").map_err(|e| LatencyGateError::io(e.to_string()))?;
                    report.assertions.fail(line);
                    report.errors.push(id.to_string());
                }
            }
        }
        info!(package, passed = report.passed(), "{}", report.summary());
        Ok(report)
    }
}

/// Evaluates `package` with the in-process harness and default settings,
/// printing verdict lines to stdout. Fails if any check failed.
pub fn check_package(registry: Registry, package: &str) -> Result<(), LatencyGateError> {
    let mut gate = LatencyGate::new(registry, TimingRunner::new());
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let report = gate.run(package, &mut out)?;
    report.assert_all()?;
    Ok(())
}
