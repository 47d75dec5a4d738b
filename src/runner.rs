use std::{
    any::Any,
    hint::black_box,
    panic::{self, AssertUnwindSafe},
    sync::OnceLock,
    time::{Duration, Instant},
};

use tracing::debug;

use crate::{LatencyGateError, Mode, RunResult, registry::Benchmark};

pub const DEFAULT_FORKS: u32 = 1;
pub const DEFAULT_WARMUP_ITERATIONS: u32 = 1;
pub const DEFAULT_MEASUREMENT_ITERATIONS: u32 = 3;
pub const DEFAULT_ITERATION_TIME: Duration = Duration::from_millis(100);

const TARGET_BATCHES: u32 = 100;
const MIN_SAMPLE: Duration = Duration::from_micros(1);
const CLOCK_CALIBRATION_READS: u32 = 1_000;

/// Fork, warmup and measurement settings shared by every benchmark in a run.
/// Scores are always reported in nanoseconds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    pub forks: u32,
    pub warmup_iterations: u32,
    pub measurement_iterations: u32,
    pub iteration_time: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            forks: DEFAULT_FORKS,
            warmup_iterations: DEFAULT_WARMUP_ITERATIONS,
            measurement_iterations: DEFAULT_MEASUREMENT_ITERATIONS,
            iteration_time: DEFAULT_ITERATION_TIME,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), LatencyGateError> {
        if self.forks == 0 {
            return Err(LatencyGateError::invalid_input("forks must be at least 1"));
        }
        if self.measurement_iterations == 0 {
            return Err(LatencyGateError::invalid_input(
                "measurement iterations must be at least 1",
            ));
        }
        if self.iteration_time.is_zero() {
            return Err(LatencyGateError::invalid_input(
                "iteration time must be positive",
            ));
        }
        Ok(())
    }
}

/// Runs a single benchmark and reports its score.
pub trait BenchRunner {
    fn run(&mut self, bench: &Benchmark, config: &RunConfig)
    -> Result<RunResult, LatencyGateError>;
}

impl<R: BenchRunner + ?Sized> BenchRunner for &mut R {
    fn run(
        &mut self,
        bench: &Benchmark,
        config: &RunConfig,
    ) -> Result<RunResult, LatencyGateError> {
        (**self).run(bench, config)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Measurement {
    ops: u64,
    elapsed: Duration,
}

impl Measurement {
    fn merge(&mut self, other: Measurement) {
        self.ops += other.ops;
        self.elapsed += other.elapsed;
    }
}

/// Timing handle passed to a benchmark routine for one iteration.
#[derive(Debug)]
pub struct Bencher {
    mode: Mode,
    budget: Duration,
    measured: Option<Measurement>,
}

impl Bencher {
    pub fn new(mode: Mode, budget: Duration) -> Self {
        Self {
            mode,
            budget,
            measured: None,
        }
    }

    /// Times `routine` according to the benchmark mode. Work done before this
    /// call is setup and is not measured.
    pub fn iter<O, F>(&mut self, mut routine: F)
    where
        F: FnMut() -> O,
    {
        let measurement = match self.mode {
            Mode::SingleShotTime => {
                let start = Instant::now();
                black_box(routine());
                Measurement {
                    ops: 1,
                    elapsed: start.elapsed().saturating_sub(clock_read_cost()),
                }
            }
            Mode::SampleTime => self.sampled(&mut routine),
            Mode::AverageTime | Mode::Throughput => self.batched(&mut routine),
        };
        match self.measured.as_mut() {
            Some(existing) => existing.merge(measurement),
            None => self.measured = Some(measurement),
        }
    }

    /// Runs doubling batches until the budget is spent; the clock is read once
    /// per batch so its cost is spread over every invocation in the batch.
    fn batched<O, F>(&self, routine: &mut F) -> Measurement
    where
        F: FnMut() -> O,
    {
        let batch_target = self.budget / TARGET_BATCHES;
        let start = Instant::now();
        let mut ops = 0u64;
        let mut batch = 1u64;
        let mut last = Duration::ZERO;
        loop {
            for _ in 0..batch {
                black_box(routine());
            }
            ops += batch;
            let elapsed = start.elapsed();
            if elapsed >= self.budget {
                return Measurement { ops, elapsed };
            }
            if elapsed - last < batch_target {
                batch = batch.saturating_mul(2);
            }
            last = elapsed;
        }
    }

    /// Each sample times one batch, minus the cost of the clock read that
    /// closes it. Batches grow until a sample is long enough to resolve.
    fn sampled<O, F>(&self, routine: &mut F) -> Measurement
    where
        F: FnMut() -> O,
    {
        let overhead = clock_read_cost();
        let started = Instant::now();
        let mut sampled = Measurement::default();
        let mut batch = 1u64;
        loop {
            let start = Instant::now();
            for _ in 0..batch {
                black_box(routine());
            }
            let elapsed = start.elapsed();
            sampled.merge(Measurement {
                ops: batch,
                elapsed: elapsed.saturating_sub(overhead),
            });
            if started.elapsed() >= self.budget {
                return sampled;
            }
            if elapsed < MIN_SAMPLE {
                batch = batch.saturating_mul(2);
            }
        }
    }

    fn finish(self) -> Option<Measurement> {
        self.measured
    }
}

/// In-process harness. Each fork is an independent trial with fresh benchers.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimingRunner;

impl TimingRunner {
    pub fn new() -> Self {
        Self
    }

    fn run_iteration(
        bench: &Benchmark,
        budget: Duration,
    ) -> Result<Measurement, LatencyGateError> {
        let mut bencher = Bencher::new(bench.mode(), budget);
        panic::catch_unwind(AssertUnwindSafe(|| bench.invoke(&mut bencher))).map_err(
            |payload| {
                LatencyGateError::benchmark(format!(
                    "{} panicked: {}",
                    bench.id(),
                    panic_message(payload.as_ref())
                ))
            },
        )?;
        bencher.finish().ok_or_else(|| {
            LatencyGateError::benchmark(format!("{} never called Bencher::iter", bench.id()))
        })
    }
}

impl BenchRunner for TimingRunner {
    fn run(
        &mut self,
        bench: &Benchmark,
        config: &RunConfig,
    ) -> Result<RunResult, LatencyGateError> {
        config.validate()?;
        let mut total = Measurement::default();
        let mut iterations = 0u32;
        for fork in 0..config.forks {
            debug!(bench = bench.id(), fork, "starting fork");
            for _ in 0..config.warmup_iterations {
                Self::run_iteration(bench, config.iteration_time)?;
            }
            for _ in 0..config.measurement_iterations {
                total.merge(Self::run_iteration(bench, config.iteration_time)?);
                iterations += 1;
            }
        }
        Ok(RunResult {
            label: bench.id().to_string(),
            mode: bench.mode(),
            score: score(bench.mode(), total),
            iterations,
            ops: total.ops,
        })
    }
}

/// Average cost of one `Instant::now()` call, measured once per process.
fn clock_read_cost() -> Duration {
    static COST: OnceLock<Duration> = OnceLock::new();
    *COST.get_or_init(|| {
        let start = Instant::now();
        for _ in 0..CLOCK_CALIBRATION_READS {
            black_box(Instant::now());
        }
        start.elapsed() / CLOCK_CALIBRATION_READS
    })
}

fn score(mode: Mode, measurement: Measurement) -> f64 {
    let elapsed_ns = measurement.elapsed.as_nanos().max(1) as f64;
    let ops = measurement.ops.max(1) as f64;
    if mode.is_throughput() {
        ops / (elapsed_ns / 1e9)
    } else {
        elapsed_ns / ops
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        return (*msg).to_string();
    }
    if let Some(msg) = payload.downcast_ref::<String>() {
        return msg.clone();
    }
    "non-string panic payload".to_string()
}
