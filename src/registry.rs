//! Static registration of latency benchmarks.
//!
//! Benchmarks are declared with [`latency_bench!`](crate::latency_bench) next to
//! their routine and collected into `const` tables:
//!
//! ```rust
//! use latencygate::{Bencher, Registry, latency_bench, registry::Benchmark};
//!
//! fn sum_small(b: &mut Bencher) {
//!     b.iter(|| (0..64u64).sum::<u64>());
//! }
//!
//! const BENCHMARKS: &[Benchmark] = &[latency_bench!(sum_small, max_ns = 50_000)];
//!
//! let registry = Registry::from_benchmarks(BENCHMARKS.iter().copied())?;
//! assert_eq!(registry.discover(module_path!()).len(), 1);
//! # Ok::<(), latencygate::LatencyGateError>(())
//! ```

use std::fmt;

use ahash::{AHashMap, AHashSet};

use crate::{LatencyGateError, Mode, Threshold, runner::Bencher};

const PATH_SEPARATOR: &str = "::";

/// Declares a [`Benchmark`] whose identifier is the routine's full module path.
///
/// Accepted forms:
///
/// - `latency_bench!(routine, max_ns = N)`
/// - `latency_bench!(routine, max_ns = N, mode = Throughput)`
/// - `latency_bench!(routine, max_ns = N, enabled = false)`
/// - `latency_bench!(routine, max_ns = N, mode = SampleTime, enabled = false)`
#[macro_export]
macro_rules! latency_bench {
    ($routine:ident, max_ns = $max:expr, mode = $mode:ident, enabled = $enabled:expr) => {
        $crate::registry::Benchmark::new(
            concat!(module_path!(), "::", stringify!($routine)),
            $routine,
            $crate::Mode::$mode,
            $crate::Threshold {
                enabled: $enabled,
                max_ns: $max,
            },
        )
    };
    ($routine:ident, max_ns = $max:expr, mode = $mode:ident) => {
        $crate::latency_bench!($routine, max_ns = $max, mode = $mode, enabled = true)
    };
    ($routine:ident, max_ns = $max:expr, enabled = $enabled:expr) => {
        $crate::latency_bench!($routine, max_ns = $max, mode = AverageTime, enabled = $enabled)
    };
    ($routine:ident, max_ns = $max:expr) => {
        $crate::latency_bench!($routine, max_ns = $max, mode = AverageTime, enabled = true)
    };
}

#[derive(Clone, Copy)]
pub struct Benchmark {
    id: &'static str,
    routine: fn(&mut Bencher),
    mode: Mode,
    threshold: Threshold,
}

impl Benchmark {
    pub const fn new(
        id: &'static str,
        routine: fn(&mut Bencher),
        mode: Mode,
        threshold: Threshold,
    ) -> Self {
        Self {
            id,
            routine,
            mode,
            threshold,
        }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Last path segment of the identifier.
    pub fn name(&self) -> &'static str {
        match self.id.rsplit_once(PATH_SEPARATOR) {
            Some((_, name)) => name,
            None => self.id,
        }
    }

    /// Module path the benchmark was declared in.
    pub fn module(&self) -> &'static str {
        match self.id.rsplit_once(PATH_SEPARATOR) {
            Some((module, _)) => module,
            None => "",
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    pub fn invoke(&self, bencher: &mut Bencher) {
        (self.routine)(bencher)
    }

    pub fn in_package(&self, package: &str) -> bool {
        let package = package.trim_end_matches(PATH_SEPARATOR);
        if package.is_empty() {
            return true;
        }
        let module = self.module();
        module == package
            || module
                .strip_prefix(package)
                .is_some_and(|rest| rest.starts_with(PATH_SEPARATOR))
    }
}

impl fmt::Debug for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Benchmark")
            .field("id", &self.id)
            .field("mode", &self.mode)
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, Default)]
pub struct Registry {
    benchmarks: AHashMap<&'static str, Benchmark>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_benchmarks<I>(benchmarks: I) -> Result<Self, LatencyGateError>
    where
        I: IntoIterator<Item = Benchmark>,
    {
        let mut registry = Self::new();
        for bench in benchmarks {
            registry.register(bench)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, bench: Benchmark) -> Result<(), LatencyGateError> {
        if bench.threshold.max_ns == 0 {
            return Err(LatencyGateError::invalid_input(format!(
                "threshold for {} must be positive",
                bench.id
            )));
        }
        if self.benchmarks.contains_key(bench.id) {
            return Err(LatencyGateError::invalid_input(format!(
                "benchmark {} registered twice",
                bench.id
            )));
        }
        self.benchmarks.insert(bench.id, bench);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&Benchmark, LatencyGateError> {
        self.benchmarks
            .get(id)
            .ok_or_else(|| LatencyGateError::not_found(id.to_string()))
    }

    /// Identifiers of every benchmark declared in `package` or one of its submodules.
    pub fn discover(&self, package: &str) -> AHashSet<&'static str> {
        self.benchmarks
            .values()
            .filter(|bench| bench.in_package(package))
            .map(|bench| bench.id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.benchmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.benchmarks.is_empty()
    }
}
