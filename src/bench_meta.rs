use std::fmt;

use serde::{Deserialize, Serialize};

/// Measurement semantics of a benchmark.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    AverageTime,
    SampleTime,
    SingleShotTime,
    Throughput,
}

impl Mode {
    pub fn short_name(&self) -> &'static str {
        match self {
            Mode::AverageTime => "avgt",
            Mode::SampleTime => "sample",
            Mode::SingleShotTime => "ss",
            Mode::Throughput => "thrpt",
        }
    }

    pub fn is_throughput(&self) -> bool {
        matches!(self, Mode::Throughput)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub label: String,
    pub mode: Mode,
    /// ns/op for latency modes, ops/s for throughput.
    pub score: f64,
    pub iterations: u32,
    pub ops: u64,
}

impl RunResult {
    pub fn unit(&self) -> &'static str {
        if self.mode.is_throughput() {
            "ops/s"
        } else {
            "ns/op"
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{}: mode={} score={:.3} {} iterations={} ops={}",
            self.label,
            self.mode,
            self.score,
            self.unit(),
            self.iterations,
            self.ops
        )
    }
}
