use serde::{Deserialize, Serialize};

/// Maximum allowed latency for a benchmark, in nanoseconds per operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Threshold {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    pub max_ns: u64,
}

impl Threshold {
    pub const fn new(max_ns: u64) -> Self {
        Self {
            enabled: true,
            max_ns,
        }
    }

    pub const fn disabled(max_ns: u64) -> Self {
        Self {
            enabled: false,
            max_ns,
        }
    }

    /// Strict comparison: a score equal to the threshold does not pass.
    pub fn admits(&self, score_ns: f64) -> bool {
        score_ns < self.max_ns as f64
    }
}

fn enabled_by_default() -> bool {
    true
}
