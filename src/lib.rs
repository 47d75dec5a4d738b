//! Latency threshold gates for statically registered benchmarks.
//!
//! Declare benchmarks with [`latency_bench!`], collect them into a [`Registry`],
//! and evaluate a package with [`LatencyGate`] or [`gate::check_package`].
//! Failed checks are collected as soft assertions and reported together.

pub mod bench_meta;
pub mod cli;
pub mod config;
pub mod demo;
pub mod errors;
pub mod gate;
pub mod logging;
pub mod registry;
pub mod results;
pub mod runner;
pub mod soft_assert;
pub mod threshold;

pub use crate::bench_meta::{Mode, RunResult};
pub use crate::config::GateConfig;
pub use crate::errors::LatencyGateError;
pub use crate::gate::{GateReport, LatencyGate, Outcome, Verdict};
pub use crate::registry::{Benchmark, Registry};
pub use crate::results::ResultStore;
pub use crate::runner::{BenchRunner, Bencher, RunConfig, TimingRunner};
pub use crate::soft_assert::{SoftAssertionError, SoftAssertions};
pub use crate::threshold::Threshold;
