use std::time::Duration;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use latencygate::{Bencher, GateReport, LatencyGate, Mode, RunConfig, TimingRunner, demo};

const SAMPLE_SIZE: usize = 20;
const WARM_UP: Duration = Duration::from_millis(300);
const MEASURE: Duration = Duration::from_millis(500);

// Each sample includes the routine's own setup, so numbers are upper bounds
// of what the gate measures.
fn bench_registered_routines(c: &mut Criterion) {
    let mut group = c.benchmark_group("registered_routines");
    group.sample_size(SAMPLE_SIZE);
    group.warm_up_time(WARM_UP);
    group.measurement_time(MEASURE);
    for bench in demo::benchmarks().filter(|b| b.threshold().enabled) {
        group.bench_function(BenchmarkId::from_parameter(bench.name()), |b| {
            b.iter(|| {
                let mut bencher = Bencher::new(Mode::SingleShotTime, Duration::ZERO);
                bench.invoke(&mut bencher);
            });
        });
    }
    group.finish();
}

fn bench_gate_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_round");
    group.sample_size(10);
    group.warm_up_time(WARM_UP);
    group.measurement_time(Duration::from_secs(2));
    let config = RunConfig {
        forks: 1,
        warmup_iterations: 0,
        measurement_iterations: 1,
        iteration_time: Duration::from_millis(1),
    };
    group.bench_function("demo_latency_package", |b| {
        b.iter(|| -> GateReport {
            let registry = demo::registry().expect("registry");
            let mut gate = LatencyGate::new(registry, TimingRunner::new()).with_config(config.clone());
            gate.run("latencygate::demo::latency", &mut std::io::sink())
                .expect("gate run")
        });
    });
    group.finish();
}

criterion_group!(
    name = registered_benches;
    config = Criterion::default();
    targets = bench_registered_routines, bench_gate_round
);
criterion_main!(registered_benches);
