//! Built-in latency benchmarks used by the `latencygate` binary and the test suite.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    LatencyGateError,
    registry::{Benchmark, Registry},
};

const VALUES_SEED: u64 = 0x5EED_0001;
const KEYS_SEED: u64 = 0x5EED_0002;
const BYTES_SEED: u64 = 0x5EED_0003;

fn dataset_size() -> usize {
    #[cfg(feature = "bench-ci")]
    {
        256
    }
    #[cfg(not(feature = "bench-ci"))]
    {
        1_024
    }
}

fn random_values(count: usize, seed: u64) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| rng.r#gen::<u64>()).collect()
}

fn random_bytes(count: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| rng.gen_range(0..=u8::MAX)).collect()
}

fn checksum(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0x811C_9DC5u32, |hash, byte| {
        (hash ^ u32::from(*byte)).wrapping_mul(0x0100_0193)
    })
}

pub mod latency {
    use ahash::AHashMap;

    use super::{
        BYTES_SEED, KEYS_SEED, VALUES_SEED, checksum, dataset_size, random_bytes, random_values,
    };
    use crate::{latency_bench, registry::Benchmark, runner::Bencher};

    pub const BENCHMARKS: &[Benchmark] = &[
        latency_bench!(sort_values, max_ns = 20_000_000),
        latency_bench!(hashed_lookup, max_ns = 20_000_000),
        latency_bench!(fold_checksum, max_ns = 20_000_000, mode = SampleTime),
        // Kept as a declaration only; the threshold is unreachable on purpose.
        latency_bench!(render_report, max_ns = 1, enabled = false),
    ];

    pub fn sort_values(b: &mut Bencher) {
        let values = random_values(dataset_size(), VALUES_SEED);
        b.iter(|| {
            let mut sorted = values.clone();
            sorted.sort_unstable();
            sorted
        });
    }

    pub fn hashed_lookup(b: &mut Bencher) {
        let keys = random_values(dataset_size(), KEYS_SEED);
        let index: AHashMap<u64, usize> = keys.iter().enumerate().map(|(i, k)| (*k, i)).collect();
        b.iter(|| keys.iter().filter_map(|k| index.get(k)).sum::<usize>());
    }

    pub fn fold_checksum(b: &mut Bencher) {
        let bytes = random_bytes(dataset_size() * 4, BYTES_SEED);
        b.iter(|| checksum(&bytes));
    }

    pub fn render_report(b: &mut Bencher) {
        let values = random_values(dataset_size(), VALUES_SEED);
        b.iter(|| {
            values
                .iter()
                .map(|v| format!("{v:020}"))
                .collect::<Vec<_>>()
                .join("\n")
        });
    }
}

pub mod throughput {
    use super::{BYTES_SEED, checksum, dataset_size, random_bytes};
    use crate::{latency_bench, registry::Benchmark, runner::Bencher};

    pub const BENCHMARKS: &[Benchmark] = &[latency_bench!(
        stream_checksum,
        max_ns = 20_000_000,
        mode = Throughput
    )];

    pub fn stream_checksum(b: &mut Bencher) {
        let bytes = random_bytes(dataset_size() * 16, BYTES_SEED);
        b.iter(|| bytes.chunks(64).map(checksum).fold(0u32, u32::wrapping_add));
    }
}

pub fn benchmarks() -> impl Iterator<Item = Benchmark> {
    latency::BENCHMARKS
        .iter()
        .chain(throughput::BENCHMARKS)
        .copied()
}

pub fn registry() -> Result<Registry, LatencyGateError> {
    Registry::from_benchmarks(benchmarks())
}
