use latencygate::{
    Bencher, LatencyGateError, Mode, Registry, Threshold, latency_bench, registry::Benchmark,
};

mod storage {
    use latencygate::{Bencher, latency_bench, registry::Benchmark};

    pub const BENCHMARKS: &[Benchmark] = &[
        latency_bench!(write_page, max_ns = 50_000),
        latency_bench!(read_page, max_ns = 20_000, mode = SingleShotTime),
    ];

    pub fn write_page(b: &mut Bencher) {
        b.iter(|| [0u8; 64]);
    }

    pub fn read_page(b: &mut Bencher) {
        b.iter(|| [1u8; 64]);
    }

    pub mod index {
        use latencygate::{Bencher, latency_bench, registry::Benchmark};

        pub const BENCHMARKS: &[Benchmark] = &[latency_bench!(
            probe,
            max_ns = 5_000,
            mode = SampleTime,
            enabled = false
        )];

        pub fn probe(b: &mut Bencher) {
            b.iter(|| 7u32);
        }
    }
}

mod storage_archive {
    use latencygate::{Bencher, latency_bench, registry::Benchmark};

    pub const BENCHMARKS: &[Benchmark] = &[latency_bench!(seal, max_ns = 1_000)];

    pub fn seal(b: &mut Bencher) {
        b.iter(|| 0u8);
    }
}

fn registry() -> Registry {
    let all = storage::BENCHMARKS
        .iter()
        .chain(storage::index::BENCHMARKS)
        .chain(storage_archive::BENCHMARKS)
        .copied();
    Registry::from_benchmarks(all).expect("registry")
}

fn noop(b: &mut Bencher) {
    b.iter(|| ());
}

#[test]
fn test_macro_derives_identifier_from_module_path() {
    let bench = storage::BENCHMARKS[0];
    assert_eq!(bench.id(), "registry_tests::storage::write_page");
    assert_eq!(bench.name(), "write_page");
    assert_eq!(bench.module(), "registry_tests::storage");
    assert_eq!(bench.mode(), Mode::AverageTime);
    assert_eq!(bench.threshold(), Threshold::new(50_000));
}

#[test]
fn test_macro_accepts_mode_and_enabled_flag() {
    let read = storage::BENCHMARKS[1];
    assert_eq!(read.mode(), Mode::SingleShotTime);
    assert!(read.threshold().enabled);
    let probe = storage::index::BENCHMARKS[0];
    assert_eq!(probe.mode(), Mode::SampleTime);
    assert_eq!(probe.threshold(), Threshold::disabled(5_000));
}

#[test]
fn test_discover_includes_submodules_and_disabled_declarations() {
    let found = registry().discover("registry_tests::storage");
    assert_eq!(found.len(), 3);
    assert!(found.contains("registry_tests::storage::write_page"));
    assert!(found.contains("registry_tests::storage::read_page"));
    assert!(found.contains("registry_tests::storage::index::probe"));
}

#[test]
fn test_discover_does_not_match_sibling_with_shared_prefix() {
    let found = registry().discover("registry_tests::storage");
    assert!(!found.contains("registry_tests::storage_archive::seal"));
    let archive = registry().discover("registry_tests::storage_archive");
    assert_eq!(archive.len(), 1);
}

#[test]
fn test_discover_nested_package_only() {
    let found = registry().discover("registry_tests::storage::index::");
    assert_eq!(found.len(), 1);
}

#[test]
fn test_discover_unknown_package_is_empty() {
    assert!(registry().discover("registry_tests::network").is_empty());
    assert!(Registry::new().discover("anything").is_empty());
}

#[test]
fn test_empty_package_discovers_everything() {
    assert_eq!(registry().discover("").len(), registry().len());
}

#[test]
fn test_duplicate_registration_is_rejected() {
    let mut registry = registry();
    let err = registry.register(storage::BENCHMARKS[0]).unwrap_err();
    assert!(matches!(err, LatencyGateError::InvalidInput(ref msg) if msg.contains("twice")));
    assert_eq!(registry.len(), 4);
}

#[test]
fn test_zero_threshold_is_rejected() {
    let zero = Benchmark::new("registry_tests::zero", noop, Mode::AverageTime, Threshold::new(0));
    let err = Registry::new().register(zero).unwrap_err();
    assert!(matches!(err, LatencyGateError::InvalidInput(_)));
}

#[test]
fn test_get_unknown_identifier_is_not_found() {
    let err = registry().get("registry_tests::missing").unwrap_err();
    assert!(matches!(err, LatencyGateError::NotFound(_)));
}

#[test]
fn test_locally_declared_benchmark_uses_enclosing_module() {
    let local = latency_bench!(noop, max_ns = 10);
    assert_eq!(local.id(), "registry_tests::noop");
    assert!(local.in_package("registry_tests"));
}
