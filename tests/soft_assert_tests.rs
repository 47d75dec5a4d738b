use latencygate::{LatencyGateError, SoftAssertions};

#[test]
fn test_clean_collector_passes() {
    let mut soft = SoftAssertions::new();
    assert!(soft.check(true, || "unused".into()));
    assert!(soft.check(1 < 2, || "unused".into()));
    assert_eq!(soft.checks(), 2);
    assert!(soft.is_clean());
    assert!(soft.assert_all().is_ok());
}

#[test]
fn test_failures_accumulate_without_short_circuit() {
    let mut soft = SoftAssertions::new();
    let mut evaluated = 0;
    for value in [5, 50, 500] {
        evaluated += 1;
        soft.check(value < 10, || format!("{value} is not below 10"));
    }
    soft.fail("explicit failure");
    assert_eq!(evaluated, 3);
    assert_eq!(soft.failures().len(), 3);
    let err = soft.assert_all().unwrap_err();
    assert_eq!(err.checks, 4);
    assert_eq!(
        err.failures,
        vec![
            "50 is not below 10".to_string(),
            "500 is not below 10".to_string(),
            "explicit failure".to_string(),
        ]
    );
}

#[test]
fn test_error_display_lists_failures_in_order() {
    let mut soft = SoftAssertions::new();
    soft.fail("first");
    soft.check(false, || "second".into());
    let text = soft.assert_all().unwrap_err().to_string();
    assert!(text.starts_with("2 of 2 soft assertions failed"));
    let first = text.find("first").expect("first");
    let second = text.find("second").expect("second");
    assert!(first < second);
    assert!(text.contains("-- failure 2 --"));
}

#[test]
fn test_message_is_only_built_on_failure() {
    let mut soft = SoftAssertions::new();
    soft.check(true, || panic!("message built for passing check"));
    assert!(soft.is_clean());
}

#[test]
fn test_converts_into_gate_error() {
    let mut soft = SoftAssertions::new();
    soft.fail("slow");
    let err: LatencyGateError = soft.assert_all().unwrap_err().into();
    assert!(matches!(err, LatencyGateError::Assertions(_)));
    assert!(err.to_string().contains("slow"));
}
