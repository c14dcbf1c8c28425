use super::*;

#[test]
fn empty_object_is_the_default_config() {
    let cfg = HarnessConfig::from_json("{}").unwrap();
    assert_eq!(cfg, HarnessConfig::default());
    assert_eq!(cfg.rounding, RoundingRule::NearestTiesAway);
    assert!(cfg.idle_until_exit);
    assert_eq!(cfg.selected_suites(), SuiteKind::ALL.to_vec());
}

#[test]
fn fields_parse_in_snake_case() {
    let cfg = HarnessConfig::from_json(
        r#"{
            "rounding": "truncate",
            "policy": "stop_at_first",
            "clear_color": [255, 0, 0, 255],
            "wait_for_start": true,
            "suites": ["fp", "dph"],
            "snapshot_dir": "out/snaps"
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.rounding, RoundingRule::Truncate);
    assert_eq!(cfg.policy, Some(MismatchPolicy::StopAtFirst));
    assert_eq!(cfg.clear_color, [255, 0, 0, 255]);
    assert!(cfg.wait_for_start);
    assert_eq!(cfg.selected_suites(), vec![SuiteKind::Fp, SuiteKind::Dph]);
    assert_eq!(cfg.snapshot_dir.as_deref(), Some(Path::new("out/snaps")));
    cfg.validate().unwrap();
}

#[test]
fn unknown_fields_are_config_errors() {
    let err = HarnessConfig::from_json(r#"{ "rounding_rule": "truncate" }"#).unwrap_err();
    assert!(matches!(err, ConformError::Config(_)));
}

#[test]
fn duplicate_suites_fail_validation() {
    let cfg = HarnessConfig {
        suites: vec![SuiteKind::Sge, SuiteKind::Sge],
        ..HarnessConfig::default()
    };
    assert!(matches!(cfg.validate(), Err(ConformError::Config(_))));
}

#[test]
fn missing_file_is_a_config_error() {
    let err = HarnessConfig::from_path(Path::new("/nonexistent/pica-conform.json")).unwrap_err();
    assert!(err.to_string().starts_with("config error:"));
}
