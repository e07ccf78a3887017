use super::*;

#[test]
fn defaults_validate() {
    assert!(SimConfig::default().validate().is_ok());
}

#[test]
fn rejects_bad_values() {
    let bad_damping = SimConfig {
        damping: 1.0,
        ..SimConfig::default()
    };
    assert!(matches!(
        bad_damping.validate(),
        Err(DotmorphError::Config(_))
    ));

    let bad_range = SimConfig {
        radius: [3.0, 1.0],
        ..SimConfig::default()
    };
    assert!(bad_range.validate().is_err());

    let bad_speed = SimConfig {
        max_speed: 0.0,
        ..SimConfig::default()
    };
    assert!(bad_speed.validate().is_err());

    let nan = SimConfig {
        stiffness: f64::NAN,
        ..SimConfig::default()
    };
    assert!(nan.validate().is_err());
}

#[test]
fn partial_json_fills_defaults() {
    let cfg: SimConfig = serde_json::from_str(r#"{"count": 64, "seed": "demo"}"#).unwrap();
    assert_eq!(cfg.count, 64);
    assert_eq!(cfg.seed, "demo");
    assert_eq!(cfg.max_speed, SimConfig::default().max_speed);
}
