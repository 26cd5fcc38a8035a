//! Integration tests for loading processing configuration from JSON

mod common;

use seaflux_core::{CompassQuality, FluxProcessor, PerWindow, ProcessingConfig};

use common::BuoyRecord;

#[test]
fn partial_json_fills_in_defaults() {
    let json = r#"{
        "sampling": { "window_len": 6000, "chop_seconds": 15.0 },
        "platform": { "lever_arm_m": [0.1, 0.0, 0.5] }
    }"#;
    let config: ProcessingConfig = serde_json::from_str(json).unwrap();

    assert_eq!(config.sampling.window_len, 6_000);
    assert_eq!(config.sampling.sample_rate_hz, 10.0);
    assert_eq!(config.sampling.edge_samples(), 150);
    assert_eq!(config.platform.lever_arm_m, [0.1, 0.0, 0.5]);
    assert_eq!(config.filters, ProcessingConfig::default().filters);
    assert!(config.validate().is_ok());
}

#[test]
fn empty_json_is_the_default_configuration() {
    let config: ProcessingConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, ProcessingConfig::default());
}

#[test]
fn configuration_round_trips_through_json() {
    let config = ProcessingConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    let back: ProcessingConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn loaded_configuration_drives_the_processor() {
    let config: ProcessingConfig =
        serde_json::from_str(r#"{ "sampling": { "window_len": 3000, "chop_seconds": 10.0 } }"#).unwrap();
    let processor = FluxProcessor::new(config).unwrap();

    let record = BuoyRecord::synthetic(6_000, 0.0, 5);
    let l2 = processor.time_l2(&record.timestamps).unwrap();
    assert_eq!(l2.as_slice(), &[150.0, 450.0]);

    let reports = processor.process(&record.inputs(), Some(&record.sound)).unwrap();
    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r.quality == CompassQuality::Stable));
    assert!(reports.iter().all(|r| r.wind.len() == 2_800));
    assert!(matches!(processor.flux_alongwind(&record.inputs()).unwrap(), PerWindow::Sequence(v) if v.len() == 2));
}

#[test]
fn report_serializes_flux_outputs() {
    let values = PerWindow::Sequence(vec![-0.05, f64::NAN]);
    let json = serde_json::to_string(&values).unwrap();
    assert_eq!(json, r#"{"Sequence":[-0.05,null]}"#);
}
