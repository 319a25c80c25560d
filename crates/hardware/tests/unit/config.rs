//! Configuration parsing and validation tests.

use std::io::Write;

use dramsim::common::error::ConfigError;
use dramsim::config::{Config, PagePolicy, SchedulerPolicy};
use dramsim::mem::timing::{TimingMatrix, TimingParameters};
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn default_config_is_valid() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.controllers.len(), 1);
    assert_eq!(config.controllers[0].page_policy, PagePolicy::Open);
    assert_eq!(config.controllers[0].scheduler, SchedulerPolicy::OldestFirst);
}

#[test]
fn minimal_file_fills_in_defaults() {
    let file = config_file(r#"{ "controllers": [{}] }"#);
    let config = Config::from_file(file.path()).unwrap();

    let geometry = &config.controllers[0].geometry;
    assert_eq!(geometry.num_banks, 8);
    assert_eq!(geometry.num_rows, 16384);
    assert_eq!(
        config.controllers[0].resolve_timing(0).unwrap(),
        TimingParameters::ddr3_1600()
    );
}

#[test]
fn policies_and_profile_parse_by_name() {
    let file = config_file(
        r#"{
            "controllers": [{
                "name": "mc_a",
                "page_policy": "Closed",
                "scheduler": "RankBankRoundRobin",
                "timing_profile": "DDR3_1600"
            }]
        }"#,
    );
    let config = Config::from_file(file.path()).unwrap();
    let controller = &config.controllers[0];

    assert_eq!(controller.display_name(0), "mc_a");
    assert_eq!(controller.page_policy, PagePolicy::Closed);
    assert_eq!(controller.scheduler, SchedulerPolicy::RankBankRoundRobin);
    assert_eq!(
        controller.resolve_timing(0).unwrap(),
        TimingParameters::ddr3_1600()
    );
}

#[test]
fn partial_timing_overrides_keep_profile_defaults() {
    let file = config_file(
        r#"{ "controllers": [{ "timing": { "t_rcd": 5, "t_burst": 2 } }] }"#,
    );
    let config = Config::from_file(file.path()).unwrap();
    let timing = config.controllers[0].resolve_timing(0).unwrap();

    assert_eq!(timing.t_rcd, 5);
    assert_eq!(timing.t_burst, 2);
    assert_eq!(timing.t_cas, TimingParameters::ddr3_1600().t_cas);
}

#[test]
fn parsing_the_same_file_twice_is_idempotent() {
    let file = config_file(
        r#"{ "controllers": [{ "timing": { "t_rcd": 7 }, "page_policy": "Closed" }] }"#,
    );
    let first = Config::from_file(file.path()).unwrap();
    let second = Config::from_file(file.path()).unwrap();

    let timing_a = first.controllers[0].resolve_timing(0).unwrap();
    let timing_b = second.controllers[0].resolve_timing(0).unwrap();
    assert_eq!(timing_a, timing_b);
    assert_eq!(
        TimingMatrix::derive(&timing_a),
        TimingMatrix::derive(&timing_b)
    );
}

#[test]
fn empty_controller_list_is_rejected() {
    let file = config_file(r#"{ "controllers": [] }"#);
    assert!(matches!(
        Config::from_file(file.path()),
        Err(ConfigError::NoControllers)
    ));
}

#[test]
fn zero_geometry_counts_are_rejected_with_the_field_name() {
    let file = config_file(
        r#"{ "controllers": [{ "geometry": { "num_banks": 0 } }] }"#,
    );
    match Config::from_file(file.path()) {
        Err(ConfigError::InvalidGeometry { controller, field }) => {
            assert_eq!(controller, "mc0");
            assert_eq!(field, "num_banks");
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn unknown_profile_is_rejected_with_its_name() {
    let file = config_file(
        r#"{ "controllers": [{ "name": "fast", "timing_profile": "DDR7_9000" }] }"#,
    );
    match Config::from_file(file.path()) {
        Err(ConfigError::UnknownProfile {
            controller,
            profile,
        }) => {
            assert_eq!(controller, "fast");
            assert_eq!(profile, "DDR7_9000");
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn profile_and_explicit_timing_together_are_rejected() {
    let file = config_file(
        r#"{
            "controllers": [{
                "timing_profile": "DDR3_1600",
                "timing": { "t_rcd": 5 }
            }]
        }"#,
    );
    assert!(matches!(
        Config::from_file(file.path()),
        Err(ConfigError::AmbiguousTiming { .. })
    ));
}

#[test]
fn unreadable_and_malformed_files_are_distinguished() {
    assert!(matches!(
        Config::from_file("/no/such/config.json"),
        Err(ConfigError::Io { .. })
    ));

    let file = config_file("{ not json");
    assert!(matches!(
        Config::from_file(file.path()),
        Err(ConfigError::Parse { .. })
    ));
}
