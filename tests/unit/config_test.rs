//! Tests for configuration validation

use tickproc::config::{LogBackendConfig, SchedulerConfig};

#[test]
fn test_scheduler_config_defaults() {
    let config = SchedulerConfig::default();
    assert!(config.smart_phase);
    assert_eq!(config.log_capacity, 256);
    assert_eq!(config.log_backend, LogBackendConfig::Tracing);
    assert!(config.validate().is_ok());
}

#[test]
fn test_scheduler_config_valid_in_memory() {
    let config = SchedulerConfig {
        smart_phase: false,
        log_capacity: 64,
        log_backend: LogBackendConfig::InMemory,
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_scheduler_config_invalid_log_capacity() {
    let config = SchedulerConfig {
        smart_phase: true,
        log_capacity: 0,
        log_backend: LogBackendConfig::InMemory,
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_zero_log_capacity_is_fine_for_other_backends() {
    let config = SchedulerConfig {
        smart_phase: true,
        log_capacity: 0,
        log_backend: LogBackendConfig::Disabled,
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_scheduler_config_from_json() {
    let json = r#"{
        "smart_phase": false,
        "log_capacity": 32,
        "log_backend": "in_memory"
    }"#;
    let config = SchedulerConfig::from_json_str(json).unwrap();
    assert!(!config.smart_phase);
    assert_eq!(config.log_capacity, 32);
    assert_eq!(config.log_backend, LogBackendConfig::InMemory);
}

#[test]
fn test_scheduler_config_from_json_applies_defaults() {
    let config = SchedulerConfig::from_json_str("{}").unwrap();
    assert!(config.smart_phase);
    assert_eq!(config.log_backend, LogBackendConfig::Tracing);
}

#[test]
fn test_scheduler_config_from_json_rejects_invalid() {
    let json = r#"{"log_capacity": 0, "log_backend": "in_memory"}"#;
    assert!(SchedulerConfig::from_json_str(json).is_err());
}

#[test]
fn test_scheduler_config_from_json_rejects_garbage() {
    assert!(SchedulerConfig::from_json_str("not json").is_err());
}
