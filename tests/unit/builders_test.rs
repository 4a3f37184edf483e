//! Tests for builder modules

use anyhow::anyhow;
use tickproc::builders::SchedulerBuilder;
use tickproc::config::{LogBackendConfig, SchedulerConfig};
use tickproc::core::{InMemoryLogSink, ProcessSpec, SchedulerError};

#[test]
fn test_builder_defaults_produce_a_working_scheduler() {
    let mut sched = SchedulerBuilder::new().build().unwrap();
    let pid = sched.spawn(ProcessSpec::named("probe"));
    sched.tick();
    assert!(sched.is_active(pid));
}

#[test]
fn test_builder_rejects_invalid_config() {
    let config = SchedulerConfig {
        smart_phase: true,
        log_capacity: 0,
        log_backend: LogBackendConfig::InMemory,
    };
    let err = SchedulerBuilder::new().with_config(config).build();
    assert!(matches!(err, Err(SchedulerError::Config(_))));
}

#[test]
fn test_builder_applies_smart_phase_setting() {
    let config = SchedulerConfig {
        smart_phase: false,
        ..SchedulerConfig::default()
    };
    let mut sched = SchedulerBuilder::new().with_config(config).build().unwrap();

    let a = sched.spawn(ProcessSpec::new().with_period(10));
    let b = sched.spawn(ProcessSpec::new().with_period(10));
    sched.tick();
    assert_eq!(sched.counter(a), sched.counter(b), "no phase spreading");
}

#[test]
fn test_builder_custom_sink_overrides_backend() {
    let sink = InMemoryLogSink::new(8);
    let config = SchedulerConfig {
        log_backend: LogBackendConfig::Disabled,
        ..SchedulerConfig::default()
    };
    let mut sched = SchedulerBuilder::new()
        .with_config(config)
        .with_log_sink(Box::new(sink.clone()))
        .build()
        .unwrap();

    sched.spawn(ProcessSpec::named("broken").with_action(|_ctx| Err(anyhow!("boom"))));
    sched.tick();

    assert_eq!(sink.lines().len(), 1);
}

#[test]
fn test_builder_disabled_backend_swallows_errors() {
    let config = SchedulerConfig {
        log_backend: LogBackendConfig::Disabled,
        ..SchedulerConfig::default()
    };
    let mut sched = SchedulerBuilder::new().with_config(config).build().unwrap();

    let pid = sched.spawn(ProcessSpec::named("broken").with_action(|_ctx| Err(anyhow!("boom"))));
    sched.tick();

    assert!(sched.is_active(pid), "errors are dropped, not fatal");
}
