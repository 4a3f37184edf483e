//! Tests for error types

use tickproc::core::{Pid, ProcessSpec, Scheduler, SchedulerError};

fn some_pid() -> Pid {
    Scheduler::new().spawn(ProcessSpec::new())
}

#[test]
fn test_dead_process_error() {
    let err = SchedulerError::DeadProcess("docking".to_string());
    assert_eq!(format!("{}", err), "process docking is dead");
}

#[test]
fn test_unknown_process_error() {
    let pid = some_pid();
    let err = SchedulerError::UnknownProcess(pid);
    assert_eq!(format!("{}", err), format!("unknown process {pid}"));
}

#[test]
fn test_serialize_error() {
    let err = SchedulerError::Serialize("key must be a string".to_string());
    assert_eq!(format!("{}", err), "serialization failed: key must be a string");
}

#[test]
fn test_config_error() {
    let err = SchedulerError::Config("log_capacity must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: log_capacity must be greater than 0"
    );
}

#[test]
fn test_errors_convert_into_anyhow() {
    let err: anyhow::Error = SchedulerError::DeadProcess("drill".to_string()).into();
    assert!(err.to_string().contains("drill"));
}
