//! Tests for log sinks

use tickproc::core::{InMemoryLogSink, LogSink};

#[test]
fn test_in_memory_sink_records_lines_in_order() {
    let mut sink = InMemoryLogSink::new(8);
    sink.record("first".to_string());
    sink.record("second".to_string());

    assert_eq!(sink.lines(), vec!["first".to_string(), "second".to_string()]);
    assert_eq!(sink.len(), 2);
    assert!(!sink.is_empty());
}

#[test]
fn test_in_memory_sink_drops_oldest_beyond_capacity() {
    let mut sink = InMemoryLogSink::new(2);
    sink.record("a".to_string());
    sink.record("b".to_string());
    sink.record("c".to_string());

    assert_eq!(sink.lines(), vec!["b".to_string(), "c".to_string()]);
}

#[test]
fn test_in_memory_sink_clones_share_the_buffer() {
    let mut sink = InMemoryLogSink::new(4);
    let reader = sink.clone();
    sink.record("shared".to_string());

    assert_eq!(reader.lines(), vec!["shared".to_string()]);
}

#[test]
fn test_in_memory_sink_with_zero_capacity_keeps_nothing() {
    let mut sink = InMemoryLogSink::new(0);
    sink.record("dropped".to_string());

    assert!(sink.is_empty());
}

#[test]
fn test_in_memory_sink_starts_empty() {
    let sink = InMemoryLogSink::new(4);
    assert!(sink.is_empty());
    assert_eq!(sink.len(), 0);
}
