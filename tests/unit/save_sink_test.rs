//! Tests for the save sink document model

use serde::Serialize;
use tickproc::infra::SaveSink;

#[test]
fn test_set_and_get_round_trip() {
    let mut sink = SaveSink::new();
    sink.set("nav", "heading", 180_u32).unwrap();

    assert_eq!(sink.get("nav", "heading"), Some(&serde_json::json!(180)));
    assert_eq!(sink.get("nav", "missing"), None);
    assert_eq!(sink.get("missing", "heading"), None);
}

#[test]
fn test_structured_values_are_stored_as_json() {
    #[derive(Serialize)]
    struct Waypoint {
        x: f64,
        y: f64,
    }

    let mut sink = SaveSink::new();
    sink.set("nav", "target", Waypoint { x: 1.5, y: -2.0 }).unwrap();

    assert_eq!(
        sink.get("nav", "target"),
        Some(&serde_json::json!({"x": 1.5, "y": -2.0}))
    );
}

#[test]
fn test_render_and_from_rendered_preserve_sections() {
    let mut sink = SaveSink::new();
    sink.set("nav", "heading", 90_u32).unwrap();
    sink.set("cargo", "mass_kg", 1250_u32).unwrap();

    let rendered = sink.render().unwrap();
    let restored = SaveSink::from_rendered(&rendered).unwrap();

    assert_eq!(restored.get("nav", "heading"), Some(&serde_json::json!(90)));
    assert_eq!(
        restored.get("cargo", "mass_kg"),
        Some(&serde_json::json!(1250))
    );
}

#[test]
fn test_from_rendered_rejects_malformed_input() {
    assert!(SaveSink::from_rendered("nope").is_err());
}

#[test]
fn test_empty_sink_renders_an_empty_document() {
    let sink = SaveSink::new();
    assert!(sink.is_empty());
    assert_eq!(sink.render().unwrap(), "{}");
}

#[test]
fn test_overwriting_a_key_keeps_the_latest_value() {
    let mut sink = SaveSink::new();
    sink.set("nav", "heading", 10_u32).unwrap();
    sink.set("nav", "heading", 20_u32).unwrap();

    assert_eq!(sink.get("nav", "heading"), Some(&serde_json::json!(20)));
}
