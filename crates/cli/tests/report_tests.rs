//! Integration tests for the read / analyze / write cycle.
//!
//! Each test writes a frame sequence to a temporary directory, runs the
//! pipeline against it, and inspects the JSON documents produced.

use assert_matches::assert_matches;
use racelog_cli::config::{CliConfig, Stream};
use racelog_cli::error::CliError;
use racelog_cli::report::{read_frames, run};
use racelog_core::analysis::AnalysisConfig;
use racelog_core::error::CoreError;
use serde_json::{json, Value};

fn config_for(dir: &tempfile::TempDir, frames: Value, analysis: AnalysisConfig) -> CliConfig {
    let input = dir.path().join("frames.json");
    std::fs::write(&input, frames.to_string()).expect("write input");
    CliConfig {
        input: Stream::File(input),
        output: Stream::File(dir.path().join("races.json")),
        frames_output: Some(Stream::File(dir.path().join("repaired.json"))),
        analysis,
    }
}

fn read_json(dir: &tempfile::TempDir, name: &str) -> Value {
    let raw = std::fs::read_to_string(dir.path().join(name)).expect("read output");
    serde_json::from_str(&raw).expect("output is JSON")
}

/// Two races separated by a long menu stretch, the first with a short
/// classifier dropout.
fn two_race_session() -> Value {
    let mut frames = Vec::new();
    for i in 0..6 {
        frames.push(json!({"timestamp": i, "scene": "in_race", "position": 6 - i, "coins": i}));
    }
    for i in 6..8 {
        frames.push(json!({"timestamp": i, "scene": "not_in_race", "position": null}));
    }
    frames.push(json!({"timestamp": 8, "scene": "in_race", "position": 1, "events": ["shock"]}));
    for i in 9..20 {
        frames.push(json!({"timestamp": i, "scene": "not_in_race"}));
    }
    for i in 20..24 {
        frames.push(json!({"timestamp": i, "scene": "in_race", "position": "x", "coins": 10}));
    }
    Value::Array(frames)
}

// ---------------------------------------------------------------------------
// Test: report and repaired frames are written
// ---------------------------------------------------------------------------

#[test]
fn writes_report_and_repaired_frames() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir, two_race_session(), AnalysisConfig::default());

    let report = run(&config).expect("pipeline should succeed");
    assert_eq!(report.imputed, 2);

    let races = read_json(&dir, "races.json");
    assert_eq!(races["frame_count"], 24);
    assert_eq!(races["imputed"], 2);
    assert_eq!(races["status"], "2 race(s) from 24 frames (2 imputed)");
    assert_eq!(races["races"].as_array().unwrap().len(), 2);

    let first = &races["races"][0];
    assert_eq!(first["race_number"], 1);
    assert_eq!(first["total_frames"], 9);
    assert_eq!(first["in_race_frames"], 9);
    assert_eq!(first["final_position"], 1);
    assert_eq!(first["best_position"], 1);
    assert_eq!(first["worst_position"], 6);

    let second = &races["races"][1];
    assert_eq!(second["race_number"], 2);
    assert!(second["best_position"].is_null());
    assert_eq!(second["final_coins"], 10);
    assert_eq!(second["duration"], 3.0);

    assert_eq!(races["summary"]["races"], 2);
    assert_eq!(races["summary"]["wins"], 1);
    assert_eq!(races["labels"]["in_race"], 13);

    let repaired = read_json(&dir, "repaired.json");
    assert_eq!(repaired[6]["scene"], "in_race");
    assert_eq!(repaired[7]["scene"], "in_race");
    assert_eq!(repaired[6]["position"], 1);
    assert_eq!(repaired[7]["position"], 1);
    assert_eq!(repaired[21]["position"], "x");
}

// ---------------------------------------------------------------------------
// Test: imputation can be skipped
// ---------------------------------------------------------------------------

#[test]
fn skip_imputation_leaves_frames_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let analysis = AnalysisConfig {
        skip_imputation: true,
        ..AnalysisConfig::default()
    };
    let config = config_for(&dir, two_race_session(), analysis);

    let report = run(&config).unwrap();

    assert_eq!(report.imputed, 0);
    assert_eq!(report.races.len(), 2);
    assert_eq!(report.races[0].in_race_frames, 7);
    let repaired = read_json(&dir, "repaired.json");
    assert_eq!(repaired[6]["scene"], "not_in_race");
}

// ---------------------------------------------------------------------------
// Test: no races is not an error
// ---------------------------------------------------------------------------

#[test]
fn menu_only_session_reports_no_races() {
    let dir = tempfile::tempdir().unwrap();
    let frames = json!([
        {"timestamp": 0, "scene": "not_in_race"},
        {"timestamp": 1, "scene": null},
    ]);
    let config = config_for(&dir, frames, AnalysisConfig::default());

    let report = run(&config).unwrap();

    assert!(report.races.is_empty());
    assert_eq!(read_json(&dir, "races.json")["summary"]["avg_finish"], Value::Null);
}

// ---------------------------------------------------------------------------
// Test: input errors
// ---------------------------------------------------------------------------

#[test]
fn missing_input_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = read_frames(&Stream::File(dir.path().join("absent.json")));
    assert_matches!(result, Err(CliError::Io { .. }));
}

#[test]
fn malformed_input_is_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frames.json");
    std::fs::write(&path, r#"[{"timestamp": 0, "scene": "racing"}]"#).unwrap();

    let result = read_frames(&Stream::File(path));

    assert_matches!(result, Err(CliError::Core(CoreError::Decode(_))));
}
