//! FFmpeg-backed inspection tests.
//!
//! Tests that need a media file skip themselves when the fixture is missing.

#![cfg(feature = "ffmpeg")]

use std::path::Path;
use std::process::Command;

use probe_json::{
    ContainerInspector, FfmpegInspector, MediaType, Outcome, ProbeError, ProbeOptions,
    render_document,
};
use serde_json::Value;

const SAMPLE_VIDEO: &str = "tests/fixtures/sample_video.mp4";
const SAMPLE_WITH_CHAPTERS: &str = "tests/fixtures/sample_chapters.mkv";

fn inspector() -> FfmpegInspector {
    FfmpegInspector::new().expect("FFmpeg should initialise")
}

#[test]
fn nonexistent_file_produces_error_document() {
    let (outcome, text) = render_document(
        &inspector(),
        "this_file_does_not_exist.mp4",
        &ProbeOptions::new(),
    )
    .expect("render");

    assert!(matches!(outcome, Outcome::Failure(ProbeError::Open { code: -2, .. })));
    assert_eq!(
        text,
        "{\n    \"error\": {\n        \"code\": -2,\n        \"string\": \"No such file or directory\"\n    }\n}\n"
    );
}

#[test]
fn garbage_file_is_a_probe_failure() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let invalid_file_path = temporary_directory.path().join("invalid.mp4");
    std::fs::write(&invalid_file_path, b"this is not a media file")
        .expect("Failed to write invalid file");

    let url = invalid_file_path.to_string_lossy();
    let (outcome, text) =
        render_document(&inspector(), &url, &ProbeOptions::new()).expect("render");
    assert!(!outcome.is_success());

    let document: Value = serde_json::from_str(&text).expect("valid JSON");
    assert!(document["error"]["code"].as_i64().unwrap() < 0);
    assert!(!document["error"]["string"].as_str().unwrap().is_empty());
}

#[test]
fn sample_video_document() {
    if !Path::new(SAMPLE_VIDEO).exists() {
        return;
    }

    let inspector = inspector();
    let container = inspector.inspect(SAMPLE_VIDEO).expect("probe sample");
    assert!(!container.streams.is_empty());
    assert!(
        container
            .streams
            .iter()
            .any(|stream| stream.media_type() == MediaType::Video)
    );

    let (outcome, text) =
        render_document(&inspector, SAMPLE_VIDEO, &ProbeOptions::new()).expect("render");
    assert!(outcome.is_success());

    let document: Value = serde_json::from_str(&text).expect("valid JSON");
    assert_eq!(document["format"]["filename"], SAMPLE_VIDEO);
    assert_eq!(
        document["format"]["nb_streams"],
        container.streams.len() as u64
    );
    for (index, stream) in document["streams"].as_array().unwrap().iter().enumerate() {
        assert_eq!(stream["index"], index as u64);
        assert_eq!(stream["disposition"].as_object().unwrap().len(), 18);
        assert!(stream["time_base"].as_str().unwrap().contains('/'));
    }

    let video = document["streams"]
        .as_array()
        .unwrap()
        .iter()
        .find(|stream| stream["codec_type"] == "video")
        .unwrap();
    assert!(video["width"].as_i64().unwrap() > 0);
    assert!(video["codec_name"].is_string());
}

#[test]
fn sample_chapters_are_listed() {
    if !Path::new(SAMPLE_WITH_CHAPTERS).exists() {
        return;
    }

    let (_, text) = render_document(&inspector(), SAMPLE_WITH_CHAPTERS, &ProbeOptions::new())
        .expect("render");
    let document: Value = serde_json::from_str(&text).expect("valid JSON");
    let chapters = document["chapters"].as_array().unwrap();
    assert!(!chapters.is_empty());
    for chapter in chapters {
        assert!(chapter["start"].as_i64().unwrap() <= chapter["end"].as_i64().unwrap());
    }
}

// ── Binary ─────────────────────────────────────────────────────────

#[test]
fn binary_writes_error_document_and_fails() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let output_path = temporary_directory.path().join("probe.json");

    let status = Command::new(env!("CARGO_BIN_EXE_probe-json"))
        .arg("this_file_does_not_exist.mp4")
        .arg("--output")
        .arg(&output_path)
        .arg("--log-level")
        .arg("quiet")
        .status()
        .expect("run probe-json");
    assert_eq!(status.code(), Some(1));

    let text = std::fs::read_to_string(&output_path).expect("read output");
    let document: Value = serde_json::from_str(&text).expect("valid JSON");
    assert_eq!(document["error"]["code"], -2);
}

#[test]
fn binary_rejects_empty_selection() {
    let output = Command::new(env!("CARGO_BIN_EXE_probe-json"))
        .args(["input.mp4", "--no-streams", "--no-chapters", "--no-format"])
        .output()
        .expect("run probe-json");
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("error:"));
}
