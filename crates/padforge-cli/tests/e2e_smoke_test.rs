use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_json::Value;
use tempfile::tempdir;

use padforge::PadforgeError;
use padforge_cli::{Args, run};

/// Footprints live at the workspace root, not in the crate
fn footprints_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .expect("workspace root")
        .join("footprints")
}

/// Collects all .fps files from a directory
fn collect_fps_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = match fs::read_dir(&dir) {
        Ok(entries) => entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("fps")
            })
            .collect(),
        Err(_) => Vec::new(),
    };

    files.sort();
    files
}

fn args(inputs: Vec<String>, output: &Path) -> Args {
    Args {
        inputs,
        output: Some(output.to_string_lossy().to_string()),
        config: None,
        pretty: false,
        log_level: "off".to_string(),
    }
}

fn read_json(path: &Path) -> Value {
    let text = fs::read_to_string(path).expect("output written");
    serde_json::from_str(&text).expect("output is JSON")
}

fn tags(records: &Value) -> Vec<&str> {
    records
        .as_array()
        .expect("record array")
        .iter()
        .map(|record| record["t"].as_str().expect("tagged record"))
        .collect()
}

#[test]
fn e2e_smoke_test_valid_footprints() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let footprints = collect_fps_files(footprints_dir());
    assert!(!footprints.is_empty(), "No footprints found in footprints/");

    let mut failed = Vec::new();
    for path in &footprints {
        let stem = path.file_stem().expect("file name").to_string_lossy();
        let output = temp_dir.path().join(format!("{stem}.json"));

        match run(&args(vec![path.to_string_lossy().to_string()], &output)) {
            Ok(outcome) if !outcome.has_faults() => {
                let records = read_json(&output);
                let tags = tags(&records);
                if tags.is_empty() || tags.contains(&"Error") {
                    failed.push(format!("{}: unexpected records {tags:?}", path.display()));
                }
            }
            Ok(outcome) => failed.push(format!(
                "{}: {}",
                path.display(),
                outcome.faults()[0].report()
            )),
            Err(err) => failed.push(format!("{}: {err}", path.display())),
        }
    }

    assert!(failed.is_empty(), "Valid footprints failed:\n{}", failed.join("\n"));
}

#[test]
fn e2e_smoke_test_error_footprints() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let footprints = collect_fps_files(footprints_dir().join("errors"));
    assert!(
        !footprints.is_empty(),
        "No error footprints found in footprints/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();
    for path in &footprints {
        let stem = path.file_stem().expect("file name").to_string_lossy();
        let output = temp_dir.path().join(format!("error_{stem}.json"));

        let outcome = run(&args(vec![path.to_string_lossy().to_string()], &output))
            .expect("script faults are not CLI errors");
        let records = read_json(&output);
        if !outcome.has_faults() || tags(&records) != ["Error"] {
            unexpectedly_succeeded.push(path.clone());
        }
    }

    assert!(
        unexpectedly_succeeded.is_empty(),
        "Error footprints that did not produce a single error record: {unexpectedly_succeeded:?}"
    );
}

#[test]
fn tssop_record_counts() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("tssop.json");
    let input = footprints_dir().join("TI_TSSOP_14_EP.fps");

    run(&args(vec![input.to_string_lossy().to_string()], &output)).expect("runs");
    let records = read_json(&output);
    let tags = tags(&records);

    assert_eq!(
        &tags[..6],
        ["Name", "Reference", "Fabrication", "Courtyard", "Mask", "Paste"]
    );
    assert_eq!(tags.iter().filter(|tag| **tag == "Smd").count(), 15);
    assert_eq!(tags.iter().filter(|tag| **tag == "Pad").count(), 6);
    assert_eq!(tags.iter().filter(|tag| **tag == "Line").count(), 2);

    let ep = &records[6 + 14];
    assert_eq!(ep["name"], 15);
    assert_eq!(ep["layers"], serde_json::json!(["F.Cu"]));
}

#[test]
fn several_inputs_are_keyed_by_path() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("all.json");
    let hole = footprints_dir().join("HOLE_2mm.fps");
    let broken = footprints_dir().join("errors").join("division_by_zero.fps");
    let inputs = vec![
        hole.to_string_lossy().to_string(),
        broken.to_string_lossy().to_string(),
    ];

    let outcome = run(&args(inputs.clone(), &output)).expect("runs");
    assert_eq!(outcome.evaluated(), 2);
    assert_eq!(outcome.faults().len(), 1);

    let json = read_json(&output);
    let object = json.as_object().expect("object keyed by path");
    assert_eq!(object.len(), 2);
    assert!(tags(&object[&inputs[0]]).contains(&"Hole"));
    assert_eq!(tags(&object[&inputs[1]]), ["Error"]);
    let message = object[&inputs[1]][0]["message"].as_str().expect("message");
    assert!(message.contains("division by zero"), "{message}");
}

#[test]
fn repeated_input_is_evaluated_once() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("hole.json");
    let hole = footprints_dir().join("HOLE_2mm.fps").to_string_lossy().to_string();

    let outcome = run(&args(vec![hole.clone(), hole], &output)).expect("runs");
    assert_eq!(outcome.evaluated(), 1);
    assert!(!outcome.has_faults());
    assert!(tags(&read_json(&output)).contains(&"Hole"));
}

#[test]
fn pretty_flag_and_config_errors() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("pad.json");
    let input = footprints_dir().join("PAD_10mm.fps");

    let mut pretty = args(vec![input.to_string_lossy().to_string()], &output);
    pretty.pretty = true;
    run(&pretty).expect("runs");
    let text = fs::read_to_string(&output).expect("output written");
    assert!(text.starts_with("[\n  {"), "{text}");

    let config = temp_dir.path().join("config.toml");
    fs::write(&config, "[limits]\ntimeout_ms = 0\n").expect("write config");
    let mut bad = args(vec![input.to_string_lossy().to_string()], &output);
    bad.config = Some(config.to_string_lossy().to_string());
    assert!(matches!(run(&bad), Err(PadforgeError::Config(_))));
}
