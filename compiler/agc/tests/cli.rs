// Test code uses unwrap/expect for clarity - panics provide good test failure messages
#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end tests for the `agc` commands, driven through the library
//! entry points with in-memory output streams.

use std::path::PathBuf;

use agc::commands::{
    check_file, list_file, parse_options, serialize_file, CommandResult, Failed, Options,
};
use pretty_assertions::assert_eq;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn options(flags: &[&str]) -> Options {
    let args: Vec<String> = flags.iter().map(|flag| (*flag).to_owned()).collect();
    let (options, positional) = parse_options(&args).unwrap();
    assert!(positional.is_empty());
    options
}

type Command = fn(&std::path::Path, &Options, &mut dyn std::io::Write, &mut dyn std::io::Write) -> CommandResult;

/// Run a command, returning its result with captured stdout and stderr.
fn run(command: Command, file: &str, flags: &[&str]) -> (CommandResult, String, String) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let result = command(&fixture(file), &options(flags), &mut out, &mut err);
    (
        result,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

#[test]
fn check_reports_declarations() {
    let (result, out, err) = run(check_file, "shapes.json", &[]);

    assert_eq!(result, Ok(()));
    assert!(out.starts_with("OK: "));
    // Color, Shape, Circle, Real, Unused; one area overload.
    assert!(out.contains("(5 types, 1 function, 0 warnings)"), "{out}");
    assert_eq!(err, "");
}

#[test]
fn check_fails_with_rendered_diagnostics() {
    let (result, out, err) = run(check_file, "broken.json", &["--color=never"]);

    assert_eq!(result, Err(Failed));
    assert_eq!(out, "");
    assert!(err.contains("error[E1001]"), "{err}");
    assert!(err.contains("error[E2001]"), "{err}");
    assert!(err.contains("gui.Missing"), "{err}");
    assert!(err.contains("description rejected with 2 errors"), "{err}");
}

#[test]
fn json_diagnostics_are_an_array() {
    let (result, _, err) = run(check_file, "broken.json", &["--format=json"]);

    assert_eq!(result, Err(Failed));
    let diagnostics: serde_json::Value = serde_json::from_str(&err).unwrap();
    let codes: Vec<&str> = diagnostics
        .as_array()
        .unwrap()
        .iter()
        .map(|diagnostic| diagnostic["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["E1001", "E2001"]);
}

#[test]
fn missing_file_is_reported() {
    let (result, out, err) = run(check_file, "does-not-exist.json", &[]);

    assert_eq!(result, Err(Failed));
    assert_eq!(out, "");
    assert!(err.starts_with("error: "), "{err}");
    assert!(err.contains("does-not-exist.json"), "{err}");
}

#[test]
fn list_prints_the_whole_tree() {
    let (result, out, _) = run(list_file, "shapes.json", &[]);

    assert_eq!(result, Ok(()));
    assert!(out.starts_with(" Scope"), "{out}");
    for name in ["gfx", "Color", "Red", "Shape", "area", "Circle", "Real", "Unused"] {
        assert!(out.contains(name), "missing {name} in {out}");
    }
}

#[test]
fn list_with_exports_prints_only_those_subtrees() {
    let (result, out, _) = run(list_file, "shapes.json", &["--export=gfx.Color"]);

    assert_eq!(result, Ok(()));
    assert!(out.contains("Color"));
    assert!(out.contains("Blue"));
    assert!(!out.contains("Shape"));
    assert!(!out.contains("Unused"));
}

#[test]
fn serialize_writes_only_used_entities() {
    let (result, out, err) = run(serialize_file, "shapes.json", &[]);

    assert_eq!(result, Ok(()), "{err}");
    let document: serde_json::Value = serde_json::from_str(&out).unwrap();
    let gfx = &document["root"]["children"][0];
    assert_eq!(gfx["name"], "gfx");
    let names: Vec<&str> = gfx["children"]
        .as_array()
        .unwrap()
        .iter()
        .map(|child| child["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Shape"]);
    assert_eq!(document["root"]["children"].as_array().unwrap().len(), 1);
}

#[test]
fn serialize_all_to_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("all.json");
    let output_flag = output.to_str().unwrap();

    let (result, out, err) = run(serialize_file, "shapes.json", &["--all", "-o", output_flag]);

    assert_eq!(result, Ok(()), "{err}");
    assert_eq!(out, "");
    let written = std::fs::read_to_string(&output).unwrap();
    let document: serde_json::Value = serde_json::from_str(&written).unwrap();
    let top: Vec<&str> = document["root"]["children"]
        .as_array()
        .unwrap()
        .iter()
        .map(|child| child["name"].as_str().unwrap())
        .collect();
    assert_eq!(top, vec!["gfx", "Unused"]);
    assert_eq!(document["exports"], serde_json::json!(["gfx", "Unused"]));
}

#[test]
fn serialized_output_checks_clean() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("round.json");
    let output_flag = output.to_str().unwrap();
    let (result, _, _) = run(serialize_file, "shapes.json", &["-o", output_flag]);
    assert_eq!(result, Ok(()));

    let mut out = Vec::new();
    let mut err = Vec::new();
    let result = check_file(&output, &Options::default(), &mut out, &mut err);

    assert_eq!(result, Ok(()));
    // The area overload and Shape itself survive; Color and friends do not.
    assert!(String::from_utf8(out).unwrap().contains("(1 type, 1 function, 0 warnings)"));
}
