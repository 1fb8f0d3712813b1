use crate::common::TestContext;
use predicates::prelude::*;
use serde_json::Value;

#[test]
fn test_lines_json_lists_executable_lines() {
    let ctx = TestContext::new().unwrap();
    let script = ctx.skip_forward_script();

    let output = ctx
        .command()
        .args(["lines", "--format", "json", "--source"])
        .arg(&script)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["lines"], serde_json::json!([1, 3, 6, 8, 10, 11]));
}

#[test]
fn test_lines_text_output() {
    let ctx = TestContext::new().unwrap();
    let script = ctx.skip_forward_script();

    ctx.command()
        .args(["lines", "--source"])
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("6 executable line(s)"));
}

#[test]
fn test_resolve_moves_comment_line_forward() {
    let ctx = TestContext::new().unwrap();
    let script = ctx.skip_forward_script();

    ctx.command()
        .args(["resolve", "--line", "7", "--line", "8", "--source"])
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("line 7 -> 8 (next executable line)"))
        .stdout(predicate::str::contains("line 8 -> 8"));
}

#[test]
fn test_resolve_json_reports_actual_location() {
    let ctx = TestContext::new().unwrap();
    let script = ctx.skip_forward_script();

    let output = ctx
        .command()
        .args(["resolve", "--format", "json", "--line", "4", "--source"])
        .arg(&script)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["requested"], 4);
    assert_eq!(json["actualLocation"]["line"], 6);
    assert_eq!(json["actualLocation"]["source"]["actor"], "source1");
}

#[test]
fn test_config_file_supplies_output_format() {
    let ctx = TestContext::new().unwrap();
    let script = ctx.skip_forward_script();
    ctx.create_file(".line-debug.toml", "[output]\nformat = \"json\"\n")
        .unwrap();

    ctx.command()
        .args(["lines", "--source"])
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"));
}
