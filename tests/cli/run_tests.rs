use crate::common::TestContext;
use predicates::prelude::*;
use serde_json::Value;

fn json_lines(stdout: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_run_reports_debugger_statement_then_breakpoint() {
    let ctx = TestContext::new().unwrap();
    let script = ctx.skip_forward_script();

    let output = ctx
        .command()
        .args([
            "run",
            "--format",
            "json",
            "--breakpoint",
            "7",
            "--trace",
            "1,10,11,3,6,8",
            "--source",
        ])
        .arg(&script)
        .output()
        .unwrap();
    assert!(output.status.success());

    let events = json_lines(&output.stdout);
    let kinds: Vec<&str> = events.iter().map(|e| e["type"].as_str().unwrap()).collect();
    assert_eq!(kinds, vec!["newSource", "paused", "paused", "exited"]);

    assert_eq!(events[1]["why"]["type"], "debuggerStatement");
    assert_eq!(events[1]["frame"]["where"]["line"], 10);

    assert_eq!(events[2]["why"]["type"], "breakpoint");
    assert_eq!(events[2]["why"]["actors"], serde_json::json!(["breakpoint1"]));
    assert_eq!(events[2]["frame"]["where"]["line"], 8);
}

#[test]
fn test_run_text_output() {
    let ctx = TestContext::new().unwrap();
    let script = ctx.skip_forward_script();

    ctx.command()
        .args(["run", "--breakpoint", "7", "--source"])
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("requested line 7"))
        .stdout(predicate::str::contains(
            "Paused at source1:8 (breakpoint breakpoint1)",
        ))
        .stdout(predicate::str::contains(
            "Paused at source1:10 (debugger statement)",
        ))
        .stdout(predicate::str::contains("Execution finished (2 pause(s))"));
}

#[test]
fn test_run_ignoring_debugger_statements() {
    let ctx = TestContext::new().unwrap();
    let script = ctx.skip_forward_script();

    ctx.command()
        .args(["run", "--ignore-debugger", "--source"])
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Paused").not())
        .stdout(predicate::str::contains("Execution finished (0 pause(s))"));
}
