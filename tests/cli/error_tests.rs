use crate::common::TestContext;
use predicates::prelude::*;

#[test]
fn test_missing_source_file() {
    let ctx = TestContext::new().unwrap();
    ctx.command()
        .args(["lines", "--source", "does-not-exist.js"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read source file"));
}

#[test]
fn test_resolve_past_last_line_fails() {
    let ctx = TestContext::new().unwrap();
    let script = ctx.skip_forward_script();

    ctx.command()
        .args(["resolve", "--line", "12", "--source"])
        .arg(&script)
        .assert()
        .failure()
        .stdout(predicate::str::contains("No code found at or after line 12"));
}

#[test]
fn test_run_with_unplaceable_breakpoint_fails() {
    let ctx = TestContext::new().unwrap();
    let script = ctx.skip_forward_script();

    ctx.command()
        .args(["run", "--breakpoint", "40", "--source"])
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No code found"));
}

#[test]
fn test_resolve_requires_a_line() {
    let ctx = TestContext::new().unwrap();
    let script = ctx.skip_forward_script();

    ctx.command()
        .args(["resolve", "--source"])
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--line"));
}

#[test]
fn test_verbose_conflicts_with_quiet() {
    let ctx = TestContext::new().unwrap();
    ctx.command()
        .args(["-v", "-q", "lines", "--source", "x.js"])
        .assert()
        .failure();
}
