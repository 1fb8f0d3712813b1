use crate::common::TestContext;
use predicates::prelude::*;

#[test]
fn test_help_lists_subcommands() {
    let ctx = TestContext::new().unwrap();
    ctx.command()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("lines"))
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("server"))
        .stdout(predicate::str::contains("remote"));
}

#[test]
fn test_version_flag() {
    let ctx = TestContext::new().unwrap();
    ctx.command()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("line-debug"));
}

#[test]
fn test_run_help_documents_breakpoints() {
    let ctx = TestContext::new().unwrap();
    ctx.command()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--breakpoint"))
        .stdout(predicate::str::contains("--trace"))
        .stdout(predicate::str::contains("--ignore-debugger"));
}

#[test]
fn test_completions_for_bash() {
    let ctx = TestContext::new().unwrap();
    ctx.command()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("line-debug"));
}
