// tests/process_tests.rs
//
// Runs real processes through `/bin/sh`, so these only build on unix.

#![cfg(unix)]

use std::path::Path;
use std::time::{Duration, Instant};

use tempfile::tempdir;
use xrdbatch::errors::BatchError;
use xrdbatch::exec::run_tool;
use xrdbatch_test_utils::init_tracing;

const SH: &str = "/bin/sh";

fn write_script(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path
}

#[tokio::test]
async fn captures_both_streams_and_exit_code() {
    init_tracing();
    let dir = tempdir().unwrap();
    let script = write_script(dir.path(), "ok.sh", "echo fitted\necho warning >&2\n");

    let out = run_tool(Path::new(SH), &script, Duration::from_secs(10))
        .await
        .unwrap();

    assert_eq!(out.stdout_string(), "fitted\n");
    assert_eq!(out.stderr_string(), "warning\n");
    assert_eq!(out.exit_code, Some(0));
    assert!(out.succeeded());
}

#[tokio::test]
async fn non_zero_exit_is_not_an_error() {
    init_tracing();
    let dir = tempdir().unwrap();
    let script = write_script(dir.path(), "fail.sh", "echo bad >&2\nexit 3\n");

    let out = run_tool(Path::new(SH), &script, Duration::from_secs(10))
        .await
        .unwrap();

    assert_eq!(out.exit_code, Some(3));
    assert!(!out.timed_out);
    assert!(!out.succeeded());
}

#[tokio::test]
async fn slow_tool_is_killed_at_the_timeout() {
    init_tracing();
    let dir = tempdir().unwrap();
    let script = write_script(dir.path(), "slow.sh", "echo started\nexec sleep 30\n");

    let started = Instant::now();
    let out = run_tool(Path::new(SH), &script, Duration::from_millis(300))
        .await
        .unwrap();

    assert!(out.timed_out);
    assert_eq!(out.exit_code, None);
    assert_eq!(out.stdout_string(), "started\n");
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn missing_program_fails_to_start() {
    init_tracing();
    let dir = tempdir().unwrap();
    let script = write_script(dir.path(), "any.inp", "xdd \"a.raw\"\n");

    let err = run_tool(&dir.path().join("no-such-tool"), &script, Duration::from_secs(1))
        .await
        .unwrap_err();

    assert!(matches!(err, BatchError::Process(_)), "got {err:?}");
}
