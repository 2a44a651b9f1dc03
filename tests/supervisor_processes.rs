// tests/supervisor_processes.rs
//
// Runs real child processes through the supervisor (needs `bash`, `sleep`
// and `gzip`, and `/proc` to check on pids).

use std::error::Error;
use std::path::Path;
use std::time::{Duration, Instant};

use sysbackup::errors::BackupError;
use sysbackup::exec::{CommandSpec, ProcessSupervisor, ShellCommand, POLL_INTERVAL};
use sysbackup_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn fast() -> ProcessSupervisor {
    ProcessSupervisor::with_poll_interval(Duration::from_millis(50))
}

/// Whether `pid` is a live (non-zombie) process.
fn is_running(pid: &str) -> bool {
    let Ok(stat) = std::fs::read_to_string(format!("/proc/{pid}/stat")) else {
        return false;
    };
    // The state letter follows the parenthesised command name.
    let state = stat.rsplit_once(')').and_then(|(_, rest)| rest.trim_start().chars().next());
    !matches!(state, Some('Z') | Some('X') | None)
}

/// Give the kernel a moment to deliver the signal before declaring a survivor.
async fn assert_dead(pid_file: &Path) -> TestResult {
    let pid = std::fs::read_to_string(pid_file)?.trim().to_string();
    for _ in 0..40 {
        if !is_running(&pid) {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("process {pid} survived its timeout");
}

#[tokio::test]
async fn timeout_is_enforced_within_one_poll_interval() {
    init_tracing();

    let supervisor = ProcessSupervisor::new();
    let timeout = Duration::from_secs(1);
    let spec = CommandSpec::argv("sleep", ["30"]).with_timeout(Some(timeout));

    let started = Instant::now();
    let err = with_timeout(supervisor.execute(spec)).await.unwrap_err();
    let elapsed = started.elapsed();

    match err {
        BackupError::Timeout { timeout: t, command } => {
            assert_eq!(t, timeout);
            assert_eq!(command, "'sleep' '30'");
        }
        other => panic!("expected Timeout, got {other:?}"),
    }
    assert!(elapsed >= timeout, "gave up early: {elapsed:?}");
    // One poll interval past the deadline, plus slack for a loaded machine.
    assert!(
        elapsed <= timeout + POLL_INTERVAL + Duration::from_millis(750),
        "timeout detected too late: {elapsed:?}"
    );
}

#[tokio::test]
async fn timed_out_child_is_killed() -> TestResult {
    let dir = tempfile::tempdir()?;
    let pid_file = dir.path().join("pid");
    let script = format!("echo $$ > '{}'; exec sleep 30", pid_file.display());

    let spec = CommandSpec::shell(script).with_timeout(Some(Duration::from_millis(300)));

    let err = with_timeout(fast().execute(spec)).await.unwrap_err();
    assert!(matches!(err, BackupError::Timeout { .. }), "got {err:?}");

    assert_dead(&pid_file).await
}

#[tokio::test]
async fn timed_out_pipeline_members_are_killed() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let pid_file = dir.path().join("pid");
    let first_stage = format!("echo $$ > '{}'; exec sleep 30", pid_file.display());
    let spec = ShellCommand::new("sh")
        .flag("-c")
        .arg(&first_stage)
        .pipe(ShellCommand::new("gzip").stdout_to(&dir.path().join("out.gz")))
        .into_spec(Some(Duration::from_millis(300)));

    let err = with_timeout(fast().execute(spec)).await.unwrap_err();

    assert!(matches!(err, BackupError::Timeout { .. }), "got {err:?}");
    assert_dead(&pid_file).await
}

#[tokio::test]
async fn failing_first_stage_fails_the_pipeline() -> TestResult {
    let dir = tempfile::tempdir()?;
    let spec = ShellCommand::new("sh")
        .flag("-c")
        .arg("echo 'mysqldump: Got error: 2003: Can not connect' >&2; exit 2")
        .pipe(ShellCommand::new("gzip").stdout_to(&dir.path().join("database.sql.gz")))
        .into_spec(None);

    let err = with_timeout(fast().execute(spec)).await.unwrap_err();

    match err {
        BackupError::Execution { exit_code, stderr } => {
            assert_eq!(exit_code, Some(2));
            assert_eq!(stderr, "mysqldump: Got error: 2003: Can not connect\n");
        }
        other => panic!("expected Execution, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn missing_first_stage_tool_fails_the_pipeline() {
    let spec = ShellCommand::new("definitely-not-mysqldump-4821")
        .pipe(ShellCommand::new("gzip"))
        .into_spec(None);

    let err = with_timeout(fast().execute(spec)).await.unwrap_err();

    match err {
        BackupError::Execution { exit_code, stderr } => {
            assert_eq!(exit_code, Some(127));
            assert!(stderr.contains("definitely-not-mysqldump-4821"), "stderr: {stderr}");
        }
        other => panic!("expected Execution, got {other:?}"),
    }
}

#[tokio::test]
async fn background_process_holding_the_pipes_cannot_outlast_the_timeout() -> TestResult {
    let dir = tempfile::tempdir()?;
    let pid_file = dir.path().join("pid");
    let script = format!("sleep 30 & echo $! > '{}'; echo started", pid_file.display());
    let spec = CommandSpec::shell(script).with_timeout(Some(Duration::from_millis(500)));

    let started = Instant::now();
    let err = with_timeout(fast().execute(spec)).await.unwrap_err();

    assert!(matches!(err, BackupError::Timeout { .. }), "got {err:?}");
    assert!(started.elapsed() < Duration::from_secs(5), "took {:?}", started.elapsed());
    assert_dead(&pid_file).await
}

#[tokio::test]
async fn no_timeout_waits_for_natural_exit() -> TestResult {
    let spec = CommandSpec::shell("sleep 0.3; echo done").with_timeout(None);

    let result = with_timeout(fast().execute(spec)).await?;

    assert!(result.success);
    assert_eq!(result.stdout, "done\n");
    Ok(())
}

#[tokio::test]
async fn fast_command_under_a_generous_timeout_succeeds() -> TestResult {
    let spec = CommandSpec::shell("echo ok").with_timeout(Some(Duration::from_secs(30)));

    let result = with_timeout(fast().execute(spec)).await?;

    assert_eq!(result.stdout, "ok\n");
    Ok(())
}

#[tokio::test]
async fn failing_command_reports_stderr_verbatim() {
    let spec = CommandSpec::shell("echo 'gzip: stdin: not in gzip format' >&2; exit 1");

    let err = with_timeout(fast().execute(spec)).await.unwrap_err();

    assert_eq!(err.to_string(), "gzip: stdin: not in gzip format\n");
}
