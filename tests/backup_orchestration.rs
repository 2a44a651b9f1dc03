// tests/backup_orchestration.rs

use std::error::Error;
use std::path::Path;
use std::time::Duration;

use sysbackup::backup::run_backup;
use sysbackup::errors::BackupError;
use sysbackup::fs::mock::MockFileSystem;
use sysbackup::plan::{StepContext, StepKind};
use sysbackup_test_utils::builders::{database, BackupRequestBuilder};
use sysbackup_test_utils::fake_runner::{FakeRunner, Scripted};
use sysbackup_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

/// Target dir plus the files a successful backup would leave behind.
fn backup_fs() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_file("/backups/database.sql.gz");
    fs.add_file("/backups/assets.tar.gz");
    fs
}

#[tokio::test]
async fn sql_backup_excludes_each_ignored_table() -> TestResult {
    init_tracing();

    let fs = backup_fs();
    let runner = FakeRunner::new();
    let ctx = StepContext::new(&fs, &runner);
    let request = BackupRequestBuilder::new("/backups")
        .sql()
        .ignore_tables("sessions,logs")
        .build();

    let reports = run_backup(&ctx, &request, Some(&database("shop"))).await?;

    assert_eq!(
        runner.raw_commands(),
        vec![
            "mysqldump --host='localhost' --user='backup' --password='s3cret' \
             --ignore-table='shop.sessions' --ignore-table='shop.logs' 'shop' \
             | gzip > '/backups/database.sql.gz'"
                .to_string()
        ]
    );
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].step, StepKind::DatabaseDump);
    assert_eq!(reports[0].file, Path::new("/backups/database.sql.gz"));
    Ok(())
}

#[tokio::test]
async fn trace_line_masks_the_password() -> TestResult {
    let fs = backup_fs();
    let runner = FakeRunner::new();
    let ctx = StepContext::new(&fs, &runner);
    let request = BackupRequestBuilder::new("/backups").sql().build();

    run_backup(&ctx, &request, Some(&database("shop"))).await?;

    let call = &runner.calls()[0];
    assert!(call.display.contains("--password=***"));
    assert!(!call.display.contains("s3cret"));
    Ok(())
}

#[tokio::test]
async fn disabled_targets_produce_no_commands() -> TestResult {
    let fs = backup_fs();
    let runner = FakeRunner::new();
    let ctx = StepContext::new(&fs, &runner);
    let request = BackupRequestBuilder::new("/backups").build();

    let reports = run_backup(&ctx, &request, Some(&database("shop"))).await?;

    assert!(reports.is_empty());
    assert!(runner.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn missing_target_directory_launches_nothing() {
    let fs = MockFileSystem::new();
    let runner = FakeRunner::new();
    let ctx = StepContext::new(&fs, &runner);
    let request = BackupRequestBuilder::new("/missing").sql().assets().build();

    let err = run_backup(&ctx, &request, Some(&database("shop")))
        .await
        .unwrap_err();

    match err {
        BackupError::Precondition(msg) => {
            assert_eq!(msg, "target directory /missing does not exist")
        }
        other => panic!("expected Precondition, got {other:?}"),
    }
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn sql_backup_without_database_config_is_a_config_error() {
    let fs = backup_fs();
    let runner = FakeRunner::new();
    let ctx = StepContext::new(&fs, &runner);
    let request = BackupRequestBuilder::new("/backups").sql().assets().build();

    let err = run_backup(&ctx, &request, None).await.unwrap_err();

    assert!(matches!(err, BackupError::ConfigError(_)), "got {err:?}");
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn database_then_assets_in_order() -> TestResult {
    let fs = backup_fs();
    let runner = FakeRunner::new();
    let ctx = StepContext::new(&fs, &runner).with_timeout(Some(Duration::from_secs(120)));
    let request = BackupRequestBuilder::new("/backups").assets().sql().build();

    let reports = run_backup(&ctx, &request, Some(&database("shop"))).await?;

    let steps: Vec<_> = reports.iter().map(|r| r.step).collect();
    assert_eq!(steps, vec![StepKind::DatabaseDump, StepKind::AssetArchive]);

    let calls = runner.calls();
    assert!(calls[0].raw.starts_with("mysqldump "));
    assert_eq!(calls[1].raw, "tar -czf '/backups/assets.tar.gz' -- '.'");
    assert!(calls.iter().all(|c| c.timeout == Some(Duration::from_secs(120))));
    Ok(())
}

#[tokio::test]
async fn failed_dump_skips_the_asset_step() {
    let fs = backup_fs();
    let runner = FakeRunner::scripted([Scripted::fail(2, "mysqldump: Got error: 1049: Unknown database 'shop'\n")]);
    let ctx = StepContext::new(&fs, &runner);
    let request = BackupRequestBuilder::new("/backups").sql().assets().build();

    let err = run_backup(&ctx, &request, Some(&database("shop")))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "mysqldump: Got error: 1049: Unknown database 'shop'\n");
    assert_eq!(runner.calls().len(), 1);
}

#[tokio::test]
async fn zero_exit_without_output_file_fails() {
    let fs = MockFileSystem::new();
    fs.add_dir("/backups");
    let runner = FakeRunner::new();
    let ctx = StepContext::new(&fs, &runner);
    let request = BackupRequestBuilder::new("/backups").sql().build();

    let err = run_backup(&ctx, &request, Some(&database("shop")))
        .await
        .unwrap_err();

    match err {
        BackupError::MissingOutput(path) => assert_eq!(path, Path::new("/backups/database.sql.gz")),
        other => panic!("expected MissingOutput, got {other:?}"),
    }
}

#[tokio::test]
async fn asset_change_dir_must_exist() {
    let fs = backup_fs();
    let runner = FakeRunner::new();
    let ctx = StepContext::new(&fs, &runner);
    let request = BackupRequestBuilder::new("/backups").assets().change_dir("web").build();

    let err = run_backup(&ctx, &request, None).await.unwrap_err();

    match err {
        BackupError::Precondition(msg) => assert_eq!(msg, "directory /srv/app/web does not exist"),
        other => panic!("expected Precondition, got {other:?}"),
    }
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn asset_options_are_forwarded_to_tar() -> TestResult {
    let fs = backup_fs();
    fs.add_dir("/srv/app/web");
    let runner = FakeRunner::new();
    let ctx = StepContext::new(&fs, &runner);
    let request = BackupRequestBuilder::new("/backups")
        .assets()
        .change_dir("web")
        .dereference()
        .asset_source("uploads")
        .asset_source("media; rm -rf ~")
        .build();

    run_backup(&ctx, &request, None).await?;

    assert_eq!(
        runner.raw_commands(),
        vec![
            "tar --dereference --directory '/srv/app/web' -czf '/backups/assets.tar.gz' \
             -- 'uploads' 'media; rm -rf ~'"
                .to_string()
        ]
    );
    Ok(())
}

#[tokio::test]
async fn timeout_from_runner_propagates() {
    let fs = backup_fs();
    let runner = FakeRunner::scripted([Scripted::TimeOut]);
    let ctx = StepContext::new(&fs, &runner).with_timeout(Some(Duration::from_secs(5)));
    let request = BackupRequestBuilder::new("/backups").assets().build();

    let err = run_backup(&ctx, &request, None).await.unwrap_err();

    assert!(matches!(err, BackupError::Timeout { .. }), "got {err:?}");
}
