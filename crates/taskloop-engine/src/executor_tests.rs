use super::*;
use std::path::Path;
use std::time::Duration;

use tempfile::TempDir;

use crate::recorder::MemoryRecorder;

fn test_config(overlap: OverlapPolicy, max_pending: usize) -> EngineConfig {
    EngineConfig {
        overlap,
        max_pending,
        shell: "sh".to_string(),
    }
}

fn create_executor(overlap: OverlapPolicy, max_pending: usize) -> (Executor, Arc<MemoryRecorder>) {
    let recorder = Arc::new(MemoryRecorder::new());
    let executor = Executor::new(&test_config(overlap, max_pending), recorder.clone());
    (executor, recorder)
}

fn write_script(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path.to_string_lossy().into_owned()
}

fn task(identity: &str) -> Task {
    Task::new(identity, Duration::from_millis(100)).unwrap()
}

#[test]
fn test_command_splits_arguments() {
    let (executor, _) = create_executor(OverlapPolicy::Block, 0);
    let cmd = executor.command(&task("ping -c3 host")).unwrap();
    let std_cmd = cmd.as_std();
    assert_eq!(std_cmd.get_program(), "ping");
    let args: Vec<String> = std_cmd
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    assert_eq!(args, vec!["-c3", "host"]);
}

#[test]
fn test_command_runs_script_through_shell() {
    let (executor, _) = create_executor(OverlapPolicy::Block, 0);
    let cmd = executor.command(&task("/opt/jobs/backup.sh")).unwrap();
    let std_cmd = cmd.as_std();
    assert_eq!(std_cmd.get_program(), "sh");
    let args: Vec<String> = std_cmd
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    assert_eq!(args, vec!["/opt/jobs/backup.sh"]);
}

#[tokio::test]
async fn test_run_echo_success() {
    let (executor, _) = create_executor(OverlapPolicy::Block, 0);
    let record = executor.run(&task("echo hello")).await;

    assert!(record.is_success());
    assert_eq!(record.detail, "hello\n");
    assert_eq!(record.exit_code, Some(0));
    assert_eq!(record.task, "echo hello");
    assert_eq!(record.kind, TaskKind::Command);
    assert!(record.finished_at >= record.started_at);
}

#[tokio::test]
async fn test_run_non_zero_exit() {
    let (executor, _) = create_executor(OverlapPolicy::Block, 0);
    let record = executor.run(&task("false")).await;

    assert_eq!(record.outcome, Outcome::Failure);
    assert_eq!(record.exit_code, Some(1));
    assert!(record.detail.contains("exited with status 1"));
}

#[tokio::test]
async fn test_run_missing_program() {
    let (executor, _) = create_executor(OverlapPolicy::Block, 0);
    let record = executor.run(&task("definitely-not-a-real-program-42 --flag")).await;

    assert_eq!(record.outcome, Outcome::Failure);
    assert_eq!(record.exit_code, None);
    assert!(record.detail.contains("failed to start"));
}

#[tokio::test]
async fn test_run_script_success() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "greet.sh", "echo from-script\n");
    let (executor, _) = create_executor(OverlapPolicy::Block, 0);

    let record = executor.run(&task(&script)).await;
    assert!(record.is_success());
    assert_eq!(record.kind, TaskKind::ShellScript);
    assert!(record.detail.contains("from-script"));
}

#[tokio::test]
async fn test_run_script_failure_keeps_stderr() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        dir.path(),
        "broken.sh",
        "echo partial\necho disk full >&2\nexit 3\n",
    );
    let (executor, _) = create_executor(OverlapPolicy::Block, 0);

    let record = executor.run(&task(&script)).await;
    assert_eq!(record.outcome, Outcome::Failure);
    assert_eq!(record.exit_code, Some(3));
    assert!(record.detail.contains("exited with status 3"));
    assert!(record.detail.contains("disk full"));
    assert!(record.detail.contains("partial"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_killed_process() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "suicide.sh", "kill -9 $$\n");
    let (executor, _) = create_executor(OverlapPolicy::Block, 0);

    let record = executor.run(&task(&script)).await;
    assert_eq!(record.outcome, Outcome::Failure);
    assert_eq!(record.exit_code, None);
    assert!(record.detail.contains("killed by signal 9"));
}

#[tokio::test]
async fn test_execute_records_exactly_once() {
    let (executor, recorder) = create_executor(OverlapPolicy::Block, 0);
    let task = task("echo once");
    let metrics = TaskMetrics::new(task.identity());

    let record = executor.execute(&task, &metrics).await.unwrap();
    assert!(record.is_success());
    assert_eq!(recorder.len(), 1);
    assert_eq!(recorder.records()[0].run_id, record.run_id);

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.started, 1);
    assert_eq!(snapshot.succeeded, 1);
    assert_eq!(snapshot.in_flight, 0);
    assert!(!task.is_running());
}

#[tokio::test]
async fn test_execute_releases_lock_after_failure() {
    let (executor, recorder) = create_executor(OverlapPolicy::Skip, 0);
    let task = task("false");
    let metrics = TaskMetrics::new(task.identity());

    assert!(executor.execute(&task, &metrics).await.is_some());
    assert!(!task.is_running());
    assert!(executor.execute(&task, &metrics).await.is_some());

    assert_eq!(recorder.count("false", Outcome::Failure), 2);
    assert_eq!(metrics.snapshot().failed, 2);
}

#[tokio::test]
async fn test_execute_skips_when_busy() {
    let (executor, recorder) = create_executor(OverlapPolicy::Skip, 0);
    let task = task("echo skipped");
    let metrics = TaskMetrics::new(task.identity());

    let _held = task.acquire(OverlapPolicy::Block, 0).await.unwrap();
    assert!(executor.execute(&task, &metrics).await.is_none());

    assert!(recorder.is_empty());
    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.skipped, 1);
    assert_eq!(snapshot.started, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_execute_serializes_overlapping_runs() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "slow.sh", "sleep 0.2\necho done\n");
    let (executor, recorder) = create_executor(OverlapPolicy::Block, 0);
    let executor = Arc::new(executor);
    let task = Arc::new(task(&script));
    let metrics = Arc::new(TaskMetrics::new(task.identity()));

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let (executor, task, metrics) = (executor.clone(), task.clone(), metrics.clone());
            tokio::spawn(async move { executor.execute(&task, &metrics).await })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_some());
    }

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.started, 3);
    assert_eq!(snapshot.max_in_flight, 1);
    assert_eq!(recorder.count(&script, Outcome::Success), 3);

    let mut records = recorder.records();
    records.sort_by_key(|r| r.started_at);
    for pair in records.windows(2) {
        assert!(pair[0].finished_at <= pair[1].started_at);
    }
}
