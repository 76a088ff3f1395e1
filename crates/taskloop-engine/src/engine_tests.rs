use super::*;
use std::time::Duration;

use taskloop_config::OverlapPolicy;

use crate::recorder::MemoryRecorder;
use crate::task::TaskKind;

fn test_config() -> EngineConfig {
    EngineConfig {
        overlap: OverlapPolicy::Block,
        max_pending: 0,
        shell: "sh".to_string(),
    }
}

fn recorder() -> Arc<MemoryRecorder> {
    Arc::new(MemoryRecorder::new())
}

#[test]
fn test_new_empty_task_set() {
    let result = Engine::new(Vec::new(), test_config(), recorder());
    assert!(matches!(result, Err(EngineError::EmptyTaskSet)));
}

#[test]
fn test_new_zero_interval() {
    let specs = vec![
        TaskSpec::new("echo ok", Duration::from_secs(1)),
        TaskSpec::new("echo bad", Duration::ZERO),
    ];
    match Engine::new(specs, test_config(), recorder()) {
        Err(EngineError::NonPositiveInterval { task, .. }) => assert_eq!(task, "echo bad"),
        other => panic!("Expected NonPositiveInterval, got {:?}", other.err()),
    }
}

#[test]
fn test_new_blank_identity() {
    let specs = vec![TaskSpec::new("  ", Duration::from_secs(1))];
    assert!(matches!(
        Engine::new(specs, test_config(), recorder()),
        Err(EngineError::EmptyIdentity)
    ));
}

#[test]
fn test_new_invalid_config() {
    let config = EngineConfig {
        shell: String::new(),
        ..test_config()
    };
    let specs = vec![TaskSpec::new("echo ok", Duration::from_secs(1))];
    assert!(matches!(
        Engine::new(specs, config, recorder()),
        Err(EngineError::Config(_))
    ));
}

#[test]
fn test_new_builds_one_loop_per_task() {
    let specs = vec![
        TaskSpec::new("echo a", Duration::from_secs(1)),
        TaskSpec::new("job.sh", Duration::from_secs(2)),
        TaskSpec::new("echo a", Duration::from_secs(3)),
    ];
    let engine = Engine::new(specs, test_config(), recorder()).unwrap();

    assert_eq!(engine.task_count(), 3);
    let kinds: Vec<TaskKind> = engine.tasks().map(|t| t.kind()).collect();
    assert_eq!(
        kinds,
        vec![TaskKind::Command, TaskKind::ShellScript, TaskKind::Command]
    );

    // Duplicate identities still get their own lock.
    let loops = engine.loops();
    assert!(!Arc::ptr_eq(loops[0].task(), loops[2].task()));

    let metrics = engine.metrics();
    assert_eq!(metrics.len(), 3);
    assert!(metrics.iter().all(|m| m.ticks == 0));
    assert_eq!(engine.config().overlap, OverlapPolicy::Block);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_spawn_starts_every_loop() {
    let recorder = recorder();
    let specs = vec![
        TaskSpec::new("echo one", Duration::from_millis(50)),
        TaskSpec::new("echo two", Duration::from_millis(80)),
    ];
    let engine = Engine::new(specs, test_config(), recorder.clone()).unwrap();

    let handles = engine.spawn();
    assert_eq!(handles.len(), 2);
    tokio::time::sleep(Duration::from_millis(300)).await;
    for handle in &handles {
        handle.abort();
    }

    assert!(recorder.count("echo one", crate::Outcome::Success) >= 2);
    assert!(recorder.count("echo two", crate::Outcome::Success) >= 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_run_keeps_going() {
    let recorder = recorder();
    let specs = vec![
        TaskSpec::new("echo main", Duration::from_millis(50)),
        TaskSpec::new("echo side", Duration::from_millis(50)),
    ];
    let engine = Arc::new(Engine::new(specs, test_config(), recorder.clone()).unwrap());

    let runner = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.run().await })
    };
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(!runner.is_finished());
    assert!(recorder.count("echo main", crate::Outcome::Success) >= 2);
    assert!(recorder.count("echo side", crate::Outcome::Success) >= 2);
    runner.abort();
}
