use super::*;

#[test]
fn test_parse_minimal() {
    let cli = Cli::try_parse_from(["taskloop", "--tasks", "echo hi", "--durations", "5s"]).unwrap();
    assert_eq!(cli.tasks, "echo hi");
    assert_eq!(cli.durations, "5s");
    assert!(cli.file.is_none());
    assert!(cli.overlap.is_none());
    assert!(!cli.check);
}

#[test]
fn test_parse_all_flags() {
    let cli = Cli::try_parse_from([
        "taskloop",
        "--file",
        "/etc/taskloop/tasks.txt",
        "--logs",
        "/var/log/taskloop.log",
        "--config",
        "taskloop.toml",
        "--overlap",
        "block",
        "--max-pending",
        "2",
        "--shell",
        "/bin/sh",
        "--check",
    ])
    .unwrap();

    assert_eq!(cli.file, Some(PathBuf::from("/etc/taskloop/tasks.txt")));
    assert_eq!(cli.overlap, Some(OverlapPolicy::Block));
    assert_eq!(cli.max_pending, Some(2));
    assert!(cli.check);
}

#[test]
fn test_parse_bad_overlap() {
    assert!(Cli::try_parse_from(["taskloop", "--overlap", "sometimes"]).is_err());
}

#[test]
fn test_apply_overrides() {
    let cli = Cli::try_parse_from([
        "taskloop",
        "--logs",
        "/tmp/custom.log",
        "--overlap",
        "block",
        "--shell",
        "/bin/dash",
    ])
    .unwrap();

    let mut config = Config::default();
    config.engine.max_pending = 5;
    cli.apply_overrides(&mut config);

    assert_eq!(config.logging.file, PathBuf::from("/tmp/custom.log"));
    assert_eq!(config.engine.overlap, OverlapPolicy::Block);
    assert_eq!(config.engine.shell, "/bin/dash");
    // Not given on the command line: config value kept.
    assert_eq!(config.engine.max_pending, 5);
}
