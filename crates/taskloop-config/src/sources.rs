//! Task definition sources: flag lists and task files.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use tracing::warn;

use crate::duration::{format_duration, parse_duration};
use crate::error::ConfigError;

/// A task definition: what to run and how often.
///
/// Specs are not checked for a positive interval here; the engine refuses
/// to start with a zero interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    /// Command line or script path. Doubles as the task's display name.
    pub identity: String,
    pub interval: Duration,
}

impl TaskSpec {
    pub fn new(identity: impl Into<String>, interval: Duration) -> Self {
        Self {
            identity: identity.into(),
            interval,
        }
    }
}

impl fmt::Display for TaskSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} every {}", self.identity, format_duration(self.interval))
    }
}

/// Build specs from comma-separated task and duration lists.
///
/// The lists pair up by position. Blank items are ignored, so an empty
/// `tasks` string yields no specs.
pub fn specs_from_lists(tasks: &str, durations: &str) -> Result<Vec<TaskSpec>, ConfigError> {
    let tasks: Vec<&str> = split_list(tasks);
    let durations: Vec<&str> = split_list(durations);

    if tasks.len() != durations.len() {
        return Err(ConfigError::MismatchedLengths {
            tasks: tasks.len(),
            durations: durations.len(),
        });
    }

    tasks
        .into_iter()
        .zip(durations)
        .map(|(task, duration)| Ok(TaskSpec::new(task, parse_duration(duration)?)))
        .collect()
}

fn split_list(list: &str) -> Vec<&str> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

/// A task file row that could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line number.
    pub line: usize,
    pub content: String,
    pub reason: String,
}

/// Result of parsing a task file: the usable specs plus rejected rows.
#[derive(Debug, Default)]
pub struct ParsedTaskFile {
    pub specs: Vec<TaskSpec>,
    pub skipped: Vec<SkippedRow>,
}

/// Parse task file content.
///
/// Each row is `<identity> <duration>`, where the duration is the last
/// whitespace-separated token. Blank rows and `#` comments are ignored.
pub fn parse_task_file(content: &str) -> ParsedTaskFile {
    let mut parsed = ParsedTaskFile::default();

    for (index, raw) in content.lines().enumerate() {
        let row = raw.trim();
        if row.is_empty() || row.starts_with('#') {
            continue;
        }

        match parse_row(index + 1, row) {
            Ok(spec) => parsed.specs.push(spec),
            Err(reason) => parsed.skipped.push(SkippedRow {
                line: index + 1,
                content: row.to_string(),
                reason,
            }),
        }
    }

    parsed
}

fn parse_row(line: usize, row: &str) -> Result<TaskSpec, String> {
    let (identity, duration) = row
        .rsplit_once(char::is_whitespace)
        .ok_or_else(|| "expected \"<task> <duration>\"".to_string())?;

    let identity = identity.trim();
    if identity.is_empty() {
        return Err(format!("row {} has no task", line));
    }

    let interval = parse_duration(duration).map_err(|e| e.to_string())?;
    Ok(TaskSpec::new(identity, interval))
}

/// Read and parse a task file, logging every skipped row.
pub fn load_task_file(path: &Path) -> Result<ParsedTaskFile, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let parsed = parse_task_file(&content);

    for row in &parsed.skipped {
        let err = ConfigError::InvalidRow {
            line: row.line,
            reason: row.reason.clone(),
        };
        warn!(file = %path.display(), row = %row.content, "Skipping task: {}", err);
    }

    Ok(parsed)
}

#[cfg(test)]
#[path = "sources_tests.rs"]
mod tests;
