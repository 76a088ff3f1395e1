//! CLI definitions for taskloop.

use std::path::PathBuf;

use clap::Parser;

use taskloop_config::{Config, OverlapPolicy};

/// taskloop CLI.
#[derive(Debug, Parser)]
#[command(name = "taskloop")]
#[command(about = "Run commands and shell scripts on fixed intervals, forever")]
#[command(version)]
pub(crate) struct Cli {
    /// Comma separated tasks to run. Each is a command or a path to a .sh script
    #[arg(long, default_value = "")]
    pub tasks: String,

    /// Comma separated intervals, one per task and in the same order (e.g. 30s,2h5m10s)
    #[arg(long, default_value = "")]
    pub durations: String,

    /// Task file with one "<task> <duration>" per line
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Where to write logs [default: ./task-scheduler.log]
    #[arg(long)]
    pub logs: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, env = "TASKLOOP_CONFIG")]
    pub config: Option<PathBuf>,

    /// What to do when a tick fires while the previous run is still going (block, skip)
    #[arg(long)]
    pub overlap: Option<OverlapPolicy>,

    /// Runs allowed to queue behind a busy task under the skip policy
    #[arg(long)]
    pub max_pending: Option<usize>,

    /// Interpreter for .sh tasks
    #[arg(long)]
    pub shell: Option<String>,

    /// Validate the task definitions, print them and exit
    #[arg(long)]
    pub check: bool,
}

impl Cli {
    /// Command line values win over the config file.
    pub(crate) fn apply_overrides(&self, config: &mut Config) {
        if let Some(logs) = &self.logs {
            config.logging.file = logs.clone();
        }
        if let Some(overlap) = self.overlap {
            config.engine.overlap = overlap;
        }
        if let Some(max_pending) = self.max_pending {
            config.engine.max_pending = max_pending;
        }
        if let Some(shell) = &self.shell {
            config.engine.shell = shell.clone();
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
