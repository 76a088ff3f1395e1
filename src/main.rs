//! taskloop - run a fixed set of commands and shell scripts on intervals.
//!
//! Main entry point: collects task definitions, sets up logging and hands
//! the task set to the engine, which runs until the process is killed.

mod cli;
mod logging;

use std::error::Error;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use taskloop_config::{
    format_duration, load_task_file, specs_from_lists, Config, ConfigLoader, TaskSpec,
};
use taskloop_engine::{Engine, TracingRecorder};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load(&ConfigLoader::expand_path(path))?,
        None => Config::default(),
    };
    cli.apply_overrides(&mut config);

    let _log_guard = logging::init_tracing(&config.logging)?;

    let specs = collect_specs(&cli, &config).inspect_err(|e| {
        error!("Invalid task definitions: {}", e);
    })?;

    let engine = Engine::new(specs, config.engine.clone(), Arc::new(TracingRecorder))
        .inspect_err(|e| error!("Refusing to start: {}", e))?;

    if cli.check {
        print_tasks(&engine);
        return Ok(());
    }

    info!("Starting taskloop v{}", env!("CARGO_PKG_VERSION"));
    engine.run().await;
    Ok(())
}

/// Gather task definitions from the flags, the task file and the config
/// file, in that order.
fn collect_specs(cli: &Cli, config: &Config) -> Result<Vec<TaskSpec>, Box<dyn Error>> {
    let mut specs = specs_from_lists(&cli.tasks, &cli.durations)?;

    if let Some(file) = &cli.file {
        let path = ConfigLoader::expand_path(file);
        info!("Reading tasks file {}", path.display());
        match load_task_file(&path) {
            Ok(parsed) => {
                info!(
                    "Loaded {} tasks from {} ({} rows skipped)",
                    parsed.specs.len(),
                    path.display(),
                    parsed.skipped.len()
                );
                specs.extend(parsed.specs);
            }
            // The other sources may still provide tasks.
            Err(e) => error!(
                "Failed to read task file {}: {}. Not running tasks defined in this file",
                path.display(),
                e
            ),
        }
    }

    specs.extend(config.task_specs()?);
    Ok(specs)
}

fn print_tasks(engine: &Engine) {
    println!("{:<8} {:>12}  TASK", "KIND", "INTERVAL");
    for task in engine.tasks() {
        println!(
            "{:<8} {:>12}  {}",
            task.kind().to_string(),
            format_duration(task.interval()),
            task.identity()
        );
    }
    println!(
        "{} task(s), overlap policy: {}",
        engine.task_count(),
        engine.config().overlap
    );
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
