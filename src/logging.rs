//! Log file and console setup.

use std::error::Error;
use std::path::{Path, PathBuf};

use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use taskloop_config::{ConfigLoader, LogRotation, LoggingConfig, DEFAULT_LOG_FILE};

/// Initialize tracing with file and optional console output.
///
/// If the configured log file cannot be opened, falls back to
/// `./task-scheduler.log`; if that fails too, startup fails. The returned
/// guard flushes the file writer when dropped, so keep it alive in `main`.
pub(crate) fn init_tracing(config: &LoggingConfig) -> Result<WorkerGuard, Box<dyn Error>> {
    let requested = ConfigLoader::expand_path(&config.file);
    let (appender, fallback) =
        open_appender(&requested, Path::new(DEFAULT_LOG_FILE), config.rotation)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)?,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(config.console.then(|| fmt::layer().with_target(false)))
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(false),
        )
        .init();

    if let Some(err) = fallback {
        warn!(
            "Could not use log file {} ({}), falling back to {}",
            requested.display(),
            err,
            DEFAULT_LOG_FILE
        );
    }

    Ok(guard)
}

/// Open `requested`, or `fallback` when that fails.
///
/// On fallback the error for `requested` is returned next to the appender.
fn open_appender(
    requested: &Path,
    fallback: &Path,
    rotation: LogRotation,
) -> Result<(RollingFileAppender, Option<Box<dyn Error>>), Box<dyn Error>> {
    match build_appender(requested, rotation) {
        Ok(appender) => Ok((appender, None)),
        Err(e) if requested != fallback => Ok((build_appender(fallback, rotation)?, Some(e))),
        Err(e) => Err(e),
    }
}

fn build_appender(path: &Path, rotation: LogRotation) -> Result<RollingFileAppender, Box<dyn Error>> {
    let (dir, prefix, suffix) = split_log_path(path)?;

    let mut builder = RollingFileAppender::builder()
        .rotation(match rotation {
            LogRotation::Never => Rotation::NEVER,
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Daily => Rotation::DAILY,
        })
        .filename_prefix(prefix);
    if let Some(suffix) = suffix {
        builder = builder.filename_suffix(suffix);
    }

    Ok(builder.build(dir)?)
}

/// Split `dir/name.ext` into the pieces the rolling appender wants.
fn split_log_path(path: &Path) -> Result<(PathBuf, String, Option<String>), Box<dyn Error>> {
    let prefix = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| format!("log path {} has no file name", path.display()))?;
    let suffix = path.extension().map(|s| s.to_string_lossy().into_owned());
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, prefix, suffix))
}
