use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local};
use clap::ValueEnum;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Json,
    Text,
}

/// `<command>-<YYYYmmdd-HHMMSS>.json`
pub fn log_file_name(command: &str, now: DateTime<Local>) -> String {
    format!("{command}-{}.json", now.format("%Y%m%d-%H%M%S"))
}

/// Install the global subscriber. Events go to stderr and, when `log_dir` is
/// set, are also appended to a per-run file there. Returns that file's path.
pub fn init(format: LogFormat, log_dir: Option<&Path>, command: &str) -> Result<Option<PathBuf>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (writer, path) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let path = dir.join(log_file_name(command, Local::now()));
            let file = File::create(&path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            (
                BoxMakeWriter::new(std::io::stderr.and(Mutex::new(file))),
                Some(path),
            )
        }
        None => (BoxMakeWriter::new(std::io::stderr), None),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(path.is_none())
        .with_target(false);

    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    installed.map_err(|e| anyhow!("failed to initialize logging: {e}"))?;

    Ok(path)
}
