//! Process-wide logging setup
//!
//! Console output carries the bare message, like a menu-driven tool should.
//! The log file gets timestamps and levels so a run can be reconstructed.

use crate::config::LoggingConfig;
use crate::{Result, TripcastError};
use chrono::Local;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// File name of the log for a run started at `now`: `DD_MM_YYYY_HHMMSS_log.txt`
#[must_use]
pub fn log_file_name(now: chrono::DateTime<Local>) -> String {
    format!("{}_log.txt", now.format("%d_%m_%Y_%H%M%S"))
}

/// Install the global subscriber. Must run once, before any component logs.
///
/// Returns the path of the log file when file output is enabled.
/// `RUST_LOG` takes precedence over the configured level.
pub fn init(config: &LoggingConfig) -> Result<Option<PathBuf>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| TripcastError::config(format!("Invalid log level: {e}")))?;

    let json = config.format == "json";
    let mut layers: Vec<BoxedLayer> = Vec::new();

    if matches!(config.output.as_str(), "console" | "both") {
        layers.push(console_layer(json));
    }

    let mut log_path = None;
    if matches!(config.output.as_str(), "file" | "both") {
        let path = Path::new(&config.directory).join(log_file_name(Local::now()));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&path)?;
        layers.push(file_layer(file, json));
        log_path = Some(path);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| TripcastError::config(format!("Logging already initialized: {e}")))?;

    Ok(log_path)
}

fn console_layer(json: bool) -> BoxedLayer {
    if json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer()
            .without_time()
            .with_target(false)
            .with_level(false)
            .boxed()
    }
}

fn file_layer(file: File, json: bool) -> BoxedLayer {
    let writer = Mutex::new(file);
    if json {
        fmt::layer().json().with_writer(writer).boxed()
    } else {
        fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(writer)
            .boxed()
    }
}
