//! Subscriber setup: console layer plus an optional JSON-lines file sink.

use std::path::Path;

use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::FILE_GUARD;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber. `RUST_LOG` overrides `level` for the console.
pub fn init(json: bool, level: &str, logging: &speedctl_config::Logging) {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));
    let console: BoxedLayer = if json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(console_filter)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(console_filter)
            .boxed()
    };

    let mut layers = vec![console];
    if let Some(file) = logging.file.as_deref() {
        layers.push(file_layer(file, logging));
    }

    // A subscriber may already be set (tests); keep the existing one
    let _ = tracing_subscriber::registry().with(layers).try_init();
}

fn file_layer(file: &str, logging: &speedctl_config::Logging) -> BoxedLayer {
    let path = Path::new(file);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .map_or_else(|| "speedctl.log".into(), |n| n.to_string_lossy().into_owned());

    let appender = match logging.rotation.as_deref() {
        Some("daily") => tracing_appender::rolling::daily(dir, name),
        Some("hourly") => tracing_appender::rolling::hourly(dir, name),
        _ => tracing_appender::rolling::never(dir, name),
    };
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = FILE_GUARD.set(guard);

    let level = logging.level.as_deref().unwrap_or("info");
    fmt::layer()
        .json()
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(EnvFilter::new(level))
        .boxed()
}
