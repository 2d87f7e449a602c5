//! Logging initialization and configuration.

use anyhow::Result;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_subscriber::{Layer, Registry};

use crate::config::{log_dir_path, Config};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Text,
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(format: &str) -> Self {
        match format.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "compact" => LogFormat::Compact,
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Text,
        }
    }

    fn file_suffix(self) -> &'static str {
        match self {
            LogFormat::Json => "json",
            _ => "log",
        }
    }
}

/// Initialize the logging system based on configuration.
///
/// Console output goes to stderr so command output on stdout stays clean.
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(cfg: &Config) -> Result<()> {
    let level = parse_log_level(&cfg.log.level)?;
    let format = LogFormat::parse(&cfg.log.format);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("guardian={}", level)));

    let mut layers: Vec<BoxedLayer> = vec![fmt_layer(format, std::io::stderr, true)];

    if cfg.log.file {
        let log_dir = log_dir_path(cfg);
        std::fs::create_dir_all(&log_dir)?;
        // File name: guardian.yyyy-MM-dd.log
        let file_appender = tracing_appender::rolling::RollingFileAppender::builder()
            .rotation(tracing_appender::rolling::Rotation::DAILY)
            .filename_prefix("guardian")
            .filename_suffix(format.file_suffix())
            .build(&log_dir)
            .map_err(|e| anyhow::anyhow!("Failed to create rolling file appender: {}", e))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        // Process-lifetime writer
        std::mem::forget(guard);
        layers.push(fmt_layer(format, non_blocking, false));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::debug!(
        level = %cfg.log.level,
        format = %cfg.log.format,
        file = cfg.log.file,
        "Logging initialized"
    );

    Ok(())
}

fn fmt_layer<W>(format: LogFormat, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()));
    match format {
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Text => layer.boxed(),
    }
}

/// Parse log level string to a filter directive.
fn parse_log_level(level_str: &str) -> Result<&'static str> {
    match level_str.trim().to_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        _ => anyhow::bail!("Invalid log level: {}", level_str),
    }
}
