use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Console output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Logging settings read from the environment.
///
/// - `LOG_LEVEL`: level for StoreHub's own targets (default `info`).
///   `RUST_LOG`, when set, replaces the whole filter.
/// - `LOG_FORMAT`: `json` for JSON console lines, anything else for compact.
/// - `LOG_DIR`: when set, JSON lines are also written to a daily rolling
///   `storehub.log` in that directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingOptions {
    pub level: String,
    pub format: LogFormat,
    pub dir: Option<String>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            dir: None,
        }
    }
}

impl LoggingOptions {
    pub fn from_env() -> Self {
        let format = match std::env::var("LOG_FORMAT") {
            Ok(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        };

        Self {
            level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format,
            dir: std::env::var("LOG_DIR").ok().filter(|dir| !dir.is_empty()),
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "storehub={level},storehub_cli={level},tower_http=warn,hyper=warn,sqlx=warn,tower_sessions=warn",
                level = self.level
            ))
        })
    }
}

/// Installs the global subscriber described by [`LoggingOptions::from_env`].
pub fn init_tracing() -> anyhow::Result<()> {
    let options = LoggingOptions::from_env();
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    let console = match options.format {
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(options.filter())
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_filter(options.filter())
            .boxed(),
    };
    layers.push(console);

    if let Some(dir) = &options.dir {
        std::fs::create_dir_all(dir)?;
        let appender = RollingFileAppender::new(Rotation::DAILY, dir, "storehub.log");
        layers.push(
            fmt::layer()
                .json()
                .with_writer(appender)
                .with_ansi(false)
                .with_filter(options.filter())
                .boxed(),
        );
    }

    tracing_subscriber::registry().with(layers).try_init()?;

    info!(
        level = %options.level,
        format = ?options.format,
        file_output = options.dir.is_some(),
        "Logging initialized"
    );
    Ok(())
}

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let matched_path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let request_id = uuid::Uuid::new_v4().to_string();

    let response = next.run(req).await;
    let latency = start.elapsed();
    let status = response.status().as_u16();

    match status {
        500..=599 => error!(
            request_id = %request_id,
            method = %method,
            path = %matched_path,
            status,
            latency_ms = %latency.as_millis(),
            "Server error"
        ),
        400..=499 => warn!(
            request_id = %request_id,
            method = %method,
            path = %matched_path,
            status,
            latency_ms = %latency.as_millis(),
            "Client error"
        ),
        _ => info!(
            request_id = %request_id,
            method = %method,
            path = %matched_path,
            status,
            latency_ms = %latency.as_millis(),
            "Request completed"
        ),
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = LoggingOptions::default();
        assert_eq!(options.level, "info");
        assert_eq!(options.format, LogFormat::Compact);
        assert_eq!(options.dir, None);
    }
}
