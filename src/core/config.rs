//! Logger configuration
//!
//! `env = "local"` renders to the console only; any other environment also
//! pushes to Loki and therefore requires `loki_url`.

use super::{
    error::{LoggerError, Result},
    log_level::LogLevel,
    logger::Logger,
    output_format::OutputFormat,
};
use crate::appenders::{ConsoleAppender, LokiClient};
use serde::Deserialize;
use std::sync::Arc;

/// Environment name selecting console-only output
pub const LOCAL_ENV: &str = "local";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub env: String,
    /// Minimum level; unknown names fall back to INFO
    pub level: String,
    pub loki_url: Option<String>,
    pub app_name: String,
    pub format: OutputFormat,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            env: LOCAL_ENV.to_string(),
            level: "info".to_string(),
            loki_url: None,
            app_name: "app".to_string(),
            format: OutputFormat::Text,
        }
    }
}

impl LoggerConfig {
    /// Read `LOG_ENV`, `LOG_LEVEL`, `LOKI_URL`, `APP_NAME` and `LOG_FORMAT`
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for an unknown `LOG_FORMAT`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(env) = lookup("LOG_ENV") {
            config.env = env;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            config.level = level;
        }
        if let Some(url) = lookup("LOKI_URL").filter(|u| !u.is_empty()) {
            config.loki_url = Some(url);
        }
        if let Some(app) = lookup("APP_NAME") {
            config.app_name = app;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            config.format = format
                .parse()
                .map_err(|e: String| LoggerError::config("LOG_FORMAT", e))?;
        }
        Ok(config)
    }

    pub fn min_level(&self) -> LogLevel {
        LogLevel::from_config(&self.level)
    }

    pub fn is_local(&self) -> bool {
        self.env.eq_ignore_ascii_case(LOCAL_ENV)
    }

    /// Build the logger, connecting to Loki outside the local environment
    ///
    /// The returned logger is an explicit handle; nothing is registered
    /// process-wide.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` when remote mode has no `loki_url`, or
    /// `Connectivity` when Loki is not ready.
    pub async fn init(&self) -> Result<Logger> {
        let appender = ConsoleAppender::new().with_output_format(self.format);
        let builder = Logger::builder()
            .min_level(self.min_level())
            .appender(appender);

        if self.is_local() {
            return Ok(builder.build());
        }

        let url = self.loki_url.as_deref().ok_or_else(|| {
            LoggerError::config(
                "LoggerConfig",
                format!("loki_url is required when env is '{}'", self.env),
            )
        })?;
        let client = LokiClient::connect(url, self.app_name.clone()).await?;
        Ok(builder.remote(Arc::new(client)).build())
    }
}
