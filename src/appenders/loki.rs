//! Grafana Loki push client
//!
//! Each entry becomes one push request carrying a single stream labelled
//! with the application name and the entry's level. Requests run on the
//! Tokio runtime captured at construction; `send` never waits for them.
//! Call `drain` (or `Logger::shutdown`) before exit so that accepted
//! entries are not lost.

use crate::core::{
    error::{stderr_diagnostics, DiagnosticCallback},
    DeliveryContext, DeliveryMetrics, InFlight, LogEntry, LoggerError, RemoteClient, Result,
};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;

/// Readiness probe path
pub const READY_PATH: &str = "/ready";

/// Push API path
pub const PUSH_PATH: &str = "/loki/api/v1/push";

/// Timeout applied to the readiness probe and to every push
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One labelled stream of the push API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushStream {
    pub stream: BTreeMap<String, String>,
    /// `[unix-nanoseconds, line]` pairs
    pub values: Vec<[String; 2]>,
}

/// Body of `POST /loki/api/v1/push`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushPayload {
    pub streams: Vec<PushStream>,
}

impl PushPayload {
    /// Build a single-stream payload for one entry
    ///
    /// # Errors
    ///
    /// `LoggerError::Encoding` if a field value cannot be encoded as JSON.
    pub fn from_entry(app_name: &str, entry: &LogEntry) -> Result<Self> {
        let mut labels = BTreeMap::new();
        labels.insert("app".to_string(), app_name.to_string());
        labels.insert("level".to_string(), entry.level.to_str().to_string());

        Ok(Self {
            streams: vec![PushStream {
                stream: labels,
                values: vec![[entry.unix_nanos().to_string(), encode_line(entry)?]],
            }],
        })
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Encode the log line: `message` plus every flattened field
///
/// Time and level are carried by the envelope and labels, not the line.
/// A field named `message` replaces the log message.
pub fn encode_line(entry: &LogEntry) -> Result<String> {
    let mut body = serde_json::Map::new();
    body.insert(
        "message".to_string(),
        serde_json::Value::String(entry.message.clone()),
    );
    for (key, value) in entry.fields.iter() {
        body.insert(key.to_string(), value.to_json_value()?);
    }
    Ok(serde_json::to_string(&body)?)
}

/// Builder for [`LokiClient`]
pub struct LokiClientBuilder {
    base_url: String,
    app_name: String,
    request_timeout: Duration,
    diagnostics: Option<DiagnosticCallback>,
}

impl LokiClientBuilder {
    pub fn new(base_url: impl Into<String>, app_name: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            app_name: app_name.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            diagnostics: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Receive push failures instead of having them printed to stderr
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rust_loki_logger::appenders::LokiClient;
    /// use rust_loki_logger::LoggerError;
    /// use std::sync::Arc;
    ///
    /// # async fn example() -> rust_loki_logger::Result<()> {
    /// let client = LokiClient::builder("http://localhost:3100", "api")
    ///     .on_diagnostic(Arc::new(|err: &LoggerError| eprintln!("loki push failed: {}", err)))
    ///     .connect()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use = "builder methods return a new value"]
    pub fn on_diagnostic(mut self, callback: DiagnosticCallback) -> Self {
        self.diagnostics = Some(callback);
        self
    }

    /// Probe readiness and return a usable client
    ///
    /// # Errors
    ///
    /// - `LoggerError::InvalidConfiguration` outside a Tokio runtime or when
    ///   the HTTP client cannot be built
    /// - `LoggerError::Connectivity` when `GET {base_url}/ready` fails or does
    ///   not answer 200
    pub async fn connect(self) -> Result<LokiClient> {
        let runtime = Handle::try_current().map_err(|e| {
            LoggerError::config("LokiClient", format!("requires a Tokio runtime: {}", e))
        })?;

        let http = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| LoggerError::config("LokiClient", e.to_string()))?;

        let ready_url = format!("{}{}", self.base_url, READY_PATH);
        let response = http
            .get(&ready_url)
            .send()
            .await
            .map_err(|e| LoggerError::connectivity(&self.base_url, e.to_string()))?;
        if response.status() != StatusCode::OK {
            return Err(LoggerError::connectivity(
                &self.base_url,
                format!("unexpected status {} from {}", response.status().as_u16(), ready_url),
            ));
        }

        Ok(LokiClient {
            push_url: format!("{}{}", self.base_url, PUSH_PATH),
            base_url: self.base_url,
            app_name: self.app_name,
            http,
            runtime,
            in_flight: InFlight::new(),
            metrics: Arc::new(DeliveryMetrics::new()),
            diagnostics: self.diagnostics.unwrap_or_else(stderr_diagnostics),
        })
    }
}

/// HTTP client pushing entries to Loki in the background
///
/// Safe for concurrent use; clone the surrounding `Arc` to share it.
pub struct LokiClient {
    base_url: String,
    push_url: String,
    app_name: String,
    http: reqwest::Client,
    runtime: Handle,
    in_flight: Arc<InFlight>,
    metrics: Arc<DeliveryMetrics>,
    diagnostics: DiagnosticCallback,
}

impl LokiClient {
    /// Connect with default settings
    pub async fn connect(base_url: impl Into<String>, app_name: impl Into<String>) -> Result<Self> {
        Self::builder(base_url, app_name).connect().await
    }

    pub fn builder(base_url: impl Into<String>, app_name: impl Into<String>) -> LokiClientBuilder {
        LokiClientBuilder::new(base_url, app_name)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Pushes dispatched but not yet finished
    pub fn in_flight(&self) -> usize {
        self.in_flight.count()
    }

    pub fn metrics(&self) -> &DeliveryMetrics {
        &self.metrics
    }

    /// Wait for in-flight pushes until the context's deadline or cancellation
    ///
    /// Without a deadline or token this waits until every push finishes.
    pub async fn drain_with(&self, ctx: &DeliveryContext) -> Result<()> {
        let started = tokio::time::Instant::now();
        let timed_out = || LoggerError::timeout(started.elapsed(), self.in_flight.count());

        let deadline = async {
            match ctx.deadline_at() {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };
        let cancelled = async {
            match ctx.cancel_token() {
                Some(token) => token.cancelled().await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.in_flight.wait_idle() => Ok(()),
            _ = deadline => Err(timed_out()),
            _ = cancelled => Err(timed_out()),
        }
    }

    async fn push(
        http: reqwest::Client,
        url: String,
        body: Vec<u8>,
        ctx: DeliveryContext,
    ) -> Result<()> {
        let exchange = async {
            let response = http
                .post(&url)
                .header(CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await
                .map_err(|e| LoggerError::transport(&url, e.to_string()))?;

            let status = response.status();
            if status == StatusCode::OK || status == StatusCode::NO_CONTENT {
                return Ok(());
            }

            let text = response.text().await.map_err(|e| {
                LoggerError::transport(&url, format!("failed to read response body: {}", e))
            })?;
            Err::<(), _>(LoggerError::status(&url, status.as_u16(), &text))
        };

        let deadline = async {
            match ctx.deadline_at() {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };
        let cancelled = async {
            match ctx.cancel_token() {
                Some(token) => token.cancelled().await,
                None => std::future::pending::<()>().await,
            }
        };

        // dropping `exchange` aborts the request
        tokio::select! {
            result = exchange => result,
            _ = deadline => Err(LoggerError::transport(&url, "deadline exceeded")),
            _ = cancelled => Err(LoggerError::transport(&url, "push cancelled")),
        }
    }
}

#[async_trait]
impl RemoteClient for LokiClient {
    fn send(&self, ctx: &DeliveryContext, entry: LogEntry) -> Result<()> {
        let body = match PushPayload::from_entry(&self.app_name, &entry).and_then(|p| p.to_json()) {
            Ok(body) => body,
            Err(e) => {
                self.metrics.record_encoding_error();
                return Err(e);
            }
        };

        // an expired or cancelled context never reaches the network
        if ctx.is_done() {
            let reason = if ctx.cancel_token().is_some_and(|t| t.is_cancelled()) {
                "push cancelled"
            } else {
                "deadline exceeded"
            };
            self.metrics.record_failed();
            (self.diagnostics)(&LoggerError::transport(&self.push_url, reason));
            return Ok(());
        }

        let guard = self.in_flight.acquire();
        self.metrics.record_dispatched();

        let http = self.http.clone();
        let url = self.push_url.clone();
        let ctx = ctx.clone();
        let metrics = Arc::clone(&self.metrics);
        let diagnostics = Arc::clone(&self.diagnostics);

        self.runtime.spawn(async move {
            let _guard = guard;
            match Self::push(http, url, body, ctx).await {
                Ok(()) => {
                    metrics.record_delivered();
                }
                Err(e) => {
                    metrics.record_failed();
                    diagnostics(&e);
                }
            }
        });

        Ok(())
    }

    async fn drain(&self, timeout: Duration) -> Result<()> {
        self.in_flight.wait_idle_timeout(timeout).await
    }

    fn name(&self) -> &str {
        "loki"
    }
}
