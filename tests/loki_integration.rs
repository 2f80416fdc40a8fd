//! Integration tests for the Loki push path
//!
//! These tests verify:
//! - Readiness probing at construction
//! - Wire format of pushes
//! - Background dispatch and drain on shutdown
//! - Post-dispatch failures reaching the diagnostic channel only

mod common;

use common::{unreachable_url, MockBehavior, MockLoki};
use parking_lot::Mutex;
use rust_loki_logger::appenders::LokiClient;
use rust_loki_logger::core::DiagnosticCallback;
use rust_loki_logger::prelude::*;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

fn collect_diagnostics() -> (DiagnosticCallback, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let callback: DiagnosticCallback = Arc::new(move |err: &LoggerError| {
        sink.lock().push(err.to_string());
    });
    (callback, seen)
}

fn entry(level: LogLevel, message: &str, fields: &[Field]) -> LogEntry {
    LogEntry::new(level, message).with_fields(LogContext::new().flatten(fields))
}

#[tokio::test]
async fn test_connect_probes_readiness() {
    let mock = MockLoki::start(MockBehavior::default()).await;

    let client = LokiClient::connect(mock.url(), "svc").await.unwrap();
    assert_eq!(client.app_name(), "svc");
    assert_eq!(client.in_flight(), 0);

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/ready");
}

#[tokio::test]
async fn test_connect_fails_when_not_ready() {
    let mock = MockLoki::start(MockBehavior {
        ready_status: 503,
        ..Default::default()
    })
    .await;

    let result = LokiClient::connect(mock.url(), "svc").await;
    assert!(matches!(result, Err(LoggerError::Connectivity { .. })));
}

#[tokio::test]
async fn test_connect_fails_when_unreachable() {
    let url = unreachable_url().await;
    let result = LokiClient::connect(url, "svc").await;
    assert!(matches!(result, Err(LoggerError::Connectivity { .. })));
}

#[tokio::test]
async fn test_push_wire_format() {
    let mock = MockLoki::start(MockBehavior::default()).await;
    let client = LokiClient::connect(mock.url(), "svc").await.unwrap();

    let entry = entry(
        LogLevel::Info,
        "user logged in",
        &[Field::string("user_id", "42")],
    );
    let expected_ts = entry.unix_nanos().to_string();
    client.send(&DeliveryContext::background(), entry).unwrap();
    client.drain(Duration::from_secs(5)).await.unwrap();

    let pushes = mock.pushes();
    assert_eq!(pushes.len(), 1);
    assert_eq!(pushes[0].method, "POST");
    assert_eq!(pushes[0].header("content-type"), Some("application/json"));

    let payload = pushes[0].json();
    let stream = &payload["streams"][0];
    assert_eq!(stream["stream"], serde_json::json!({"app": "svc", "level": "INFO"}));
    assert_eq!(stream["values"][0][0], expected_ts.as_str());

    let line: serde_json::Value =
        serde_json::from_str(stream["values"][0][1].as_str().unwrap()).unwrap();
    assert_eq!(
        line,
        serde_json::json!({"message": "user logged in", "user_id": "42"})
    );
    assert_eq!(client.metrics().delivered(), 1);
}

#[tokio::test]
async fn test_multiline_message_reaches_loki_unescaped() {
    let mock = MockLoki::start(MockBehavior::default()).await;
    let client = Arc::new(LokiClient::connect(mock.url(), "svc").await.unwrap());

    let logger = Logger::builder()
        .appender(ConsoleAppender::with_writer(std::io::sink()))
        .remote(client)
        .build();
    let stack = "thread 'main' panicked at src/main.rs:3:5\n\tframe 0: main";
    logger.error(stack, &[]).unwrap();
    logger.shutdown(Duration::from_secs(5)).await.unwrap();

    let pushes = mock.pushes();
    assert_eq!(pushes.len(), 1);
    let payload = pushes[0].json();
    let line: serde_json::Value =
        serde_json::from_str(payload["streams"][0]["values"][0][1].as_str().unwrap()).unwrap();
    assert_eq!(line["message"], stack);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_sends_drain_completely() {
    const N: usize = 32;

    let mock = MockLoki::start(MockBehavior {
        push_delay: Duration::from_millis(50),
        ..Default::default()
    })
    .await;
    let client = Arc::new(LokiClient::connect(mock.url(), "svc").await.unwrap());

    let senders: Vec<_> = (0..N)
        .map(|i| {
            let client = Arc::clone(&client);
            tokio::spawn(async move {
                client.send(
                    &DeliveryContext::background(),
                    entry(LogLevel::Debug, &format!("message {}", i), &[]),
                )
            })
        })
        .collect();
    for sender in senders {
        sender.await.unwrap().unwrap();
    }

    client.drain(Duration::from_secs(10)).await.unwrap();

    assert_eq!(client.in_flight(), 0);
    assert_eq!(client.metrics().dispatched(), N as u64);
    assert_eq!(client.metrics().delivered(), N as u64);
    assert_eq!(mock.pushes().len(), N);
}

#[tokio::test]
async fn test_drain_with_expired_deadline_times_out() {
    let mock = MockLoki::start(MockBehavior {
        push_delay: Duration::from_secs(2),
        ..Default::default()
    })
    .await;
    let client = LokiClient::connect(mock.url(), "svc").await.unwrap();

    for i in 0..3 {
        client
            .send(
                &DeliveryContext::background(),
                entry(LogLevel::Info, &format!("slow {}", i), &[]),
            )
            .unwrap();
    }

    let started = Instant::now();
    let expired = DeliveryContext::background().deadline(tokio::time::Instant::now());
    let result = client.drain_with(&expired).await;

    assert!(matches!(result, Err(LoggerError::Timeout { in_flight: 3, .. })));
    assert!(started.elapsed() < Duration::from_millis(500));

    // the pushes keep going and finish on their own
    client.drain(Duration::from_secs(10)).await.unwrap();
    assert_eq!(client.metrics().delivered(), 3);
}

#[tokio::test]
async fn test_bad_status_goes_to_diagnostics() {
    let mock = MockLoki::start(MockBehavior {
        push_status: 400,
        push_body: "  entry too far behind\n",
        ..Default::default()
    })
    .await;
    let (callback, seen) = collect_diagnostics();
    let client = LokiClient::builder(mock.url(), "svc")
        .on_diagnostic(callback)
        .connect()
        .await
        .unwrap();

    let result = client.send(
        &DeliveryContext::background(),
        entry(LogLevel::Error, "rejected", &[]),
    );
    assert!(result.is_ok());

    client.drain(Duration::from_secs(5)).await.unwrap();

    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].contains("Unexpected status 400"));
    assert!(seen[0].ends_with("response: entry too far behind"));
    assert_eq!(client.metrics().failed(), 1);
}

#[tokio::test]
async fn test_cancelled_push_is_reported_as_transport_failure() {
    let mock = MockLoki::start(MockBehavior {
        push_delay: Duration::from_secs(5),
        ..Default::default()
    })
    .await;
    let (callback, seen) = collect_diagnostics();
    let client = LokiClient::builder(mock.url(), "svc")
        .on_diagnostic(callback)
        .connect()
        .await
        .unwrap();

    let token = CancellationToken::new();
    let ctx = DeliveryContext::background().cancellation(token.clone());
    client
        .send(&ctx, entry(LogLevel::Info, "cancel me", &[]))
        .unwrap();
    token.cancel();

    client.drain(Duration::from_secs(2)).await.unwrap();

    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].contains("Transport error"));
    assert!(seen[0].contains("push cancelled"));
}

#[tokio::test]
async fn test_push_deadline_aborts_request() {
    let mock = MockLoki::start(MockBehavior {
        push_delay: Duration::from_secs(5),
        ..Default::default()
    })
    .await;
    let (callback, seen) = collect_diagnostics();
    let client = LokiClient::builder(mock.url(), "svc")
        .on_diagnostic(callback)
        .connect()
        .await
        .unwrap();

    let ctx = DeliveryContext::with_timeout(Duration::from_millis(50));
    client
        .send(&ctx, entry(LogLevel::Warn, "too slow", &[]))
        .unwrap();

    client.drain(Duration::from_secs(2)).await.unwrap();
    assert!(seen.lock()[0].contains("deadline exceeded"));
}

#[tokio::test]
async fn test_finished_context_skips_the_request() {
    let mock = MockLoki::start(MockBehavior::default()).await;
    let (callback, seen) = collect_diagnostics();
    let client = LokiClient::builder(mock.url(), "svc")
        .on_diagnostic(callback)
        .connect()
        .await
        .unwrap();

    let token = CancellationToken::new();
    token.cancel();
    let cancelled = DeliveryContext::background().cancellation(token);
    let expired = DeliveryContext::background().deadline(tokio::time::Instant::now());

    client
        .send(&cancelled, entry(LogLevel::Info, "too late", &[]))
        .unwrap();
    client
        .send(&expired, entry(LogLevel::Info, "also too late", &[]))
        .unwrap();

    assert_eq!(client.in_flight(), 0);
    assert_eq!(client.metrics().dispatched(), 0);
    assert_eq!(client.metrics().failed(), 2);

    client.drain(Duration::from_millis(100)).await.unwrap();
    assert!(mock.pushes().is_empty());

    let seen = seen.lock();
    assert_eq!(seen.len(), 2);
    assert!(seen[0].contains("push cancelled"));
    assert!(seen[1].contains("deadline exceeded"));
}

#[tokio::test]
async fn test_unencodable_entry_is_rejected_before_dispatch() {
    let mock = MockLoki::start(MockBehavior::default()).await;
    let client = LokiClient::connect(mock.url(), "svc").await.unwrap();

    let result = client.send(
        &DeliveryContext::background(),
        entry(LogLevel::Info, "ratio", &[Field::new("r", f64::NAN)]),
    );

    assert!(matches!(result, Err(LoggerError::Encoding(_))));
    assert_eq!(client.in_flight(), 0);
    assert_eq!(client.metrics().dispatched(), 0);
    assert_eq!(client.metrics().encoding_errors(), 1);

    client.drain(Duration::from_millis(100)).await.unwrap();
    assert!(mock.pushes().is_empty());
}

#[tokio::test]
async fn test_logger_end_to_end() {
    let mock = MockLoki::start(MockBehavior::default()).await;
    let client = Arc::new(LokiClient::connect(mock.url(), "checkout").await.unwrap());

    let logger = Logger::builder()
        .min_level(LogLevel::Warn)
        .appender(ConsoleAppender::with_writer(std::io::sink()))
        .remote(client.clone())
        .build();

    let payments = logger
        .with([Field::string("request_id", "r-1")])
        .with_group("payment");

    payments.info("filtered out", &[]).unwrap();
    payments
        .fatal("card declined", &[Field::string("reason", "expired")])
        .unwrap();

    logger.shutdown(Duration::from_secs(5)).await.unwrap();

    let pushes = mock.pushes();
    assert_eq!(pushes.len(), 1);

    let payload = pushes[0].json();
    assert_eq!(payload["streams"][0]["stream"]["level"], "FATAL");
    assert_eq!(payload["streams"][0]["stream"]["app"], "checkout");

    let line: serde_json::Value =
        serde_json::from_str(payload["streams"][0]["values"][0][1].as_str().unwrap()).unwrap();
    assert_eq!(
        line,
        serde_json::json!({
            "message": "card declined",
            "request_id": "r-1",
            "payment.reason": "expired",
        })
    );
}
