//! Appender and remote client implementations

pub mod console;
pub mod loki;

pub use console::ConsoleAppender;
pub use loki::{LokiClient, LokiClientBuilder, PushPayload, PushStream};

pub use crate::core::{Appender, RemoteClient};
