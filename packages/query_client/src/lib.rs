//! Async client for the ServerQuery remote-administration protocol.
//!
//! ServerQuery is command/response RPC over a persistent TCP connection,
//! with asynchronous event lines ("notifications") interleaved into the
//! same stream. There are no request ids: a single trailer line marks the
//! end of each response, and only one command may be outstanding at a time.
//! This crate gives that wire protocol a request/response API by running
//! one background task per session that classifies every incoming line and
//! hands trailers back to the waiting caller.
//!
//! # Example
//!
//! ```no_run
//! use query_client::{Client, ClientConfig, NotifyEvent};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), query_client::ClientError> {
//!     let mut client = Client::open("ts.example.com", ClientConfig::default()).await?;
//!     client.login("serveradmin", "secret").await?;
//!     client.use_sid(1).await?;
//!
//!     let mut events = client.subscribe_notifications();
//!     client.server_notify_register(NotifyEvent::Server).await?;
//!
//!     let version = client.version().await?;
//!     println!("{} on {}", version.version, version.platform);
//!
//!     if let Ok(event) = events.recv().await {
//!         println!("{}: {:?}", event.event, event.data);
//!     }
//!
//!     client.close().await?;
//!     Ok(())
//! }
//! ```

mod client;
mod codec;
mod commands;
mod config;
mod dispatch;
mod error;
mod keepalive;

pub use client::Client;
pub use commands::{NotifyEvent, Version, WhoAmI};
pub use config::{
    ClientConfig, DEFAULT_PORT, DEFAULT_TIMEOUT, KEEPALIVE_INTERVAL, MAX_LINE_SIZE, START_BUF_SIZE,
};
pub use error::ClientError;

// Re-export the wire types that appear in this crate's API.
pub use query_wire::{Command, DecodeResponse, Notification, QueryError, Record, WireError};
