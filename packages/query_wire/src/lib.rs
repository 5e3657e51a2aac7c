//! Wire format for the ServerQuery administration protocol.
//!
//! ServerQuery is a line-oriented text protocol: a command renders to a
//! single line of `name key=value` pairs plus option flags, responses come
//! back as `|`-separated records of `key=value` pairs, and every value
//! travels through a fixed escape table. This crate implements the format
//! only; it performs no I/O.
//!
//! ```
//! use query_wire::{Command, decode_records};
//!
//! let cmd = Command::new("use").arg("sid", 1).flag("-virtual");
//! assert_eq!(cmd.to_string(), "use sid=1 -virtual");
//!
//! let lines = vec!["clid=1 client_nickname=one|clid=2 client_nickname=two\\stwo".to_string()];
//! let records = decode_records(&lines);
//! assert_eq!(records[1].get("client_nickname"), Some("two two"));
//! ```

mod command;
mod error;
mod escape;
mod notification;
mod record;
mod trailer;

pub use command::Command;
pub use error::WireError;
pub use escape::{escape, unescape};
pub use notification::{NOTIFY_PREFIX, Notification, decode_notification};
pub use record::{DecodeResponse, Record, decode_records};
pub use trailer::{QueryError, SUCCESS_TRAILER, parse_trailer};
