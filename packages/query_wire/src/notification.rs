use crate::error::WireError;
use crate::record::{Record, parse_pairs};

/// Prefix carried by every asynchronous event line.
pub const NOTIFY_PREFIX: &str = "notify";

/// A decoded asynchronous event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Event name with the `notify` prefix stripped, e.g. `cliententerview`.
    pub event: String,
    /// Ordered event fields.
    pub data: Record,
}

/// Decode an event line. The caller is expected to have checked the
/// [`NOTIFY_PREFIX`] already; lines without it fail here as well.
pub fn decode_notification(line: &str) -> Result<Notification, WireError> {
    let rest = line
        .strip_prefix(NOTIFY_PREFIX)
        .ok_or(WireError::MalformedNotification)?;
    let (name, payload) = match rest.split_once(' ') {
        Some((name, payload)) => (name, payload),
        None => (rest, ""),
    };
    if name.is_empty() {
        return Err(WireError::MalformedNotification);
    }
    Ok(Notification {
        event: name.to_string(),
        data: parse_pairs(payload),
    })
}
