use std::time::Duration;

use crate::error::ClientError;

/// Default administrative port, used when the address has no port of its own.
pub const DEFAULT_PORT: u16 = 10011;

/// Default read / write / dial timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Initial capacity of the line parse buffer.
pub const START_BUF_SIZE: usize = 4096;

/// Default maximum line length. Large, to cope with the responses to bulk
/// snapshot commands.
pub const MAX_LINE_SIZE: usize = 10 << 20;

/// Interval between keepalive probes.
pub const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(300);

/// Connection settings for [`Client::open`](crate::Client::open).
///
/// Validated eagerly, before any network I/O.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Bound applied to the dial, the handshake reads, every command write,
    /// and the wait for each command's trailer.
    pub timeout: Duration,
    /// Initial line-buffer capacity.
    pub start_buf_size: usize,
    /// Maximum accepted line length. The effective maximum is the larger of
    /// this and `start_buf_size`.
    pub max_buf_size: usize,
    /// Send a periodic empty probe line so idle sessions stay open.
    pub keepalive: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            start_buf_size: START_BUF_SIZE,
            max_buf_size: MAX_LINE_SIZE,
            keepalive: false,
        }
    }
}

impl ClientConfig {
    pub(crate) fn validate(&self) -> Result<(), ClientError> {
        if self.timeout.is_zero() {
            return Err(ClientError::Config("timeout must be non-zero".into()));
        }
        if self.start_buf_size == 0 {
            return Err(ClientError::Config("start_buf_size must be non-zero".into()));
        }
        if self.max_buf_size == 0 {
            return Err(ClientError::Config("max_buf_size must be non-zero".into()));
        }
        Ok(())
    }

    pub(crate) fn max_line_len(&self) -> usize {
        self.max_buf_size.max(self.start_buf_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.timeout, Duration::from_secs(10));
        assert_eq!(cfg.start_buf_size, 4096);
        assert_eq!(cfg.max_buf_size, 10 << 20);
        assert!(!cfg.keepalive);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_zero_values() {
        let cfg = ClientConfig {
            timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ClientError::Config(_))));

        let cfg = ClientConfig {
            start_buf_size: 0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ClientError::Config(_))));

        let cfg = ClientConfig {
            max_buf_size: 0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ClientError::Config(_))));
    }

    #[test]
    fn effective_max_is_larger_of_max_and_start() {
        let cfg = ClientConfig {
            start_buf_size: 1 << 20,
            max_buf_size: 64,
            ..Default::default()
        };
        assert_eq!(cfg.max_line_len(), 1 << 20);
    }
}
