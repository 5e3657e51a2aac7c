use std::time::Duration;

use query_wire::{QueryError, WireError};

/// Errors produced by session setup, command execution, and teardown.
///
/// `Server` is the only variant that leaves the session usable: the server
/// rejected one command and the connection carries on. Everything else from
/// the I/O side (`Io`, `Timeout`, `LineTooLong`, `UnexpectedEof`) is fatal
/// for the session; later calls report `NotConnected`.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid config: {0}")]
    Config(String),

    #[error("not connected")]
    NotConnected,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid connection header {0:?}")]
    Handshake(String),

    #[error("line exceeds maximum length of {max} bytes")]
    LineTooLong { max: usize },

    #[error("unexpected end of stream")]
    UnexpectedEof,

    /// The server answered the command with a non-zero error trailer.
    #[error(transparent)]
    Server(#[from] QueryError),

    /// A response decoded, but not into the requested shape.
    #[error(transparent)]
    Wire(#[from] WireError),
}

impl ClientError {
    /// The server-reported error, if this is one.
    pub fn server_error(&self) -> Option<&QueryError> {
        match self {
            Self::Server(err) => Some(err),
            _ => None,
        }
    }
}
