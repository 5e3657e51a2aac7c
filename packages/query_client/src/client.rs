use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::{Mutex, broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::codec::FramedRead;
use tracing::debug;

use query_wire::{Command, DecodeResponse, Notification};

use crate::codec::LineCodec;
use crate::config::{ClientConfig, DEFAULT_PORT};
use crate::dispatch::{Outcome, run_dispatcher};
use crate::error::ClientError;
use crate::keepalive::spawn_keepalive;

/// Header token the server sends as its first line.
const CONNECT_HEADER: &str = "TS3";

/// Capacity of the notification broadcast channel.
const NOTIFY_BUFFER: usize = 1024;

/// A live ServerQuery session.
///
/// One background task reads and classifies every incoming line for the
/// session's lifetime; command execution writes a line and waits for that
/// task to deliver the matching trailer. The protocol has no request ids
/// and supports a single outstanding command, which is why `exec` takes
/// `&mut self`: exclusive access is the single-writer discipline.
///
/// Commands write to the socket under the configured timeout, and so does
/// the wait for the trailer. An expired timeout leaves the session in an
/// unknown protocol state, so it is treated like any other I/O failure:
/// the session is marked disconnected and later calls fail fast with
/// [`ClientError::NotConnected`].
#[derive(Debug)]
pub struct Client {
    writer: Arc<Mutex<OwnedWriteHalf>>,
    timeout: Duration,
    connected: Arc<AtomicBool>,
    outcome_rx: mpsc::UnboundedReceiver<Outcome>,
    notify_tx: broadcast::Sender<Notification>,
    dispatcher: JoinHandle<()>,
    keepalive: Option<JoinHandle<()>>,
}

impl Client {
    /// Connect to `addr` and perform the protocol handshake.
    ///
    /// A bare host (no `:`) is given the default administrative port. The
    /// server must greet with the fixed header token; its second line, a
    /// human-readable banner, is read and discarded. Every step is bounded
    /// by the configured timeout.
    pub async fn open(addr: &str, config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;

        let addr = normalize_addr(addr);
        let stream = timeout(config.timeout, TcpStream::connect(addr.as_str()))
            .await
            .map_err(|_| ClientError::Timeout(config.timeout))??;
        let (read_half, write_half) = stream.into_split();

        let mut lines = FramedRead::with_capacity(
            read_half,
            LineCodec::new(config.max_line_len()),
            config.start_buf_size,
        );

        let header: String = timeout(config.timeout, lines.next())
            .await
            .map_err(|_| ClientError::Timeout(config.timeout))?
            .ok_or(ClientError::UnexpectedEof)??;
        if header != CONNECT_HEADER {
            return Err(ClientError::Handshake(header));
        }

        // Slurp the banner.
        let _banner: String = timeout(config.timeout, lines.next())
            .await
            .map_err(|_| ClientError::Timeout(config.timeout))?
            .ok_or(ClientError::UnexpectedEof)??;

        let connected = Arc::new(AtomicBool::new(true));
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let (notify_tx, _) = broadcast::channel(NOTIFY_BUFFER);
        let writer = Arc::new(Mutex::new(write_half));

        let dispatcher = tokio::spawn(run_dispatcher(
            lines,
            outcome_tx,
            notify_tx.clone(),
            Arc::clone(&connected),
        ));

        let keepalive = config.keepalive.then(|| {
            spawn_keepalive(Arc::clone(&writer), Arc::clone(&connected), config.timeout)
        });

        debug!(%addr, "serverquery session established");

        Ok(Self {
            writer,
            timeout: config.timeout,
            connected,
            outcome_rx,
            notify_tx,
            dispatcher,
            keepalive,
        })
    }

    /// Execute a raw, pre-rendered command and return its response-body
    /// lines in server order, trailer excluded.
    pub async fn exec(&mut self, cmd: &str) -> Result<Vec<String>, ClientError> {
        if !self.is_connected() {
            return Err(ClientError::NotConnected);
        }

        // A caller that dropped an earlier exec future mid-await leaves that
        // command's outcome queued; it must not resolve this command.
        while self.outcome_rx.try_recv().is_ok() {}

        let line = format!("{cmd}\n");
        let writer = Arc::clone(&self.writer);
        let write = async move { writer.lock().await.write_all(line.as_bytes()).await };
        match timeout(self.timeout, write).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                self.connected.store(false, Ordering::Relaxed);
                return Err(err.into());
            }
            Err(_) => {
                self.connected.store(false, Ordering::Relaxed);
                return Err(ClientError::Timeout(self.timeout));
            }
        }

        match timeout(self.timeout, self.outcome_rx.recv()).await {
            Ok(Some(outcome)) => outcome,
            Ok(None) => {
                self.connected.store(false, Ordering::Relaxed);
                Err(ClientError::NotConnected)
            }
            Err(_) => {
                // A trailer arriving after this point could no longer be
                // matched to its command, so the session is done.
                self.connected.store(false, Ordering::Relaxed);
                Err(ClientError::Timeout(self.timeout))
            }
        }
    }

    /// Execute a built [`Command`].
    pub async fn exec_cmd(&mut self, cmd: &Command) -> Result<Vec<String>, ClientError> {
        self.exec(&cmd.to_string()).await
    }

    /// Execute a built [`Command`] and decode its response.
    pub async fn exec_cmd_into<T: DecodeResponse>(
        &mut self,
        cmd: &Command,
    ) -> Result<T, ClientError> {
        let lines = self.exec_cmd(cmd).await?;
        Ok(T::decode(&lines)?)
    }

    /// Whether the session is still connected and processing lines.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    /// Subscribe to asynchronous server events.
    ///
    /// Without any subscriber, events are decoded and discarded; with one,
    /// they are delivered in wire order. Receivers end once the session is
    /// gone.
    pub fn subscribe_notifications(&self) -> broadcast::Receiver<Notification> {
        self.notify_tx.subscribe()
    }

    /// Close the session: best-effort `quit` through the normal command
    /// path, then socket teardown. If both the quit command and the socket
    /// shutdown fail, the quit error wins.
    pub async fn close(mut self) -> Result<(), ClientError> {
        let quit = self.exec("quit").await;
        let shutdown = {
            let mut writer = self.writer.lock().await;
            writer.shutdown().await
        };
        self.connected.store(false, Ordering::Relaxed);

        quit.map(|_| ())?;
        Ok(shutdown?)
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        self.dispatcher.abort();
        if let Some(handle) = self.keepalive.take() {
            handle.abort();
        }
    }
}

fn normalize_addr(addr: &str) -> String {
    if addr.contains(':') {
        addr.to_string()
    } else {
        format!("{addr}:{DEFAULT_PORT}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_default_port() {
        assert_eq!(normalize_addr("ts.example.com"), "ts.example.com:10011");
    }

    #[test]
    fn explicit_port_is_kept() {
        assert_eq!(normalize_addr("ts.example.com:9987"), "ts.example.com:9987");
        assert_eq!(normalize_addr("127.0.0.1:2222"), "127.0.0.1:2222");
    }
}
