use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::warn;

use crate::config::KEEPALIVE_INTERVAL;

/// Periodically writes an empty probe line so the server does not drop an
/// idle session. The probe shares the write half with command execution,
/// so probes and command writes serialize on the mutex. Any probe failure
/// marks the session disconnected and ends the task.
pub(crate) fn spawn_keepalive(
    writer: Arc<Mutex<OwnedWriteHalf>>,
    connected: Arc<AtomicBool>,
    write_timeout: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            sleep(KEEPALIVE_INTERVAL).await;
            if !connected.load(Ordering::Relaxed) {
                break;
            }
            let probe = async {
                let mut writer = writer.lock().await;
                writer.write_all(b"\n").await
            };
            match timeout(write_timeout, probe).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    warn!(%err, "keepalive probe failed, session disconnected");
                    connected.store(false, Ordering::Relaxed);
                    break;
                }
                Err(_) => {
                    warn!("keepalive probe timed out, session disconnected");
                    connected.store(false, Ordering::Relaxed);
                    break;
                }
            }
        }
    })
}
