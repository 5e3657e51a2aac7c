//! The per-session line dispatcher.
//!
//! One task per session pulls every incoming line for the connection's
//! lifetime and routes it: trailers resolve the in-flight command,
//! notification lines go out on the broadcast channel, and everything else
//! accumulates as response body. The loop is generic over the line stream
//! so it can be driven off-socket in tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::{Stream, StreamExt};
use tokio::sync::{broadcast, mpsc};
use tracing::debug;

use query_wire::{
    NOTIFY_PREFIX, Notification, QueryError, SUCCESS_TRAILER, decode_notification, parse_trailer,
};

use crate::error::ClientError;

/// Resolution of one in-flight command: its body lines, or the error that
/// ended it. Exactly one outcome is delivered per command, plus one final
/// outcome when the session dies so no caller is left blocked.
pub(crate) type Outcome = Result<Vec<String>, ClientError>;

enum Class {
    Success,
    Failure(QueryError),
    Notify,
    Body,
}

fn classify(line: &str) -> Class {
    if line == SUCCESS_TRAILER {
        Class::Success
    } else if let Some(err) = parse_trailer(line) {
        Class::Failure(err)
    } else if line.starts_with(NOTIFY_PREFIX) {
        Class::Notify
    } else {
        Class::Body
    }
}

pub(crate) async fn run_dispatcher<S>(
    mut lines: S,
    outcome_tx: mpsc::UnboundedSender<Outcome>,
    notify_tx: broadcast::Sender<Notification>,
    connected: Arc<AtomicBool>,
) where
    S: Stream<Item = Result<String, ClientError>> + Unpin,
{
    let mut body: Vec<String> = Vec::new();

    while connected.load(Ordering::Relaxed) {
        match lines.next().await {
            Some(Ok(line)) => match classify(&line) {
                Class::Success => {
                    let _ = outcome_tx.send(Ok(std::mem::take(&mut body)));
                }
                Class::Failure(err) => {
                    body.clear();
                    let _ = outcome_tx.send(Err(ClientError::Server(err)));
                }
                Class::Notify => match decode_notification(&line) {
                    // A send error only means nobody is subscribed;
                    // notifications are fire-and-forget.
                    Ok(event) => {
                        let _ = notify_tx.send(event);
                    }
                    Err(err) => debug!(%err, "dropping undecodable notification"),
                },
                Class::Body => body.push(line),
            },
            Some(Err(err)) => {
                connected.store(false, Ordering::Relaxed);
                let _ = outcome_tx.send(Err(err));
                break;
            }
            None => {
                connected.store(false, Ordering::Relaxed);
                let _ = outcome_tx.send(Err(ClientError::UnexpectedEof));
                break;
            }
        }
    }

    connected.store(false, Ordering::Relaxed);
    debug!("line dispatcher terminated");
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn line(s: &str) -> Result<String, ClientError> {
        Ok(s.to_string())
    }

    fn harness() -> (
        mpsc::UnboundedSender<Outcome>,
        mpsc::UnboundedReceiver<Outcome>,
        broadcast::Sender<Notification>,
        Arc<AtomicBool>,
    ) {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let (notify_tx, _) = broadcast::channel(16);
        (outcome_tx, outcome_rx, notify_tx, Arc::new(AtomicBool::new(true)))
    }

    #[tokio::test]
    async fn success_trailer_delivers_accumulated_body() {
        let (outcome_tx, mut outcome_rx, notify_tx, connected) = harness();
        let lines = stream::iter(vec![line("a"), line("b"), line(SUCCESS_TRAILER)]);
        run_dispatcher(lines, outcome_tx, notify_tx, Arc::clone(&connected)).await;

        assert_eq!(outcome_rx.try_recv().unwrap().unwrap(), vec!["a", "b"]);
        // End of stream always delivers one terminal outcome.
        assert!(matches!(
            outcome_rx.try_recv().unwrap(),
            Err(ClientError::UnexpectedEof)
        ));
        assert!(!connected.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn error_trailer_discards_body() {
        let (outcome_tx, mut outcome_rx, notify_tx, connected) = harness();
        let lines = stream::iter(vec![
            line("partial body"),
            line(r"error id=1281 msg=database\sempty\sresult\sset"),
            line(SUCCESS_TRAILER),
        ]);
        run_dispatcher(lines, outcome_tx, notify_tx, connected).await;

        match outcome_rx.try_recv().unwrap() {
            Err(ClientError::Server(err)) => {
                assert_eq!(err.id, 1281);
                assert_eq!(err.msg, "database empty result set");
            }
            other => panic!("expected server error, got {other:?}"),
        }
        // The discarded body must not leak into the next command's outcome.
        assert_eq!(outcome_rx.try_recv().unwrap().unwrap(), Vec::<String>::new());
    }

    #[tokio::test]
    async fn notifications_bypass_the_body() {
        let (outcome_tx, mut outcome_rx, notify_tx, connected) = harness();
        let mut events = notify_tx.subscribe();
        let lines = stream::iter(vec![
            line("notifycliententerview clid=7"),
            line("body"),
            line("notifyclientleftview clid=7"),
            line(SUCCESS_TRAILER),
        ]);
        run_dispatcher(lines, outcome_tx, notify_tx, connected).await;

        assert_eq!(outcome_rx.try_recv().unwrap().unwrap(), vec!["body"]);
        assert_eq!(events.try_recv().unwrap().event, "cliententerview");
        assert_eq!(events.try_recv().unwrap().event, "clientleftview");
    }

    #[tokio::test]
    async fn undecodable_notifications_are_dropped() {
        let (outcome_tx, mut outcome_rx, notify_tx, connected) = harness();
        let mut events = notify_tx.subscribe();
        let lines = stream::iter(vec![line("notify broken"), line(SUCCESS_TRAILER)]);
        run_dispatcher(lines, outcome_tx, notify_tx, connected).await;

        assert_eq!(outcome_rx.try_recv().unwrap().unwrap(), Vec::<String>::new());
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn notifications_without_subscribers_do_not_block() {
        let (outcome_tx, mut outcome_rx, notify_tx, connected) = harness();
        let lines = stream::iter(vec![
            line("notifytextmessage msg=hi"),
            line(SUCCESS_TRAILER),
        ]);
        run_dispatcher(lines, outcome_tx, notify_tx, connected).await;
        assert!(outcome_rx.try_recv().unwrap().is_ok());
    }

    #[tokio::test]
    async fn stream_error_is_the_terminal_outcome() {
        let (outcome_tx, mut outcome_rx, notify_tx, connected) = harness();
        let lines = stream::iter(vec![
            line("body"),
            Err(ClientError::LineTooLong { max: 64 }),
            line(SUCCESS_TRAILER),
        ]);
        run_dispatcher(lines, outcome_tx, notify_tx, Arc::clone(&connected)).await;

        assert!(matches!(
            outcome_rx.try_recv().unwrap(),
            Err(ClientError::LineTooLong { max: 64 })
        ));
        // Nothing after the terminal outcome.
        assert!(outcome_rx.try_recv().is_err());
        assert!(!connected.load(Ordering::Relaxed));
    }
}
