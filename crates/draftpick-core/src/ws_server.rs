// Read-only WebSocket feed for draft viewers.
//
// Every connected viewer receives the current snapshot as JSON on connect
// and again after each published change. Anything a viewer sends is
// ignored apart from close frames.

use std::sync::Arc;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, info, warn};

use crate::protocol::DraftSnapshot;

/// Bind the viewer listener on `127.0.0.1:{port}` (0 picks a free port).
pub async fn bind(port: u16) -> anyhow::Result<TcpListener> {
    let listener = TcpListener::bind(format!("127.0.0.1:{port}")).await?;
    info!("Viewer feed listening on {}", listener.local_addr()?);
    Ok(listener)
}

/// Accept viewers forever, one task per connection.
pub async fn serve(
    listener: TcpListener,
    snapshots: watch::Receiver<Arc<DraftSnapshot>>,
) -> anyhow::Result<()> {
    loop {
        let (stream, addr) = listener.accept().await?;
        let addr_str = addr.to_string();
        let rx = snapshots.clone();

        tokio::spawn(async move {
            let ws_stream = match tokio_tungstenite::accept_async(stream).await {
                Ok(ws) => ws,
                Err(e) => {
                    warn!("WebSocket handshake failed for {addr_str}: {e}");
                    return;
                }
            };
            info!("Viewer connected: {addr_str}");

            let (write, read) = ws_stream.split();
            if let Err(e) = feed_viewer(write, read, rx, &addr_str).await {
                warn!("Viewer {addr_str} dropped: {e}");
            }
            info!("Viewer disconnected: {addr_str}");
        });
    }
}

/// Bind and serve in one call.
pub async fn run(port: u16, snapshots: watch::Receiver<Arc<DraftSnapshot>>) -> anyhow::Result<()> {
    let listener = bind(port).await?;
    serve(listener, snapshots).await
}

/// Push snapshots to one viewer until it leaves or the publisher goes away.
///
/// Generic over the sink and stream halves so it can be driven by
/// in-memory channels in tests.
pub async fn feed_viewer<Si, St>(
    mut sink: Si,
    mut incoming: St,
    mut snapshots: watch::Receiver<Arc<DraftSnapshot>>,
    addr: &str,
) -> anyhow::Result<()>
where
    Si: Sink<Message, Error = WsError> + Unpin,
    St: Stream<Item = Result<Message, WsError>> + Unpin,
{
    let current = Arc::clone(&snapshots.borrow_and_update());
    send_snapshot(&mut sink, &current).await?;

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    debug!("Snapshot publisher closed; ending feed for {addr}");
                    break;
                }
                let snapshot = Arc::clone(&snapshots.borrow_and_update());
                send_snapshot(&mut sink, &snapshot).await?;
            }
            msg = incoming.next() => match msg {
                None | Some(Ok(Message::Close(_))) => {
                    info!("Viewer {addr} closed the connection");
                    break;
                }
                Some(Err(e)) => {
                    warn!("WebSocket error from {addr}: {e}");
                    break;
                }
                Some(Ok(Message::Text(_))) => {
                    debug!("Ignoring text from read-only viewer {addr}");
                }
                Some(Ok(_)) => {}
            },
        }
    }

    let _ = sink.close().await;
    Ok(())
}

async fn send_snapshot<Si>(sink: &mut Si, snapshot: &DraftSnapshot) -> anyhow::Result<()>
where
    Si: Sink<Message, Error = WsError> + Unpin,
{
    let json = snapshot.to_json()?;
    sink.send(Message::Text(json.into())).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::{sink, stream};
    use std::pin::Pin;
    use tokio::sync::mpsc;

    type TestSink = Pin<Box<dyn Sink<Message, Error = WsError> + Send>>;

    /// A sink that forwards every message into an mpsc channel.
    fn channel_sink() -> (TestSink, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = sink::unfold(tx, |tx, msg: Message| async move {
            tx.send(msg).map_err(|_| WsError::ConnectionClosed)?;
            Ok::<_, WsError>(tx)
        });
        (Box::pin(sink), rx)
    }

    /// A viewer that never sends anything.
    fn idle() -> stream::Pending<Result<Message, WsError>> {
        stream::pending()
    }

    fn snapshot(pick_count: usize) -> Arc<DraftSnapshot> {
        Arc::new(DraftSnapshot {
            pick_count,
            ..DraftSnapshot::default()
        })
    }

    fn pick_count_of(msg: &Message) -> u64 {
        let Message::Text(text) = msg else {
            panic!("expected text frame, got {msg:?}");
        };
        let json: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
        json["pick_count"].as_u64().unwrap()
    }

    #[tokio::test]
    async fn sends_current_snapshot_on_connect() {
        let (tx, rx) = watch::channel(snapshot(3));
        let (sink, mut out) = channel_sink();
        drop(tx);

        feed_viewer(sink, idle(), rx, "test").await.unwrap();

        assert_eq!(pick_count_of(&out.recv().await.unwrap()), 3);
        assert!(out.try_recv().is_err());
    }

    #[tokio::test]
    async fn forwards_published_changes() {
        let (tx, rx) = watch::channel(snapshot(0));
        let (sink, mut out) = channel_sink();

        let feed = tokio::spawn(async move {
            feed_viewer(sink, idle(), rx, "test").await
        });

        assert_eq!(pick_count_of(&out.recv().await.unwrap()), 0);
        tx.send_replace(snapshot(1));
        assert_eq!(pick_count_of(&out.recv().await.unwrap()), 1);
        drop(tx);

        feed.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn close_frame_ends_feed() {
        let (_tx, rx) = watch::channel(snapshot(0));
        let (sink, mut out) = channel_sink();
        let incoming = stream::iter(vec![
            Ok::<_, WsError>(Message::Text("draft me".into())),
            Ok(Message::Close(None)),
        ]);

        feed_viewer(sink, incoming, rx, "test").await.unwrap();

        // Only the initial snapshot; viewer text is not echoed or acted on
        assert_eq!(pick_count_of(&out.recv().await.unwrap()), 0);
        assert!(out.try_recv().is_err());
    }

    #[tokio::test]
    async fn stream_error_ends_feed() {
        let (_tx, rx) = watch::channel(snapshot(0));
        let (sink, _out) = channel_sink();
        let incoming = stream::iter(vec![Err::<Message, _>(WsError::ConnectionClosed)]);

        feed_viewer(sink, incoming, rx, "test").await.unwrap();
    }

    #[tokio::test]
    async fn failed_send_is_reported() {
        let (_tx, rx) = watch::channel(snapshot(0));
        let (sink, out) = channel_sink();
        drop(out);

        let result = feed_viewer(sink, idle(), rx, "test").await;
        assert!(result.is_err());
    }
}
