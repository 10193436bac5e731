//! Server-Sent Events (SSE) utilities

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde::Serialize;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Types that can be published on an SSE stream
pub trait SseEvent: Serialize + Clone + Send + 'static {
    /// SSE `event:` field for this value
    fn event_name(&self) -> &'static str;
}

/// Stream every message from a broadcast channel to one SSE client
///
/// Sends a `ConnectionStatus: connected` event first. A client that falls
/// behind skips the missed messages and keeps streaming. The stream ends
/// when the sending side is dropped or `shutdown` is cancelled, so open
/// clients never hold up a graceful shutdown.
pub fn broadcast_sse_stream<T: SseEvent>(
    service_name: &'static str,
    mut rx: broadcast::Receiver<T>,
    shutdown: CancellationToken,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("New SSE client connected to {} events", service_name);

    let stream = async_stream::stream! {
        yield Ok(Event::default().event("ConnectionStatus").data("connected"));

        loop {
            let received = tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("SSE: {} stream closed for shutdown", service_name);
                    break;
                }
                received = rx.recv() => received,
            };

            match received {
                Ok(message) => {
                    let name = message.event_name();
                    match Event::default().event(name).json_data(&message) {
                        Ok(event) => yield Ok(event),
                        Err(e) => warn!("SSE: failed to encode {} event: {}", name, e),
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("SSE: {} client lagged, skipped {} events", service_name, skipped);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("SSE: {} event channel closed", service_name);
                    break;
                }
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("heartbeat"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use futures::StreamExt;

    #[derive(Debug, Clone, Serialize)]
    struct Ping {
        seq: u32,
    }

    impl SseEvent for Ping {
        fn event_name(&self) -> &'static str {
            "Ping"
        }
    }

    async fn next_frame(body: &mut axum::body::BodyDataStream) -> Option<String> {
        tokio::time::timeout(Duration::from_secs(2), body.next())
            .await
            .ok()
            .flatten()
            .map(|chunk| String::from_utf8_lossy(&chunk.unwrap()).into_owned())
    }

    #[tokio::test]
    async fn test_stream_forwards_events_after_greeting() {
        let (tx, rx) = broadcast::channel(8);
        let response = broadcast_sse_stream("test", rx, CancellationToken::new()).into_response();
        let mut body = response.into_body().into_data_stream();

        let greeting = next_frame(&mut body).await.unwrap();
        assert!(greeting.contains("event: ConnectionStatus"));
        assert!(greeting.contains("data: connected"));

        tx.send(Ping { seq: 7 }).unwrap();
        let frame = next_frame(&mut body).await.unwrap();
        assert!(frame.contains("event: Ping"));
        assert!(frame.contains(r#"{"seq":7}"#));
    }

    #[tokio::test]
    async fn test_cancel_ends_stream_while_sender_alive() {
        let (_tx, rx) = broadcast::channel::<Ping>(8);
        let shutdown = CancellationToken::new();
        let response = broadcast_sse_stream("test", rx, shutdown.clone()).into_response();
        let mut body = response.into_body().into_data_stream();

        assert!(next_frame(&mut body).await.is_some());

        shutdown.cancel();
        let end = tokio::time::timeout(Duration::from_secs(2), body.next()).await;
        assert!(matches!(end, Ok(None)), "stream should end once cancelled");
    }
}
