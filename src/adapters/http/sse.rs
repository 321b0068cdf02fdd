//! SSE subscription endpoint.
//!
//! `GET /events` attaches a relay subscription and streams its change events
//! as `data: <json>` frames until the client disconnects. The first frame is
//! always the full-state `init` replay the relay enqueued at attach time.
//!
//! Lifecycle: dropping the response stream (client closed the connection, or
//! the server is shutting the connection down) detaches the subscription, so
//! dead subscribers never linger past their next poll. Fan-out write failures
//! inside the relay cover the remaining cases.

use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    extract::State,
    http::header,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
};
use futures::Stream;
use tokio::sync::mpsc;

use crate::relay::{ChangeEvent, Relay, SubscriberId};

use super::handlers::RelayState;

/// GET /events - Attach a live subscription.
pub async fn events(State(state): State<RelayState>) -> impl IntoResponse {
    let (id, rx) = state.relay.attach().await;
    let stream = SubscriptionStream {
        relay: state.relay.clone(),
        id,
        rx,
    };

    (
        [(header::CACHE_CONTROL, "no-cache")],
        Sse::new(stream).keep_alive(KeepAlive::default()),
    )
}

/// Adapts a subscription's receiver into an SSE frame stream and detaches
/// the subscription when the connection goes away.
struct SubscriptionStream {
    relay: Arc<Relay>,
    id: SubscriberId,
    rx: mpsc::Receiver<ChangeEvent>,
}

impl Stream for SubscriptionStream {
    type Item = Result<Event, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.rx.poll_recv(cx) {
            Poll::Ready(Some(event)) => match Event::default().json_data(&event) {
                Ok(frame) => Poll::Ready(Some(Ok(frame))),
                Err(error) => {
                    // Presence values always serialize; if this ever fires the
                    // stream is better closed than silently skipping frames.
                    tracing::error!(subscriber = %self.id, %error, "change event failed to serialize");
                    Poll::Ready(None)
                }
            },
            // Sender dropped: the relay already removed this subscription.
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for SubscriptionStream {
    fn drop(&mut self) {
        let relay = self.relay.clone();
        let id = self.id;
        // Detach needs the relay lock; finish it on the runtime. Outside a
        // runtime (stream dropped during teardown) the next fan-out reaps the
        // closed channel instead.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                relay.detach(id).await;
            });
        }
    }
}
