//! Read-side: fetch the current version of a replaceable event.
//!
//! Relays can disagree about the current aggregate (propagation lag, lost
//! writes). The selection rule here is deterministic rather than
//! first-responder: highest `created_at` wins, ties broken by lexically
//! smallest id.

use std::cmp::Ordering;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::task::JoinSet;
use tokio::time::{timeout_at, Instant};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::debug;

use crate::wire::{ClientMessage, Filter, RelayMessage};
use laurel_events::Event;

const FETCH_SUB_ID: &str = "laurel-fetch";

/// Query every relay for events matching `filter` and pick the current one.
///
/// Relays that fail or time out contribute nothing; `None` means no relay
/// had a match.
pub async fn fetch_latest(filter: &Filter, relays: &[String], timeout: Duration) -> Option<Event> {
    let mut tasks = JoinSet::new();
    for url in relays {
        let url = url.clone();
        let filter = filter.clone();
        tasks.spawn(async move { fetch_from_relay(&url, &filter, timeout).await });
    }

    let mut best: Option<Event> = None;
    while let Some(joined) = tasks.join_next().await {
        let Ok(candidates) = joined else { continue };
        for candidate in candidates {
            best = Some(match best.take() {
                None => candidate,
                Some(current) => pick_latest(current, candidate),
            });
        }
    }
    best
}

/// The replaceable-event selection rule.
fn pick_latest(a: Event, b: Event) -> Event {
    match a.created_at.cmp(&b.created_at) {
        Ordering::Greater => a,
        Ordering::Less => b,
        Ordering::Equal => {
            if a.id <= b.id {
                a
            } else {
                b
            }
        }
    }
}

/// Read one relay's answers to a REQ until EOSE, CLOSED, or the timeout.
async fn fetch_from_relay(url: &str, filter: &Filter, timeout: Duration) -> Vec<Event> {
    let deadline = Instant::now() + timeout;

    let mut ws = match timeout_at(deadline, connect_async(url)).await {
        Ok(Ok((ws, _response))) => ws,
        Ok(Err(e)) => {
            debug!(relay = url, "connect failed: {e}");
            return Vec::new();
        }
        Err(_) => {
            debug!(relay = url, "connect timed out");
            return Vec::new();
        }
    };

    let request = ClientMessage::Subscribe {
        id: FETCH_SUB_ID.to_string(),
        filter: filter.clone(),
    };
    if ws.send(Message::Text(request.to_json())).await.is_err() {
        return Vec::new();
    }

    let mut events = Vec::new();
    loop {
        let frame = match timeout_at(deadline, ws.next()).await {
            Err(_) | Ok(None) | Ok(Some(Err(_))) => break,
            Ok(Some(Ok(frame))) => frame,
        };
        let Message::Text(text) = frame else { continue };
        match RelayMessage::parse(&text) {
            Some(RelayMessage::Event {
                subscription,
                event,
            }) if subscription == FETCH_SUB_ID => events.push(event),
            Some(RelayMessage::Eose(sub)) if sub == FETCH_SUB_ID => break,
            Some(RelayMessage::Closed { subscription, .. }) if subscription == FETCH_SUB_ID => {
                break
            }
            _ => {}
        }
    }

    let close = ClientMessage::Close {
        id: FETCH_SUB_ID.to_string(),
    };
    let _ = ws.send(Message::Text(close.to_json())).await;
    let _ = ws.close(None).await;
    debug!(relay = url, count = events.len(), "fetch complete");
    events
}
