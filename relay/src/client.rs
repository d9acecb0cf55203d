//! Concurrent event publishing.
//!
//! One task per relay per call, joined at a barrier. Each task owns its own
//! result slot and is bounded by the caller's timeout independently, so one
//! slow or dead relay never blocks the others and never aborts collection
//! of their results.

use std::future::Future;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::task::JoinSet;
use tokio::time::{timeout_at, Instant};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use crate::wire::{ClientMessage, Filter, RelayMessage};
use crate::RelayError;
use laurel_events::Event;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// What a single relay did with a published event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelayOutcome {
    /// The relay acknowledged the event (`OK … true`).
    Accepted,
    /// The relay explicitly refused it (`OK … false`).
    Rejected(String),
    /// The connection could not be established or died mid-exchange.
    Unreachable(String),
    /// No acknowledgment arrived inside the timeout.
    TimedOut,
}

/// Per-relay publish report.
#[derive(Clone, Debug)]
pub struct RelayReport {
    pub url: String,
    pub outcome: RelayOutcome,
    /// Whether the event could be queried back after an accept. Only
    /// attempted when [`PublishOptions::verify`] is set.
    pub confirmed: bool,
    /// NOTICE frames the relay sent during the exchange.
    pub notices: Vec<String>,
}

/// Overall status derived from the per-relay outcomes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublishStatus {
    FullSuccess,
    PartialSuccess,
    TotalFailure,
}

/// Aggregate result of one publish call.
#[derive(Clone, Debug)]
pub struct PublishReport {
    pub reports: Vec<RelayReport>,
    /// True when the caller aborted the call early; `reports` then holds
    /// only the outcomes that had completed by that point.
    pub interrupted: bool,
}

impl PublishReport {
    pub fn accepted_count(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.outcome == RelayOutcome::Accepted)
            .count()
    }

    /// Full success iff every relay accepted; total failure iff none did.
    pub fn status(&self) -> PublishStatus {
        let accepted = self.accepted_count();
        if accepted == 0 {
            PublishStatus::TotalFailure
        } else if accepted == self.reports.len() {
            PublishStatus::FullSuccess
        } else {
            PublishStatus::PartialSuccess
        }
    }
}

/// Knobs for one publish call.
#[derive(Clone, Debug)]
pub struct PublishOptions {
    /// Bound on each relay's connect + send + acknowledgment, separately
    /// per relay.
    pub timeout: Duration,
    /// Query the event back by id after an accept and record the result
    /// in [`RelayReport::confirmed`].
    pub verify: bool,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            verify: false,
        }
    }
}

/// Publish a signed event to every relay concurrently.
///
/// Fails fast with [`RelayError::NoRelays`] on an empty relay set, before
/// any connection attempt. Never retries; callers wanting backoff wrap the
/// whole call.
pub async fn publish_event(
    event: &Event,
    relays: &[String],
    options: &PublishOptions,
) -> Result<PublishReport, RelayError> {
    publish_event_until(event, relays, options, std::future::pending::<()>()).await
}

/// Like [`publish_event`], but stops early when `cancel` resolves (for
/// example on user interrupt). In-flight connections are dropped; outcomes
/// already collected are returned with `interrupted` set.
pub async fn publish_event_until<F>(
    event: &Event,
    relays: &[String],
    options: &PublishOptions,
    cancel: F,
) -> Result<PublishReport, RelayError>
where
    F: Future<Output = ()>,
{
    if relays.is_empty() {
        return Err(RelayError::NoRelays);
    }

    let mut tasks = JoinSet::new();
    for (slot, url) in relays.iter().enumerate() {
        let url = url.clone();
        let event = event.clone();
        let options = options.clone();
        tasks.spawn(async move {
            let report = publish_to_relay(&url, &event, &options).await;
            (slot, report)
        });
    }

    // Each task writes exactly one slot; this loop is the only reader.
    let mut slots: Vec<Option<RelayReport>> = relays.iter().map(|_| None).collect();
    let mut interrupted = false;
    tokio::pin!(cancel);

    loop {
        tokio::select! {
            joined = tasks.join_next() => match joined {
                Some(Ok((slot, report))) => slots[slot] = Some(report),
                Some(Err(e)) => warn!("relay publish task failed: {e}"),
                None => break,
            },
            _ = &mut cancel => {
                interrupted = true;
                tasks.abort_all();
                break;
            }
        }
    }

    Ok(PublishReport {
        reports: slots.into_iter().flatten().collect(),
        interrupted,
    })
}

/// Publish to one relay, classifying the result into exactly one outcome.
async fn publish_to_relay(url: &str, event: &Event, options: &PublishOptions) -> RelayReport {
    let deadline = Instant::now() + options.timeout;
    let mut report = RelayReport {
        url: url.to_string(),
        outcome: RelayOutcome::TimedOut,
        confirmed: false,
        notices: Vec::new(),
    };

    let mut ws = match timeout_at(deadline, connect_async(url)).await {
        Err(_) => {
            report.outcome = RelayOutcome::TimedOut;
            return report;
        }
        Ok(Err(e)) => {
            report.outcome = RelayOutcome::Unreachable(e.to_string());
            return report;
        }
        Ok(Ok((ws, _response))) => ws,
    };
    debug!(relay = url, "connected");

    let frame = ClientMessage::Publish(event.clone()).to_json();
    if let Err(e) = ws.send(Message::Text(frame)).await {
        report.outcome = RelayOutcome::Unreachable(format!("send failed: {e}"));
        return report;
    }

    report.outcome = await_ack(&mut ws, event, deadline, &mut report.notices).await;

    if report.outcome == RelayOutcome::Accepted && options.verify {
        report.confirmed = confirm_stored(&mut ws, event, deadline).await;
    }

    let _ = ws.close(None).await;
    report
}

/// Read frames until an `OK` for our event id, the deadline, or stream end.
async fn await_ack(
    ws: &mut WsStream,
    event: &Event,
    deadline: Instant,
    notices: &mut Vec<String>,
) -> RelayOutcome {
    loop {
        let frame = match timeout_at(deadline, ws.next()).await {
            Err(_) => return RelayOutcome::TimedOut,
            Ok(None) => {
                return RelayOutcome::Unreachable("connection closed before acknowledgment".into())
            }
            Ok(Some(Err(e))) => return RelayOutcome::Unreachable(e.to_string()),
            Ok(Some(Ok(frame))) => frame,
        };
        let Message::Text(text) = frame else { continue };
        match RelayMessage::parse(&text) {
            Some(RelayMessage::Ok {
                event_id,
                accepted,
                message,
            }) if event_id == event.id.to_hex() => {
                return if accepted {
                    RelayOutcome::Accepted
                } else {
                    RelayOutcome::Rejected(message)
                };
            }
            Some(RelayMessage::Notice(msg)) => notices.push(msg),
            _ => {}
        }
    }
}

/// Query the event back by id on the same connection to confirm storage.
async fn confirm_stored(ws: &mut WsStream, event: &Event, deadline: Instant) -> bool {
    let sub_id = format!("confirm-{}", &event.id.to_hex()[..8]);
    let request = ClientMessage::Subscribe {
        id: sub_id.clone(),
        filter: Filter::new().id(event.id).limit(1),
    };
    if ws.send(Message::Text(request.to_json())).await.is_err() {
        return false;
    }

    let mut stored = false;
    loop {
        let frame = match timeout_at(deadline, ws.next()).await {
            Err(_) | Ok(None) | Ok(Some(Err(_))) => break,
            Ok(Some(Ok(frame))) => frame,
        };
        let Message::Text(text) = frame else { continue };
        match RelayMessage::parse(&text) {
            Some(RelayMessage::Event {
                subscription,
                event: found,
            }) if subscription == sub_id => {
                if found.id == event.id {
                    stored = true;
                }
            }
            Some(RelayMessage::Eose(sub)) if sub == sub_id => break,
            Some(RelayMessage::Closed { subscription, .. }) if subscription == sub_id => break,
            _ => {}
        }
    }

    let close = ClientMessage::Close { id: sub_id };
    let _ = ws.send(Message::Text(close.to_json())).await;
    stored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(outcomes: Vec<RelayOutcome>) -> PublishReport {
        PublishReport {
            reports: outcomes
                .into_iter()
                .enumerate()
                .map(|(i, outcome)| RelayReport {
                    url: format!("wss://relay{i}.example"),
                    outcome,
                    confirmed: false,
                    notices: Vec::new(),
                })
                .collect(),
            interrupted: false,
        }
    }

    #[test]
    fn status_full_success() {
        let r = report(vec![RelayOutcome::Accepted, RelayOutcome::Accepted]);
        assert_eq!(r.status(), PublishStatus::FullSuccess);
        assert_eq!(r.accepted_count(), 2);
    }

    #[test]
    fn status_partial_success() {
        let r = report(vec![
            RelayOutcome::Accepted,
            RelayOutcome::TimedOut,
            RelayOutcome::Rejected("blocked".into()),
        ]);
        assert_eq!(r.status(), PublishStatus::PartialSuccess);
    }

    #[test]
    fn status_total_failure() {
        let r = report(vec![
            RelayOutcome::Unreachable("refused".into()),
            RelayOutcome::TimedOut,
        ]);
        assert_eq!(r.status(), PublishStatus::TotalFailure);
    }

    #[test]
    fn empty_report_is_total_failure() {
        let r = report(Vec::new());
        assert_eq!(r.status(), PublishStatus::TotalFailure);
    }
}
