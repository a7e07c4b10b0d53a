// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Live checkout notifications for storefront clients.
//!
//! Events are informational facts about what changed in a checkout session.
//! They are never authoritative: clients re-read the session over HTTP.
//!
//! # Architecture
//!
//! - Events are broadcast to all connected clients
//! - No commands are executed over WebSocket connections
//! - Events carry identifiers and counts, never payment details

use axum::{
    extract::{
        State as AxumState, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, stream::StreamExt};
use merch_checkout::{CheckoutFlowState, FlowEvent, FlowFailure};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Maximum number of events to buffer in the broadcast channel.
/// Slow clients lose the oldest events.
const EVENT_BUFFER_SIZE: usize = 100;

/// Live checkout event types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    /// Shipping options were quoted for a session.
    ShippingCalculated {
        /// The checkout session.
        session_id: String,
        /// Number of options quoted.
        option_count: usize,
    },
    /// A shipping calculation failed.
    ShippingFailed {
        /// The checkout session.
        session_id: String,
        /// Reason reported by the calculator.
        message: String,
        /// Whether the client may retry.
        retryable: bool,
    },
    /// A checkout passed validation and its bundle is waiting.
    CheckoutValidated {
        /// The checkout session.
        session_id: String,
    },
    /// The payment step consumed a bundle.
    BundleConsumed {
        /// The checkout session.
        session_id: String,
    },
    /// Connection confirmation (sent on initial connect).
    Connected {
        /// Server timestamp (ISO 8601).
        timestamp: String,
    },
}

impl LiveEvent {
    /// Derives live events from the flow events of one controller dispatch.
    ///
    /// A failure that was followed by a retry in the same dispatch is
    /// reported as retryable; the last failure takes its retryability from
    /// the final flow state.
    #[must_use]
    pub fn from_flow_events(events: &[FlowEvent], state: &CheckoutFlowState) -> Vec<Self> {
        events
            .iter()
            .enumerate()
            .filter_map(|(index, event)| {
                let session_id: String = event.session_id.clone();
                match event.action.name.as_str() {
                    "ShippingCalculated" => Some(Self::ShippingCalculated {
                        session_id,
                        option_count: state.shipping_options.len(),
                    }),
                    "ShippingFailed" => {
                        let retried: bool = events
                            .get(index + 1)
                            .is_some_and(|next| next.action.name == "RetryShipping");
                        let retryable: bool = retried
                            || matches!(
                                state.error,
                                Some(FlowFailure::ShippingUnavailable {
                                    retryable: true,
                                    ..
                                })
                            );
                        Some(Self::ShippingFailed {
                            session_id,
                            message: event.action.details.clone().unwrap_or_default(),
                            retryable,
                        })
                    }
                    "ValidationSucceeded" => Some(Self::CheckoutValidated { session_id }),
                    _ => None,
                }
            })
            .collect()
    }
}

/// Broadcaster for live checkout events.
#[derive(Clone)]
pub struct LiveEventBroadcaster {
    tx: broadcast::Sender<LiveEvent>,
}

impl LiveEventBroadcaster {
    /// Creates a new event broadcaster.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_BUFFER_SIZE);
        Self { tx }
    }

    /// Broadcasts an event to all connected clients.
    ///
    /// If no clients are connected, the event is dropped.
    pub fn broadcast(&self, event: &LiveEvent) {
        match self.tx.send(event.clone()) {
            Ok(count) => {
                debug!(?event, receivers = count, "Broadcast live event");
            }
            Err(_) => {
                debug!(?event, "No receivers for live event");
            }
        }
    }

    /// Subscribes to the event stream.
    ///
    /// Events sent before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.tx.subscribe()
    }
}

impl Default for LiveEventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Handles WebSocket upgrade requests for live event streaming.
pub async fn live_events_handler(
    ws: WebSocketUpgrade,
    AxumState(broadcaster): AxumState<Arc<LiveEventBroadcaster>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, broadcaster))
}

/// Sends a connection confirmation, then streams live events until the
/// client disconnects.
async fn handle_socket(socket: WebSocket, broadcaster: Arc<LiveEventBroadcaster>) {
    info!("Client connected to live event stream");

    let (mut sender, mut receiver) = socket.split();
    let mut rx: broadcast::Receiver<LiveEvent> = broadcaster.subscribe();

    let connected_event = LiveEvent::Connected {
        timestamp: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .unwrap_or_else(|_| String::from("unknown")),
    };

    if let Ok(json) = serde_json::to_string(&connected_event)
        && sender.send(Message::Text(json.into())).await.is_err()
    {
        warn!("Failed to send connection confirmation");
        return;
    }

    let mut send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(json) => {
                        if sender.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        error!(?e, "Failed to serialize live event");
                    }
                },
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Live event client lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(_) | Message::Binary(_)) => {
                    warn!("Received unexpected message from client, ignoring");
                }
                Ok(Message::Close(_)) => {
                    debug!("Client sent close frame");
                    break;
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {}
                Err(e) => {
                    error!(?e, "WebSocket receive error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            debug!("Send task completed");
            recv_task.abort();
        }
        _ = &mut recv_task => {
            debug!("Receive task completed");
            send_task.abort();
        }
    }

    info!("Client disconnected from live event stream");
}
