//! Live cost event stream over WebSocket
//!
//! Clients connect to `/api/v1/events/ws` and receive every published cost
//! event as JSON, optionally filtered by order and topic.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::select;
use tracing::{debug, error, info, warn};

use crate::application::events::SharedEventBus;
use crate::domain::events::EventMessage;

/// Query parameters for filtering events
#[derive(Debug, Default, Deserialize)]
pub struct EventFilter {
    /// Only events for this order
    pub order_id: Option<String>,
    /// Comma-separated topics, e.g. `cost.calculated,cost.actual`
    pub topics: Option<String>,
}

impl EventFilter {
    pub fn matches(&self, message: &EventMessage) -> bool {
        if let Some(ref order_id) = self.order_id {
            if message.event.order_id() != order_id {
                return false;
            }
        }

        if let Some(ref topics) = self.topics {
            let mut allowed = topics.split(',').map(str::trim).filter(|t| !t.is_empty());
            if !allowed.any(|t| t == message.topic) {
                return false;
            }
        }

        true
    }
}

#[derive(Clone)]
pub struct NotificationState {
    pub event_bus: SharedEventBus,
}

pub fn create_notification_state(event_bus: SharedEventBus) -> NotificationState {
    NotificationState { event_bus }
}

/// WebSocket upgrade handler for the event stream
pub async fn ws_notifications_handler(
    ws: WebSocketUpgrade,
    State(state): State<NotificationState>,
    Query(filter): Query<EventFilter>,
) -> impl IntoResponse {
    info!(
        order_id = ?filter.order_id,
        topics = ?filter.topics,
        "New event stream connection"
    );

    ws.on_upgrade(move |socket| handle_notification_socket(socket, state, filter))
}

async fn handle_notification_socket(
    socket: WebSocket,
    state: NotificationState,
    filter: EventFilter,
) {
    let (mut sender, mut receiver) = socket.split();
    let mut subscriber = state.event_bus.subscribe();

    let welcome = serde_json::json!({
        "type": "connected",
        "message": "Connected to cost event stream",
        "filter": {
            "order_id": filter.order_id,
            "topics": filter.topics
        }
    });

    if let Err(e) = sender
        .send(Message::Text(welcome.to_string().into()))
        .await
    {
        error!("Failed to send welcome message: {}", e);
        return;
    }

    loop {
        select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if let Err(e) = sender.send(Message::Pong(data)).await {
                            error!("Failed to send pong: {}", e);
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("Event stream client closed");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket error: {}", e);
                        break;
                    }
                    // Clients are receive-only
                    Some(Ok(_)) => {}
                }
            }

            event = subscriber.recv() => {
                let Some(event_msg) = event else {
                    warn!("Event bus closed");
                    break;
                };
                if !filter.matches(&event_msg) {
                    continue;
                }

                match serde_json::to_string(&event_msg) {
                    Ok(json) => {
                        if let Err(e) = sender.send(Message::Text(json.into())).await {
                            error!("Failed to send event: {}", e);
                            break;
                        }
                        debug!(topic = %event_msg.topic, "Event sent to client");
                    }
                    Err(e) => error!("Failed to serialize event: {}", e),
                }
            }
        }
    }

    info!("Event stream client disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::domain::events::{CostActualEvent, CostCalculatedEvent, CostEvent};

    fn calculated(order_id: &str) -> EventMessage {
        EventMessage::new(CostEvent::CostCalculated(CostCalculatedEvent {
            cost_id: "c-1".into(),
            trip_id: None,
            order_id: order_id.into(),
            total_cost: 100.0,
            total_cpm: 1.0,
            timestamp: Utc::now(),
        }))
    }

    fn actual(order_id: &str) -> EventMessage {
        EventMessage::new(CostEvent::CostActual(CostActualEvent {
            cost_id: "c-1".into(),
            order_id: order_id.into(),
            actual_miles: 100.0,
            actual_cost: 110.0,
            variance: 10.0,
            variance_pct: 0.1,
            timestamp: Utc::now(),
        }))
    }

    #[test]
    fn empty_filter_passes_everything() {
        let filter = EventFilter::default();
        assert!(filter.matches(&calculated("ORD-1")));
        assert!(filter.matches(&actual("ORD-2")));
    }

    #[test]
    fn filters_by_order_and_topic() {
        let filter = EventFilter {
            order_id: Some("ORD-1".into()),
            topics: Some("cost.actual, cost.unknown".into()),
        };
        assert!(filter.matches(&actual("ORD-1")));
        assert!(!filter.matches(&calculated("ORD-1")));
        assert!(!filter.matches(&actual("ORD-2")));
    }
}
