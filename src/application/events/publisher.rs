//! Downstream delivery of cost events
//!
//! Publishing happens after commit and is best effort: the costing service
//! logs and counts a [`PublishError`] but never returns it to the caller.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::event_bus::EventBus;
use crate::domain::events::CostEvent;
use crate::support::errors::PublishError;

#[async_trait]
pub trait CostEventPublisher: Send + Sync {
    async fn publish(&self, event: &CostEvent) -> Result<(), PublishError>;
}

pub type SharedPublisher = Arc<dyn CostEventPublisher>;

#[async_trait]
impl CostEventPublisher for EventBus {
    async fn publish(&self, event: &CostEvent) -> Result<(), PublishError> {
        EventBus::publish(self, event.clone());
        Ok(())
    }
}

/// Body POSTed to the webhook
#[derive(Debug, Serialize)]
struct WebhookEnvelope<'a> {
    topic: &'a str,
    key: &'a str,
    payload: &'a CostEvent,
}

/// Relays every cost event to an HTTP endpoint as JSON.
#[derive(Clone)]
pub struct WebhookPublisher {
    client: reqwest::Client,
    url: String,
}

impl WebhookPublisher {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, PublishError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PublishError::Delivery(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CostEventPublisher for WebhookPublisher {
    async fn publish(&self, event: &CostEvent) -> Result<(), PublishError> {
        let envelope = WebhookEnvelope {
            topic: event.topic(),
            key: event.order_id(),
            payload: event,
        };
        let body = serde_json::to_vec(&envelope)?;

        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| PublishError::Delivery(e.to_string()))?;

        let status = response.status();
        debug!(url = %self.url, %status, topic = event.topic(), "Webhook delivered");
        if !status.is_success() {
            return Err(PublishError::Rejected(status.as_u16()));
        }
        Ok(())
    }
}

/// Hands each event to every inner publisher.
///
/// All publishers are attempted; the first failure is reported.
#[derive(Clone, Default)]
pub struct FanoutPublisher {
    publishers: Vec<SharedPublisher>,
}

impl FanoutPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, publisher: SharedPublisher) -> Self {
        self.publishers.push(publisher);
        self
    }

    pub fn len(&self) -> usize {
        self.publishers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.publishers.is_empty()
    }
}

#[async_trait]
impl CostEventPublisher for FanoutPublisher {
    async fn publish(&self, event: &CostEvent) -> Result<(), PublishError> {
        let mut first_error = None;
        for publisher in &self.publishers {
            if let Err(e) = publisher.publish(event).await {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use chrono::Utc;
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;

    use crate::domain::events::CostCalculatedEvent;

    fn calculated() -> CostEvent {
        CostEvent::CostCalculated(CostCalculatedEvent {
            cost_id: "c-1".into(),
            trip_id: Some("T-1".into()),
            order_id: "ORD-7".into(),
            total_cost: 1000.0,
            total_cpm: 2.0,
            timestamp: Utc::now(),
        })
    }

    async fn spawn_receiver(status: StatusCode) -> (String, mpsc::UnboundedReceiver<serde_json::Value>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = Router::new()
            .route(
                "/hook",
                post(
                    move |State(tx): State<mpsc::UnboundedSender<serde_json::Value>>,
                          Json(body): Json<serde_json::Value>| async move {
                        let _ = tx.send(body);
                        status
                    },
                ),
            )
            .with_state(tx);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}/hook", addr), rx)
    }

    #[tokio::test]
    async fn webhook_posts_topic_key_and_payload() {
        let (url, mut rx) = spawn_receiver(StatusCode::NO_CONTENT).await;
        let publisher = WebhookPublisher::new(url, Duration::from_secs(5)).unwrap();

        publisher.publish(&calculated()).await.unwrap();

        let body = rx.recv().await.unwrap();
        assert_eq!(body["topic"], "cost.calculated");
        assert_eq!(body["key"], "ORD-7");
        assert_eq!(body["payload"]["data"]["costId"], "c-1");
    }

    #[tokio::test]
    async fn webhook_reports_rejection_status() {
        let (url, _rx) = spawn_receiver(StatusCode::SERVICE_UNAVAILABLE).await;
        let publisher = WebhookPublisher::new(url, Duration::from_secs(5)).unwrap();

        let err = publisher.publish(&calculated()).await.unwrap_err();
        assert!(matches!(err, PublishError::Rejected(503)));
    }

    struct Counting {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl CostEventPublisher for Counting {
        async fn publish(&self, _event: &CostEvent) -> Result<(), PublishError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(PublishError::Delivery("down".into()))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn fanout_attempts_every_publisher() {
        let failing = Arc::new(Counting {
            calls: AtomicUsize::new(0),
            fail: true,
        });
        let healthy = Arc::new(Counting {
            calls: AtomicUsize::new(0),
            fail: false,
        });
        let fanout = FanoutPublisher::new()
            .with(failing.clone())
            .with(healthy.clone());

        let result = fanout.publish(&calculated()).await;

        assert!(matches!(result, Err(PublishError::Delivery(_))));
        assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
        assert_eq!(healthy.calls.load(Ordering::SeqCst), 1);
    }
}
