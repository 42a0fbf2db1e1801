//! Application events (pub/sub)
//!
//! Event types are defined in `domain::events`. The in-process
//! `EventBus` and the downstream publishers live here.

pub mod event_bus;
pub mod publisher;

pub use event_bus::{create_event_bus, EventBus, EventSubscriber, SharedEventBus};
pub use publisher::{CostEventPublisher, FanoutPublisher, SharedPublisher, WebhookPublisher};
