//! WebSocket interfaces
//!
//! - `notifications`: live cost event stream

pub mod notifications;

pub use notifications::{
    create_notification_state, ws_notifications_handler, EventFilter, NotificationState,
};
