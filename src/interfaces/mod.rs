//! Inbound adapters: REST API and WebSocket event stream

pub mod http;
pub mod ws;
