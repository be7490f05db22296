//! WhatsApp integration module
//!
//! ## Submodules
//!
//! - [`client`] - WhatsApp Graph API client (phone number lookup, message send)
//! - [`handler`] - Business logic for sending messages and processing webhook events
//! - [`routes`] - HTTP endpoint handlers
//! - [`schemas`] - Incoming webhook payloads
//! - [`outgoing_schemas`] - Graph API request envelopes and responses
//! - [`models`] - Request/response records of this service
//! - [`errors`] - Adapter error type

pub mod client;
pub mod errors;
pub mod handler;
pub mod models;
pub mod outgoing_schemas;
pub mod routes;
pub mod schemas;

// Re-export commonly used items for convenience
pub use routes::{receive, send, verify};
