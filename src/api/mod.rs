//! # API Module
//!
//! Service endpoints that are not part of the messaging relay, plus the
//! application state shared by every handler.
//!
//! ## Modules
//!
//! - [`health`] - Liveness and database probes
//! - [`reference`] - OpenAPI document and API reference page

pub mod health;
pub mod reference;

use crate::{repo, webhook};

pub struct AppState {
    pub whatsapp_api: webhook::whatsapp::client::ImplMessagingApi,
    pub repo: repo::ImplDbRepo,
    /// Token expected in `hub.verify_token`
    pub webhook_secret: String,
}
