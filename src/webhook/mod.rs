//! Endpoints relaying an external messaging platform
//!
//! ## Modules
//!
//! - [`whatsapp`] - WhatsApp Business API send, webhook and handshake handlers

pub mod routes;
pub mod whatsapp;
