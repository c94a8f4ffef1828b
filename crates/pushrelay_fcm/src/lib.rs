//! Firebase Cloud Messaging dispatch for Pushrelay
//!
//! This crate translates inbound gateway requests into FCM HTTP v1 API calls:
//!
//! - Authentication with Firebase using service account credentials
//! - Sending push notifications to a list of device tokens, one call per
//!   token, with aggregated success/failure counts
//! - Broadcasting a notification to a topic condition
//! - Support for notification payload (title, body, image), custom data,
//!   Android priority and APNs overrides
//! - Integration with Axum for HTTP API endpoints
//! - OpenAPI documentation (with the `openapi` feature)
//!
//! # API Endpoints
//!
//! - `POST /send` - Send a push notification to a list of device tokens
//! - `POST /broadcast` - Broadcast a push notification to a topic condition

pub mod auth;
pub mod client;
#[cfg(feature = "openapi")]
pub mod doc;
pub mod handlers;
pub mod routes;


// Re-export the routes function to be used by the main backend service
pub use routes::routes;

#[cfg(feature = "openapi")]
pub mod openapi {
    pub use crate::doc::FcmApiDoc;
}
