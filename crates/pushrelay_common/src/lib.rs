// --- File: crates/pushrelay_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error handling
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities

// Re-export error types and utilities for easier access
pub use error::{
    config_error, external_service_error, internal_error, validation_error, GatewayError,
    HttpStatusCode,
};

// Re-export HTTP utilities for easier access
pub use http::{
    client::{create_client, HTTP_CLIENT},
    IntoHttpResponse,
};
