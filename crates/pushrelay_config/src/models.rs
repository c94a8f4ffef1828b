// --- File: crates/pushrelay_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- FCM Config ---
// Holds non-secret FCM settings. The service-account key itself stays on disk
// and is only referenced by path here.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FcmConfig {
    /// Path to the Google service-account JSON key file.
    pub credentials_file: Option<String>,
    /// OAuth2 scopes requested for outbound calls. When empty, the client
    /// falls back to the Firebase Cloud Messaging scope.
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Endpoint template for the FCM HTTP v1 send call. The first `%s` is
    /// replaced with the project id read from the service-account key.
    pub endpoint_url: Option<String>,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_fcm: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub fcm: Option<FcmConfig>,
}
