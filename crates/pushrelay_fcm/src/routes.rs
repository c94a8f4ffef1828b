use axum::{routing::post, Router};
use pushrelay_config::AppConfig;
use std::sync::Arc;
use tracing::info;

use crate::auth::ServiceAccountTokenProvider;
use crate::client::FcmClient;
use crate::handlers::{broadcast_handler, send_notification_handler, FcmState};

/// Creates a router containing the FCM gateway routes.
///
/// Reads the service-account key once at startup; a missing FCM config
/// section or an unreadable key is a startup failure, not a per-request one.
pub async fn routes(config: Arc<AppConfig>) -> Router {
    let fcm_config = config.fcm.as_ref().expect("FCM config missing");

    let token_provider = ServiceAccountTokenProvider::from_config(fcm_config)
        .await
        .expect("Failed to load FCM credentials");

    let client = FcmClient::new(Arc::new(token_provider), fcm_config.endpoint_url.clone());

    info!("FCM routes initialized");

    routes_with_client(config, client)
}

/// Builds the router around an already-constructed client.
///
/// Split out from [`routes`] so tests can inject a client wired to a mock
/// endpoint and token source.
pub fn routes_with_client(config: Arc<AppConfig>, client: FcmClient) -> Router {
    let state = Arc::new(FcmState {
        config,
        client: Arc::new(client),
    });

    Router::new()
        .route("/send", post(send_notification_handler))
        .route("/broadcast", post(broadcast_handler))
        .with_state(state)
}
