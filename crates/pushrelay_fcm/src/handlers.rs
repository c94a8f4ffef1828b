//! HTTP handlers for Firebase Cloud Messaging
//!
//! This module provides the REST surface of the gateway: a send endpoint
//! that dispatches one FCM call per device token and aggregates the results,
//! and a broadcast endpoint that addresses a topic condition with a single
//! call. Handlers are designed for the Axum web framework.

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::client::{AndroidConfig, ApnsConfig, FcmClient, Message, Notification};
use pushrelay_common::validation_error;
use pushrelay_config::AppConfig;

/// Shared state for FCM handlers
#[derive(Clone)]
pub struct FcmState {
    /// The application configuration, for runtime feature flags
    pub config: Arc<AppConfig>,

    /// The FCM client used to send notifications
    pub client: Arc<FcmClient>,
}

/// Request body for sending a notification to a list of device tokens
#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SendNotificationRequest {
    /// Registration tokens of the target devices; must be non-empty
    pub tokens: Vec<String>,

    /// The notification content
    pub notification: Notification,

    /// Android-specific delivery options
    pub android: Option<AndroidConfig>,

    /// Apple Push Notification service options
    pub apns: Option<ApnsConfig>,
}

/// A device token the dispatch loop failed to deliver to
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FailedToken {
    /// The registration token the call was addressed to
    pub token: String,

    /// The error string for this call
    pub error: String,
}

/// Response body for the send endpoint
///
/// Always reports the aggregated counts. `failed_tokens` is present only
/// when at least one delivery failed.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SendNotificationResponse {
    /// Number of tokens delivered successfully
    pub success_count: usize,

    /// Number of tokens that failed
    pub failure_count: usize,

    /// The (token, error) pairs for failed deliveries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_tokens: Option<Vec<FailedToken>>,
}

/// Request body for broadcasting to a topic condition
#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BroadcastRequest {
    /// Topic condition expression, e.g. `'news' in topics`; must be non-empty
    pub condition: String,

    /// The notification content
    pub notification: Notification,

    /// Custom key-value data delivered alongside the notification
    pub data: Option<HashMap<String, String>>,

    /// Android-specific delivery options
    pub android: Option<AndroidConfig>,

    /// Apple Push Notification service options
    pub apns: Option<ApnsConfig>,
}

/// Response body for a successful broadcast
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BroadcastResponse {
    pub message: String,
}

/// Error body for a failed broadcast
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BroadcastErrorResponse {
    pub error: String,
    pub details: String,
}

/// Handler for sending push notifications to a list of device tokens
///
/// Dispatches sequentially, one FCM call per token. One token's failure does
/// not prevent attempts on the others. The response always carries the
/// aggregated counts and is 200 even when every delivery failed; only an
/// empty token list is rejected with 400.
#[axum::debug_handler]
pub async fn send_notification_handler(
    State(state): State<Arc<FcmState>>,
    Json(payload): Json<SendNotificationRequest>,
) -> Response {
    if !state.config.use_fcm {
        return (StatusCode::SERVICE_UNAVAILABLE, "FCM service is disabled.").into_response();
    }

    if payload.tokens.is_empty() {
        return validation_error("Tokens list cannot be empty").into_response();
    }

    debug!("Dispatching notification to {} device tokens", payload.tokens.len());

    let mut success_count = 0;
    let mut failure_count = 0;
    let mut failed_tokens = Vec::new();

    for token in payload.tokens {
        let message = Message {
            token: Some(token.clone()),
            condition: None,
            notification: payload.notification.clone(),
            data: None,
            android: payload.android.clone(),
            apns: payload.apns.clone(),
        };

        match state.client.send_message(message).await {
            Ok(message_id) => {
                debug!("Delivered to token {}: {}", token, message_id);
                success_count += 1;
            }
            Err(err) => {
                error!("Failed to send to token {}: {}", token, err);
                failure_count += 1;
                failed_tokens.push(FailedToken {
                    token,
                    error: err.to_string(),
                });
            }
        }
    }

    info!("Dispatch finished: {} sent, {} failed", success_count, failure_count);

    Json(SendNotificationResponse {
        success_count,
        failure_count,
        failed_tokens: if failed_tokens.is_empty() {
            None
        } else {
            Some(failed_tokens)
        },
    })
    .into_response()
}

/// Handler for broadcasting a notification to a topic condition
///
/// Issues exactly one FCM call addressed to the condition string. An upstream
/// failure is surfaced as 500 with the error string; it is not retried.
#[axum::debug_handler]
pub async fn broadcast_handler(
    State(state): State<Arc<FcmState>>,
    Json(payload): Json<BroadcastRequest>,
) -> Response {
    if !state.config.use_fcm {
        return (StatusCode::SERVICE_UNAVAILABLE, "FCM service is disabled.").into_response();
    }

    if payload.condition.trim().is_empty() {
        return validation_error("Condition cannot be empty").into_response();
    }

    let message = Message {
        token: None,
        condition: Some(payload.condition.clone()),
        notification: payload.notification,
        data: payload.data,
        android: payload.android,
        apns: payload.apns,
    };

    match state.client.send_message(message).await {
        Ok(message_id) => {
            info!(
                "Broadcast delivered to condition {}: {}",
                payload.condition, message_id
            );
            Json(BroadcastResponse {
                message: "Broadcast message successfully sent to FCM for topic condition."
                    .to_string(),
            })
            .into_response()
        }
        Err(err) => {
            error!("Failed to broadcast to condition {}: {}", payload.condition, err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(BroadcastErrorResponse {
                    error: "Failed to send broadcast".to_string(),
                    details: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}
