//! Firebase Cloud Messaging client module
//!
//! This module provides a client for the Firebase Cloud Messaging (FCM)
//! HTTP v1 API. It includes the wire-format data structures for FCM messages
//! and the `FcmClient` struct, which attaches bearer authentication and sends
//! a message to a device token or to a topic condition.

use crate::auth::AccessTokenProvider;
use pushrelay_common::{external_service_error, GatewayError, HttpStatusCode, HTTP_CLIENT};
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Default endpoint template for the FCM HTTP v1 send call. The first `%s`
/// is replaced with the project id.
pub const DEFAULT_ENDPOINT_TEMPLATE: &str =
    "https://fcm.googleapis.com/v1/projects/%s/messages:send";

/// Errors that can occur when interacting with the Firebase Cloud Messaging API
#[derive(Error, Debug)]
pub enum FcmError {
    /// Error during authentication with Firebase
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Error during HTTP request to the FCM API
    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Missing required configuration
    #[error("Missing configuration: {0}")]
    ConfigError(String),

    /// Non-success response returned by the FCM API
    #[error("FCM error {status_code}: {message}")]
    ApiError { status_code: u16, message: String },
}

/// Convert FcmError to GatewayError
impl From<FcmError> for GatewayError {
    fn from(err: FcmError) -> Self {
        match err {
            FcmError::AuthError(msg) => GatewayError::AuthError(msg),
            FcmError::RequestError(e) => GatewayError::HttpError(format!("FCM request error: {}", e)),
            FcmError::ConfigError(msg) => GatewayError::ConfigError(msg),
            FcmError::ApiError {
                status_code,
                message,
            } => external_service_error("FCM", format!("Status: {}, Message: {}", status_code, message)),
        }
    }
}

impl HttpStatusCode for FcmError {
    fn status_code(&self) -> u16 {
        match self {
            FcmError::AuthError(_) => 401,
            FcmError::RequestError(_) => 500,
            FcmError::ConfigError(_) => 500,
            FcmError::ApiError { .. } => 502,
        }
    }
}

/// A message to be sent via Firebase Cloud Messaging
///
/// This is the top-level structure that wraps a Message object
/// according to the FCM HTTP v1 API format.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FcmRequest {
    /// The message payload
    pub message: Message,
}

/// The message payload for Firebase Cloud Messaging
///
/// Contains the target (a device token or a topic condition), the
/// notification content, and optional platform overrides.
#[derive(Debug, Serialize, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Message {
    /// Registration token of the target device. Either `token` or
    /// `condition` is set, never both.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Topic condition expression the target devices are subscribed to,
    /// e.g. `'news' in topics`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,

    /// The notification to be displayed on the user's device
    pub notification: Notification,

    /// Custom key-value data delivered alongside the notification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<HashMap<String, String>>,

    /// Android-specific delivery options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android: Option<AndroidConfig>,

    /// Apple Push Notification service options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apns: Option<ApnsConfig>,
}

/// The notification to be displayed on the user's device
#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Notification {
    /// The title of the notification
    pub title: String,

    /// The body text of the notification
    pub body: String,

    /// Optional image URL shown with the notification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Android-specific delivery options
#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AndroidConfig {
    /// Delivery priority, `normal` or `high`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

/// Apple Push Notification service options
#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApnsConfig {
    /// Raw APNs headers, e.g. `apns-priority`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,

    /// APNs payload wrapping the `aps` dictionary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<ApnsPayload>,
}

/// APNs payload wrapping the `aps` dictionary
#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApnsPayload {
    pub aps: ApnsAps,
}

/// The APNs `aps` dictionary
#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApnsAps {
    #[serde(rename = "mutable-content", skip_serializing_if = "Option::is_none")]
    pub mutable_content: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
}

/// Response from the Firebase Cloud Messaging API
#[derive(Debug, Deserialize)]
pub struct FcmResponse {
    /// The unique ID of the message, a string in the format
    /// "projects/{project_id}/messages/{message_id}"
    pub name: String,
}

/// Client for the Firebase Cloud Messaging HTTP v1 API
///
/// Obtains a bearer token from its [`AccessTokenProvider`] immediately before
/// each call and POSTs the message to the configured endpoint.
pub struct FcmClient {
    /// HTTP client for making requests to the FCM API
    client: Client,

    /// Source of bearer tokens and the project id
    token_provider: Arc<dyn AccessTokenProvider>,

    /// Endpoint template; `%s` is replaced with the project id
    endpoint_template: String,
}

impl FcmClient {
    /// Creates a new FCM client.
    ///
    /// Uses the shared application HTTP client. When `endpoint_template` is
    /// `None`, the production FCM endpoint is used.
    pub fn new(
        token_provider: Arc<dyn AccessTokenProvider>,
        endpoint_template: Option<String>,
    ) -> Self {
        Self {
            client: HTTP_CLIENT.clone(),
            token_provider,
            endpoint_template: endpoint_template
                .unwrap_or_else(|| DEFAULT_ENDPOINT_TEMPLATE.to_string()),
        }
    }

    /// The send endpoint with the project id substituted into the template.
    pub fn endpoint(&self) -> String {
        self.endpoint_template
            .replacen("%s", self.token_provider.project_id(), 1)
    }

    /// Sends one message via Firebase Cloud Messaging.
    ///
    /// # Returns
    ///
    /// On success, the message ID reported by FCM. A non-success status from
    /// the API is returned as [`FcmError::ApiError`] carrying the status code
    /// and the raw response body; the call is not retried.
    pub async fn send_message(&self, message: Message) -> Result<String, FcmError> {
        let url = self.endpoint();

        let token = self.token_provider.access_token().await?;

        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .json(&FcmRequest { message })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            return Err(FcmError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let fcm_response: FcmResponse = response.json().await?;
        Ok(fcm_response.name)
    }
}
