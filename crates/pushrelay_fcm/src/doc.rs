#![allow(dead_code)]
use utoipa::OpenApi;

use crate::client::{AndroidConfig, ApnsAps, ApnsConfig, ApnsPayload, FcmRequest, Message, Notification};
use crate::handlers::{
    BroadcastErrorResponse, BroadcastRequest, BroadcastResponse, FailedToken,
    SendNotificationRequest, SendNotificationResponse,
};

#[utoipa::path(
    post,
    path = "/send",
    request_body(content = SendNotificationRequest, example = json!({
        "tokens": ["fcm-registration-token-1", "fcm-registration-token-2"],
        "notification": {
            "title": "New Message",
            "body": "You have received a new message"
        },
        "android": { "priority": "high" }
    })),
    responses(
        (status = 200, description = "Dispatch finished, results aggregated", body = SendNotificationResponse,
         example = json!({
             "success_count": 1,
             "failure_count": 1,
             "failed_tokens": [
                 { "token": "fcm-registration-token-2", "error": "FCM error 404: requested entity was not found" }
             ]
         })
        ),
        (status = 400, description = "Empty token list or malformed body"),
        (status = 503, description = "FCM service disabled")
    ),
    tag = "FCM"
)]
fn doc_send_notification_handler() {}

#[utoipa::path(
    post,
    path = "/broadcast",
    request_body(content = BroadcastRequest, example = json!({
        "condition": "'news' in topics",
        "notification": {
            "title": "Breaking",
            "body": "Something happened"
        },
        "data": { "article_id": "123456" }
    })),
    responses(
        (status = 200, description = "Broadcast accepted by FCM", body = BroadcastResponse),
        (status = 400, description = "Empty condition or malformed body"),
        (status = 500, description = "Upstream FCM call failed", body = BroadcastErrorResponse),
        (status = 503, description = "FCM service disabled")
    ),
    tag = "FCM"
)]
fn doc_broadcast_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_send_notification_handler,
        doc_broadcast_handler,
    ),
    components(
        schemas(
            SendNotificationRequest,
            SendNotificationResponse,
            FailedToken,
            BroadcastRequest,
            BroadcastResponse,
            BroadcastErrorResponse,
            FcmRequest,
            Message,
            Notification,
            AndroidConfig,
            ApnsConfig,
            ApnsPayload,
            ApnsAps,
        )
    ),
    tags(
        (name = "FCM", description = "Firebase Cloud Messaging gateway API")
    )
)]
pub struct FcmApiDoc;
