//! Authentication for Firebase Cloud Messaging
//!
//! This module obtains OAuth2 bearer tokens for the FCM HTTP v1 API from a
//! service-account key file. Token acquisition sits behind the
//! [`AccessTokenProvider`] trait so the client can be exercised in tests
//! without a live OAuth2 exchange; the production implementation delegates
//! entirely to yup-oauth2.

use async_trait::async_trait;
use pushrelay_config::FcmConfig;
use std::path::Path;
use yup_oauth2::{read_service_account_key, ServiceAccountAuthenticator, ServiceAccountKey};

use crate::client::FcmError;

/// OAuth2 scope requested when the configuration lists none.
pub const FCM_MESSAGING_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

/// Source of bearer tokens and the project id for outbound FCM calls.
///
/// Every outbound call asks the provider for a token immediately before use.
/// Caching and refresh policy belong to the implementation.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Returns a bearer token valid for the FCM messaging scope.
    async fn access_token(&self) -> Result<String, FcmError>;

    /// The Google Cloud project id the credentials belong to.
    fn project_id(&self) -> &str;
}

/// Token provider backed by a Google service-account key file.
pub struct ServiceAccountTokenProvider {
    sa_key: ServiceAccountKey,
    scopes: Vec<String>,
    project_id: String,
}

impl ServiceAccountTokenProvider {
    /// Reads the service-account key referenced by the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `credentials_file` is missing from the
    /// configuration, the key file cannot be read or parsed, or the key
    /// carries no project id.
    pub async fn from_config(config: &FcmConfig) -> Result<Self, FcmError> {
        let key_path = config
            .credentials_file
            .as_deref()
            .ok_or_else(|| FcmError::ConfigError("Missing credentials_file in FcmConfig".to_string()))?;

        let sa_key = read_service_account_key(Path::new(key_path))
            .await
            .map_err(|e| {
                FcmError::AuthError(format!("Failed to read credentials file {}: {}", key_path, e))
            })?;

        let project_id = sa_key.project_id.clone().ok_or_else(|| {
            FcmError::AuthError(format!("Credentials file {} has no project_id", key_path))
        })?;

        let scopes = if config.scopes.is_empty() {
            vec![FCM_MESSAGING_SCOPE.to_string()]
        } else {
            config.scopes.clone()
        };

        Ok(Self {
            sa_key,
            scopes,
            project_id,
        })
    }
}

#[async_trait]
impl AccessTokenProvider for ServiceAccountTokenProvider {
    async fn access_token(&self) -> Result<String, FcmError> {
        let auth = ServiceAccountAuthenticator::builder(self.sa_key.clone())
            .build()
            .await
            .map_err(|e| FcmError::AuthError(e.to_string()))?;

        let auth_token = auth
            .token(&self.scopes)
            .await
            .map_err(|e| FcmError::AuthError(e.to_string()))?;

        match auth_token.token() {
            Some(token) => Ok(token.to_string()),
            None => Err(FcmError::AuthError("No token available".to_string())),
        }
    }

    fn project_id(&self) -> &str {
        &self.project_id
    }
}
