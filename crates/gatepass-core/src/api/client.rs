//! API client for the ticketing and check-in REST service.
//!
//! This module provides the `ApiClient` struct. Every request goes through
//! one dispatch path that reads the bearer token from the injected
//! `TokenStore` and attaches it when present.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{ApiError, Capability};
use crate::auth::TokenStore;
use crate::config::{Config, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::models::{
    Acknowledgement, ChangePasswordRequest, CheckInLog, LoginRequest, LoginSession, Profile,
    RecoveryRequest, ResetPasswordRequest, Ticket, UpdateProfileRequest, VerifyOtpRequest,
};

/// API client for the ticketing service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Create a client with the default request timeout
    pub fn new(base_url: impl Into<String>, store: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        Self::with_timeout(
            base_url,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            store,
        )
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
        store: Arc<dyn TokenStore>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            store,
        })
    }

    pub fn from_config(config: &Config, store: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        Self::with_timeout(
            config.base_url(),
            Duration::from_secs(config.request_timeout_secs),
            store,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The token store this client reads from
    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    fn url(&self, capability: Capability) -> String {
        format!("{}{}", self.base_url, capability.path())
    }

    /// Send one request and return the raw response payload.
    ///
    /// JSON bodies come back parsed, non-JSON text comes back as a
    /// `Value::String`, and an empty body is `Value::Null`.
    async fn dispatch<B: Serialize + ?Sized>(
        &self,
        capability: Capability,
        body: Option<&B>,
    ) -> Result<Value, ApiError> {
        let token = self.store.get().await?;

        debug!(
            capability = %capability,
            authorized = token.is_some(),
            "Dispatching request"
        );

        let mut request = self
            .client
            .request(capability.method(), self.url(capability))
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json");

        if let Some(ref token) = token {
            request = request.bearer_auth(token);
        }
        // Read capabilities never carry a body, even if one is passed
        if let Some(body) = body.filter(|_| capability.has_body()) {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(capability = %capability, status = %status, "Request rejected");
            return Err(ApiError::from_status(status, &text));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }

    async fn call<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        capability: Capability,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let payload = self.dispatch(capability, body).await?;
        serde_json::from_value(payload)
            .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", capability, e)))
    }

    async fn get<T: DeserializeOwned>(&self, capability: Capability) -> Result<T, ApiError> {
        self.call(capability, None::<&()>).await
    }

    async fn acknowledge<B: Serialize + ?Sized>(
        &self,
        capability: Capability,
        body: &B,
    ) -> Result<Acknowledgement, ApiError> {
        let payload = self.dispatch(capability, Some(body)).await?;
        Ok(Acknowledgement::from_payload(payload))
    }

    // ===== Authentication =====

    /// Log in and persist the returned token.
    ///
    /// The store is written only after a successful response that carries a
    /// non-empty token; any failure leaves it untouched.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<LoginSession, ApiError> {
        let session: LoginSession = self
            .call(Capability::Authenticate, Some(&LoginRequest { username, password }))
            .await?;

        if session.token.trim().is_empty() {
            return Err(ApiError::InvalidResponse(
                "login response contained an empty token".to_string(),
            ));
        }

        self.store.set(&session.token).await?;
        info!(username = username, "Login successful");
        Ok(session)
    }

    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<Acknowledgement, ApiError> {
        self.acknowledge(
            Capability::ChangePassword,
            &ChangePasswordRequest {
                old_password,
                new_password,
            },
        )
        .await
    }

    /// Ask the service to send a recovery code to the account's email
    pub async fn request_recovery(&self, email_or_username: &str) -> Result<Acknowledgement, ApiError> {
        self.acknowledge(Capability::RequestRecovery, &RecoveryRequest { email_or_username })
            .await
    }

    pub async fn verify_recovery_code(
        &self,
        email_or_username: &str,
        otp: &str,
    ) -> Result<Acknowledgement, ApiError> {
        self.acknowledge(
            Capability::VerifyRecoveryCode,
            &VerifyOtpRequest {
                email_or_username,
                otp,
            },
        )
        .await
    }

    pub async fn complete_recovery(
        &self,
        email_or_username: &str,
        new_password: &str,
    ) -> Result<Acknowledgement, ApiError> {
        self.acknowledge(
            Capability::CompleteRecovery,
            &ResetPasswordRequest {
                email_or_username,
                new_password,
            },
        )
        .await
    }

    // ===== Profile =====

    pub async fn fetch_profile(&self) -> Result<Profile, ApiError> {
        self.get(Capability::FetchProfile).await
    }

    pub async fn update_profile(
        &self,
        name: &str,
        phone: &str,
        age: Option<u32>,
    ) -> Result<Profile, ApiError> {
        let body = UpdateProfileRequest { name, phone, age };
        match self.dispatch(Capability::UpdateProfile, Some(&body)).await? {
            // Some deployments answer with a bare confirmation string
            Value::Object(map) => serde_json::from_value(Value::Object(map)).map_err(|e| {
                ApiError::InvalidResponse(format!("{}: {}", Capability::UpdateProfile, e))
            }),
            _ => Ok(Profile::default()),
        }
    }

    // ===== Tickets and check-ins =====

    pub async fn fetch_tickets(&self) -> Result<Vec<Ticket>, ApiError> {
        let tickets: Option<Vec<Ticket>> = self.get(Capability::FetchTickets).await?;
        Ok(tickets.unwrap_or_default())
    }

    pub async fn fetch_check_in_logs(&self) -> Result<Vec<CheckInLog>, ApiError> {
        let logs: Option<Vec<CheckInLog>> = self.get(Capability::FetchCheckInLogs).await?;
        Ok(logs.unwrap_or_default())
    }
}
