use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::models::{ApiErrorBody, Credentials, SigninResponse, SignupRequest, SignupResponse};

// --- Error Taxonomy ---

/// AuthError
///
/// Every failure the authentication subsystem can surface to a caller.
/// None of these is fatal to the process: credentials and network problems
/// resolve to a user-visible message, and role mismatches are navigation
/// redirects handled by the gate, not errors at all.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The backend rejected the signin credentials. Carries the backend's
    /// human-readable message for inline display. User-correctable.
    #[error("{0}")]
    InvalidCredentials(String),

    /// The backend refused a registration request (username taken, weak
    /// password, ...). Carries the backend's message. User-correctable.
    #[error("{0}")]
    Rejected(String),

    /// The authentication service was unreachable. User-correctable via
    /// retry; this client never retries automatically.
    #[error("authentication service unreachable: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered 2xx with a payload this client cannot use
    /// (undecodable body, or a token with no readable expiry claim).
    #[error("malformed authentication response: {0}")]
    MalformedResponse(String),

    /// The storage backend refused to persist the session. A login that
    /// cannot be persisted must not report success.
    #[error("session storage failure: {0}")]
    Storage(String),
}

// --- AuthApi Contract ---

/// AuthApi
///
/// The external Authentication API collaborator. Credential verification is
/// entirely the backend's job; this trait is the seam that lets tests drive
/// the SessionStore with a canned implementation instead of a live server.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// POST /auth/signin. Returns the token-and-roles payload on success.
    async fn signin(&self, credentials: &Credentials) -> Result<SigninResponse, AuthError>;

    /// POST /auth/signup. Registration; not consulted by the gate.
    async fn signup(&self, request: &SignupRequest) -> Result<SignupResponse, AuthError>;
}

/// ApiState
///
/// The concrete type used to share the auth API client across the store.
pub type ApiState = Arc<dyn AuthApi>;

// --- The Real Implementation (HTTP) ---

/// HttpAuthApi
///
/// The reqwest-backed implementation talking to the portal backend.
/// Transport failures map to `AuthError::Network`; any non-2xx status maps
/// to `AuthError::InvalidCredentials` carrying the error payload's message.
#[derive(Clone)]
pub struct HttpAuthApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    /// Constructs the client for a base URL such as `http://localhost:8080/api`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Extracts the backend's error message from a rejected response,
    /// falling back to the HTTP status when the body is not the expected
    /// `{ "message": ... }` shape.
    async fn rejection_message(response: reqwest::Response) -> String {
        let status = response.status();
        response
            .json::<ApiErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| format!("authentication rejected with status {status}"))
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn signin(&self, credentials: &Credentials) -> Result<SigninResponse, AuthError> {
        let url = format!("{}/auth/signin", self.base_url);

        let response = self.client.post(url).json(credentials).send().await?;

        if !response.status().is_success() {
            let message = Self::rejection_message(response).await;
            tracing::debug!(%message, "signin rejected by backend");
            return Err(AuthError::InvalidCredentials(message));
        }

        response
            .json::<SigninResponse>()
            .await
            .map_err(|e| AuthError::MalformedResponse(e.to_string()))
    }

    async fn signup(&self, request: &SignupRequest) -> Result<SignupResponse, AuthError> {
        let url = format!("{}/auth/signup", self.base_url);

        let response = self.client.post(url).json(request).send().await?;

        if !response.status().is_success() {
            let message = Self::rejection_message(response).await;
            tracing::debug!(%message, "signup rejected by backend");
            return Err(AuthError::Rejected(message));
        }

        response
            .json::<SignupResponse>()
            .await
            .map_err(|e| AuthError::MalformedResponse(e.to_string()))
    }
}

// --- The Mock Implementation (For Tests) ---

/// MockAuthApi
///
/// A canned implementation of `AuthApi` used by integration tests to drive
/// the SessionStore without a network connection. Configure it with the
/// response the "backend" should give.
#[derive(Default)]
pub struct MockAuthApi {
    /// The payload returned by `signin` when no rejection is configured.
    pub signin_response: Option<SigninResponse>,
    /// When set, `signin` fails with `InvalidCredentials` and `signup` with
    /// `Rejected`, each carrying this message.
    pub reject_with: Option<String>,
    /// The message returned by `signup`.
    pub signup_message: String,
}

impl MockAuthApi {
    pub fn succeeding(response: SigninResponse) -> Self {
        Self {
            signin_response: Some(response),
            ..Self::default()
        }
    }

    pub fn rejecting(message: &str) -> Self {
        Self {
            reject_with: Some(message.to_string()),
            ..Self::default()
        }
    }
}

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn signin(&self, _credentials: &Credentials) -> Result<SigninResponse, AuthError> {
        if let Some(message) = &self.reject_with {
            return Err(AuthError::InvalidCredentials(message.clone()));
        }

        self.signin_response
            .clone()
            .ok_or_else(|| AuthError::MalformedResponse("mock has no signin response".into()))
    }

    async fn signup(&self, _request: &SignupRequest) -> Result<SignupResponse, AuthError> {
        if let Some(message) = &self.reject_with {
            return Err(AuthError::Rejected(message.clone()));
        }

        Ok(SignupResponse {
            message: self.signup_message.clone(),
        })
    }
}
