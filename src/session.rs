use chrono::{DateTime, Utc};

use crate::api::{ApiState, AuthError};
use crate::models::{Claims, Credentials, Role, Session, SigninResponse, SignupRequest};
use crate::storage::StorageState;

/// Storage key for the bearer token entry.
pub const TOKEN_KEY: &str = "token";
/// Storage key for the serialized signin payload (roles live here).
pub const USER_KEY: &str = "user";

/// SessionStore
///
/// Single source of truth for "is the user logged in, and as whom."
///
/// The store owns no session state of its own: every query re-reads the two
/// storage entries (`"token"` and `"user"`), decodes them, and applies lazy
/// expiry invalidation. There is no background timer; an expired token is
/// simply discovered, and reported as "no session", at the next read. The
/// two entries are always interpreted together—a token without its user
/// payload (or the reverse) is no session, so a stale role can never be
/// resurrected against an absent token.
///
/// State machine: **Anonymous** → **Authenticated(roles, expiry)** on a
/// successful `login`; back to Anonymous on `logout` or on expiry.
#[derive(Clone)]
pub struct SessionStore {
    api: ApiState,
    storage: StorageState,
}

impl SessionStore {
    pub fn new(api: ApiState, storage: StorageState) -> Self {
        Self { api, storage }
    }

    /// login
    ///
    /// Delegates credential verification to the Authentication API, then
    /// constructs and persists the session. Both storage entries are
    /// written, token first, so a reader never sees roles without a token.
    ///
    /// Fails with `InvalidCredentials` when the backend rejects the
    /// credentials and `Network` when it is unreachable; neither is retried
    /// here. A success payload whose token carries no readable expiry claim
    /// is `MalformedResponse`: such a token could never satisfy
    /// `is_authenticated` and must not be stored.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let response = self.api.signin(credentials).await?;

        let expires_at = token_expiry(&response.access_token).ok_or_else(|| {
            AuthError::MalformedResponse("access token carries no readable expiry claim".into())
        })?;

        let roles = response.roles.normalize();

        let payload = serde_json::to_string(&response)
            .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

        self.storage
            .set(TOKEN_KEY, &response.access_token)
            .map_err(AuthError::Storage)?;
        self.storage
            .set(USER_KEY, &payload)
            .map_err(AuthError::Storage)?;

        tracing::info!(roles = ?roles, expires_at = %expires_at, "session established");

        Ok(Session {
            token: response.access_token,
            roles,
            expires_at,
        })
    }

    /// register
    ///
    /// Forwards a registration request to the Authentication API and returns
    /// its confirmation message. Registration does not establish a session;
    /// the user signs in afterwards.
    pub async fn register(&self, request: &SignupRequest) -> Result<String, AuthError> {
        let response = self.api.signup(request).await?;
        tracing::info!(username = %request.username, "registration accepted");
        Ok(response.message)
    }

    /// logout
    ///
    /// Clears both persisted entries unconditionally. Idempotent: calling it
    /// while already logged out is a no-op.
    pub fn logout(&self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(USER_KEY);
        tracing::debug!("session cleared");
    }

    /// is_authenticated
    ///
    /// True iff a token is stored, decodable, and not yet expired. Malformed
    /// stored state is silent de-authentication—this never panics and never
    /// returns an error.
    pub fn is_authenticated(&self) -> bool {
        self.current_session().is_some()
    }

    /// role
    ///
    /// The primary canonical role of the current session (Admin > Employee >
    /// Intern precedence), or `None` when there is no valid session or the
    /// session holds no recognized role.
    pub fn role(&self) -> Option<Role> {
        self.current_session().and_then(|s| s.primary_role())
    }

    /// The bearer token, for callers that attach Authorization headers.
    /// Absent whenever `is_authenticated` is false.
    pub fn token(&self) -> Option<String> {
        self.current_session().map(|s| s.token)
    }

    /// current_session
    ///
    /// Re-derives the session from storage. Returns `None` when either entry
    /// is missing, when either fails to decode, or when the token has
    /// expired. An expired or undecodable session is indistinguishable from
    /// no session to every caller.
    pub fn current_session(&self) -> Option<Session> {
        let token = self.storage.get(TOKEN_KEY)?;
        let payload = self.storage.get(USER_KEY)?;

        let expires_at = match token_expiry(&token) {
            Some(ts) => ts,
            None => {
                tracing::debug!("stored token is undecodable; treating as no session");
                return None;
            }
        };

        let response: SigninResponse = match serde_json::from_str(&payload) {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(error = %e, "stored user payload is undecodable; treating as no session");
                return None;
            }
        };

        let session = Session {
            token,
            roles: response.roles.normalize(),
            expires_at,
        };

        // Lazy invalidation: expiry is only ever discovered here.
        if !session.is_valid_at(Utc::now()) {
            return None;
        }

        Some(session)
    }
}

/// token_expiry
///
/// Reads the `exp` claim out of a bearer token. The client never holds the
/// signing secret, so the signature is deliberately not verified—trusting
/// the token's content is the server's job on every API call; this client
/// only needs the validity window. Expiry itself is also not enforced here:
/// callers compare against their own clock, so an already-expired token
/// still yields its timestamp.
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let data = jsonwebtoken::dangerous::insecure_decode::<Claims>(token).ok()?;
    DateTime::from_timestamp(data.claims.exp, 0)
}
