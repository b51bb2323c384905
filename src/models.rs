use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Canonical Role Enumeration ---

/// Role
///
/// The single normalized representation of a user's permission level. The
/// backend is inconsistent about how it spells roles (`"ROLE_ADMIN"`,
/// `"admin"`, a numeric id); all of those raw forms are converted to this
/// enum at the API/storage boundary, and every other component consumes only
/// the canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
    Intern,
}

impl Role {
    /// Normalizes a raw role name from the backend.
    ///
    /// Accepts the short form (`"admin"`), the prefixed form (`"ROLE_ADMIN"`),
    /// and `"administrator"` as an alias of Admin, case-insensitively.
    /// Unrecognized names yield `None` rather than an error.
    pub fn from_name(raw: &str) -> Option<Role> {
        let name = raw.trim();
        let name = name.strip_prefix("ROLE_").unwrap_or(name);
        match name.to_ascii_lowercase().as_str() {
            "admin" | "administrator" => Some(Role::Admin),
            "employee" => Some(Role::Employee),
            "intern" => Some(Role::Intern),
            _ => None,
        }
    }

    /// Normalizes a numeric role id (the backend's role-table ordering).
    pub fn from_id(id: i64) -> Option<Role> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Employee),
            3 => Some(Role::Intern),
            _ => None,
        }
    }

    /// primary
    ///
    /// Resolves the primary role of a session holding zero or more roles,
    /// using the fixed precedence Admin > Employee > Intern. Returns `None`
    /// when the set holds no recognized role.
    pub fn primary(roles: &[Role]) -> Option<Role> {
        [Role::Admin, Role::Employee, Role::Intern]
            .into_iter()
            .find(|candidate| roles.contains(candidate))
    }

    /// The canonical lowercase short name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
            Role::Intern => "intern",
        }
    }

    /// dashboard_path
    ///
    /// The post-login landing route for this role. Login flows navigate to
    /// `/{role}/dashboard` after a session is established.
    pub fn dashboard_path(&self) -> String {
        format!("/{}/dashboard", self.as_str())
    }
}

// --- Wire-Shape Decoding ---

/// RoleClaim
///
/// One raw role value as the backend may transmit it: either a name string
/// or a numeric role id. Decoded as an untagged union so the polymorphism
/// is confined to this type instead of leaking runtime type inspection
/// downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleClaim {
    Name(String),
    Id(i64),
}

impl RoleClaim {
    fn normalize(&self) -> Option<Role> {
        match self {
            RoleClaim::Name(name) => Role::from_name(name),
            RoleClaim::Id(id) => Role::from_id(*id),
        }
    }
}

/// RoleClaims
///
/// The role field of an auth response. Some backend builds send a list,
/// others a single value; both shapes decode here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleClaims {
    Many(Vec<RoleClaim>),
    One(RoleClaim),
}

impl Default for RoleClaims {
    fn default() -> Self {
        RoleClaims::Many(Vec::new())
    }
}

impl RoleClaims {
    /// normalize
    ///
    /// Converts the raw claims to canonical roles. Unrecognized values are
    /// skipped with a warning; they never fail the whole set.
    pub fn normalize(&self) -> Vec<Role> {
        let claims: &[RoleClaim] = match self {
            RoleClaims::Many(claims) => claims,
            RoleClaims::One(claim) => std::slice::from_ref(claim),
        };

        claims
            .iter()
            .filter_map(|claim| {
                let role = claim.normalize();
                if role.is_none() {
                    tracing::warn!(claim = ?claim, "skipping unrecognized role claim");
                }
                role
            })
            .collect()
    }
}

// --- Token Payload ---

/// Claims
///
/// The subset of the JWT payload this client reads. Only `exp` is required:
/// it drives session validity. The token is otherwise opaque; its signature
/// belongs to the server.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the username or user id the backend put in the token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Expiration time, seconds since the Unix epoch.
    pub exp: i64,
    /// Issued-at time, seconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

// --- Session ---

/// Session
///
/// The client's record of the currently authenticated identity and its
/// validity window. Constructed on login and re-derived from storage on
/// every read; never cached in memory across calls.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// The opaque bearer credential, attached verbatim to API requests.
    pub token: String,
    /// All recognized roles held by the user.
    pub roles: Vec<Role>,
    /// Expiry derived from the token's `exp` claim.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// True while the expiry claim is still in the future.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    /// The primary role under the Admin > Employee > Intern precedence.
    pub fn primary_role(&self) -> Option<Role> {
        Role::primary(&self.roles)
    }
}

// --- Request Payloads (Input Schemas) ---

/// Credentials
///
/// Input payload for the signin endpoint (POST /auth/signin).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// SignupRequest
///
/// Input payload for the registration endpoint (POST /auth/signup).
/// The password is passed through to the backend and never persisted or
/// logged by this client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Optional numeric role id; the backend defaults new accounts when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i64>,
}

// --- Response Payloads (Output Schemas) ---

/// SigninResponse
///
/// The successful signin payload. This exact structure is what gets
/// serialized into the `"user"` storage entry, so roles survive reloads
/// alongside the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninResponse {
    pub access_token: String,
    #[serde(default)]
    pub roles: RoleClaims,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// SignupResponse
///
/// Registration confirmation. The backend answers with a human-readable
/// message; nothing else in it is consulted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupResponse {
    #[serde(default)]
    pub message: String,
}

/// ApiErrorBody
///
/// The error payload shape on non-2xx auth responses. `message` is shown to
/// the user inline by login forms.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: Option<String>,
}
