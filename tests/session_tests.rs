use chrono::Utc;
use intern_portal_client::{
    MemoryStorage, MockAuthApi, Role, SessionStore,
    models::Claims,
    session::{TOKEN_KEY, USER_KEY},
    storage::StorageState,
};
use jsonwebtoken::{EncodingKey, Header, encode};
use std::sync::Arc;

// --- Helper Functions ---

const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";

/// Mints an HS256 token whose expiry is `exp_offset` seconds from now
/// (negative for already-expired tokens).
fn create_token(exp_offset: i64) -> String {
    let now = Utc::now().timestamp();

    let claims = Claims {
        sub: Some("test-user".to_string()),
        exp: now + exp_offset,
        iat: Some(now),
    };

    let key = EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

/// A store over fresh in-memory storage; the API is never called by these
/// tests, so the default mock suffices.
fn empty_store() -> (SessionStore, StorageState) {
    let storage: StorageState = Arc::new(MemoryStorage::new());
    let store = SessionStore::new(Arc::new(MockAuthApi::default()), storage.clone());
    (store, storage)
}

/// Writes both session entries the way a completed login would.
fn seed_session(storage: &StorageState, token: &str, roles: serde_json::Value) {
    storage.set(TOKEN_KEY, token).unwrap();
    let payload = serde_json::json!({ "accessToken": token, "roles": roles });
    storage.set(USER_KEY, &payload.to_string()).unwrap();
}

// --- Expiry Properties ---

#[test]
fn token_with_future_expiry_is_authenticated() {
    let (store, storage) = empty_store();
    seed_session(&storage, &create_token(3600), serde_json::json!(["ROLE_INTERN"]));

    assert!(store.is_authenticated());
}

#[test]
fn token_with_past_expiry_is_not_authenticated() {
    let (store, storage) = empty_store();
    seed_session(&storage, &create_token(-3600), serde_json::json!(["ROLE_INTERN"]));

    assert!(!store.is_authenticated());
    assert_eq!(store.role(), None);
    assert_eq!(store.token(), None);
}

#[test]
fn no_stored_token_is_not_authenticated() {
    let (store, _storage) = empty_store();

    assert!(!store.is_authenticated());
    assert_eq!(store.role(), None);
}

#[test]
fn malformed_token_is_not_authenticated() {
    let (store, storage) = empty_store();
    seed_session(&storage, "not-a-jwt", serde_json::json!(["ROLE_ADMIN"]));

    // Must resolve to "no session", never panic.
    assert!(!store.is_authenticated());
    assert_eq!(store.role(), None);
}

#[test]
fn token_expiry_reads_expired_tokens() {
    // Expiry enforcement is the caller's job: decoding must not reject a
    // token just because its exp is already in the past.
    let expiry = intern_portal_client::session::token_expiry(&create_token(-3600));

    assert!(expiry.is_some());
    assert!(expiry.unwrap() < Utc::now());
}

#[test]
fn token_expiry_rejects_garbage() {
    assert_eq!(intern_portal_client::session::token_expiry("not-a-jwt"), None);
    assert_eq!(intern_portal_client::session::token_expiry(""), None);
}

// --- Dual-Entry Invariant ---

#[test]
fn token_without_user_payload_is_not_authenticated() {
    let (store, storage) = empty_store();
    storage.set(TOKEN_KEY, &create_token(3600)).unwrap();

    assert!(!store.is_authenticated());
}

#[test]
fn user_payload_without_token_is_not_authenticated() {
    let (store, storage) = empty_store();
    let payload = serde_json::json!({ "accessToken": "x", "roles": ["ROLE_ADMIN"] });
    storage.set(USER_KEY, &payload.to_string()).unwrap();

    // A stale role must never be resurrected against an absent token.
    assert!(!store.is_authenticated());
    assert_eq!(store.role(), None);
}

#[test]
fn corrupt_user_payload_is_not_authenticated() {
    let (store, storage) = empty_store();
    storage.set(TOKEN_KEY, &create_token(3600)).unwrap();
    storage.set(USER_KEY, "{{{ not json").unwrap();

    assert!(!store.is_authenticated());
}

// --- Logout ---

#[test]
fn logout_clears_session_and_is_idempotent() {
    let (store, storage) = empty_store();
    seed_session(&storage, &create_token(3600), serde_json::json!(["ROLE_ADMIN"]));
    assert!(store.is_authenticated());

    store.logout();
    assert!(!store.is_authenticated());
    assert_eq!(store.role(), None);

    // Calling logout twice has the same effect as once.
    store.logout();
    assert!(!store.is_authenticated());
    assert_eq!(store.role(), None);
}

// --- Role Resolution ---

#[test]
fn prefixed_role_is_canonicalized() {
    let (store, storage) = empty_store();
    seed_session(&storage, &create_token(3600), serde_json::json!(["ROLE_EMPLOYEE"]));

    assert_eq!(store.role(), Some(Role::Employee));
}

#[test]
fn role_precedence_prefers_admin() {
    let (store, storage) = empty_store();
    seed_session(
        &storage,
        &create_token(3600),
        serde_json::json!(["ROLE_INTERN", "ROLE_ADMIN"]),
    );

    assert_eq!(store.role(), Some(Role::Admin));
}

#[test]
fn numeric_role_claim_is_mapped() {
    let (store, storage) = empty_store();
    seed_session(&storage, &create_token(3600), serde_json::json!([3]));

    assert_eq!(store.role(), Some(Role::Intern));
}

#[test]
fn single_string_role_shape_is_accepted() {
    let (store, storage) = empty_store();
    seed_session(&storage, &create_token(3600), serde_json::json!("admin"));

    assert_eq!(store.role(), Some(Role::Admin));
}

#[test]
fn unrecognized_roles_yield_no_primary_role() {
    let (store, storage) = empty_store();
    seed_session(&storage, &create_token(3600), serde_json::json!(["ROLE_SUPERUSER"]));

    // Still a valid session, but no canonical role can be resolved.
    assert!(store.is_authenticated());
    assert_eq!(store.role(), None);
}

// --- Freshness ---

#[test]
fn session_reads_storage_fresh_on_every_call() {
    let (store, storage) = empty_store();
    assert!(!store.is_authenticated());

    // A session appearing behind the store's back is visible immediately...
    seed_session(&storage, &create_token(3600), serde_json::json!(["ROLE_INTERN"]));
    assert!(store.is_authenticated());

    // ...and so is its removal.
    storage.remove(TOKEN_KEY);
    storage.remove(USER_KEY);
    assert!(!store.is_authenticated());
}
