//! Client-side authentication and route authorization for the internship
//! portal: a session store persisting the bearer token and role claims
//! across reloads, and a gate deciding every protected navigation.

use std::sync::Arc;

// --- Module Structure ---

// Core client services and components.
pub mod api;
pub mod config;
pub mod gate;
pub mod models;
pub mod routes;
pub mod session;
pub mod storage;

// --- Public Re-exports ---

// Makes the core types easily accessible to the binary and to tests.
pub use api::{ApiState, AuthError, HttpAuthApi, MockAuthApi};
pub use config::AppConfig;
pub use gate::{Decision, Destination, Gate};
pub use models::{Credentials, Role, Session, SignupRequest};
pub use routes::Navigator;
pub use session::SessionStore;
pub use storage::{FileStorage, MemoryStorage, StorageState};

/// PortalClient
///
/// The unified bundle the hosting application holds: the session store (the
/// single source of truth for authentication state) and the navigator (the
/// route table plus gate). Both share the same storage backend, so a logout
/// through the store is visible to the very next navigation decision.
#[derive(Clone)]
pub struct PortalClient {
    pub store: SessionStore,
    pub navigator: Navigator,
}

impl PortalClient {
    /// Wires the HTTP auth API from the configuration onto the given storage
    /// backend.
    pub fn new(config: &AppConfig, storage: StorageState) -> Self {
        let api: ApiState = Arc::new(HttpAuthApi::new(config.api_base_url.clone()));
        Self::with_api(api, storage)
    }

    /// Same wiring with an injected auth API, for tests and alternative
    /// transports.
    pub fn with_api(api: ApiState, storage: StorageState) -> Self {
        let store = SessionStore::new(api, storage);
        let navigator = Navigator::new(Gate::new(store.clone()));
        Self { store, navigator }
    }
}
