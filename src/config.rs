use std::env;
use std::path::PathBuf;

/// AppConfig
///
/// Holds the client's entire configuration. Immutable once loaded and shared
/// by value (Clone) with every component that needs it.
#[derive(Clone)]
pub struct AppConfig {
    /// Base URL of the portal backend, e.g. `http://localhost:8080/api`.
    pub api_base_url: String,
    /// Path of the JSON file backing durable session storage.
    pub session_path: PathBuf,
    /// Runtime environment marker. Controls log formatting.
    pub env: Env,
}

/// Env
///
/// Defines the runtime context, used to switch between development defaults
/// and strict production configuration.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Provides a safe, non-panicking AppConfig instance primarily used for
    /// test setup, without needing any environment variables set.
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api".to_string(),
            session_path: env::temp_dir().join("portal-session-test.json"),
            env: Env::Local,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// The canonical function for initializing configuration at startup.
    /// Reads all parameters from environment variables and fails fast.
    ///
    /// # Panics
    /// Panics if `PORTAL_API_URL` is not set in Production. Local falls back
    /// to the development backend address.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let api_base_url = match env {
            Env::Production => env::var("PORTAL_API_URL")
                .expect("FATAL: PORTAL_API_URL must be set in production."),
            Env::Local => env::var("PORTAL_API_URL")
                .unwrap_or_else(|_| "http://localhost:8080/api".to_string()),
        };

        let session_path = env::var("PORTAL_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".portal-session.json"));

        Self {
            api_base_url,
            session_path,
            env,
        }
    }
}
