use intern_portal_client::config::{AppConfig, Env};
use serial_test::serial;
use std::path::PathBuf;

// Environment variables are process-global, so every test that touches them
// is serialized. set_var/remove_var are unsafe in edition 2024 because of
// that same global mutability.

fn clear_env() {
    unsafe {
        std::env::remove_var("APP_ENV");
        std::env::remove_var("PORTAL_API_URL");
        std::env::remove_var("PORTAL_SESSION_FILE");
    }
}

#[test]
#[serial]
fn default_is_safe_for_tests() {
    let config = AppConfig::default();

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.api_base_url, "http://localhost:8080/api");
}

#[test]
#[serial]
fn load_without_env_falls_back_to_local_defaults() {
    clear_env();

    let config = AppConfig::load();

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.api_base_url, "http://localhost:8080/api");
    assert_eq!(config.session_path, PathBuf::from(".portal-session.json"));
}

#[test]
#[serial]
fn load_honors_explicit_settings() {
    clear_env();
    unsafe {
        std::env::set_var("APP_ENV", "production");
        std::env::set_var("PORTAL_API_URL", "https://portal.example.com/api");
        std::env::set_var("PORTAL_SESSION_FILE", "/var/lib/portal/session.json");
    }

    let config = AppConfig::load();

    assert_eq!(config.env, Env::Production);
    assert_eq!(config.api_base_url, "https://portal.example.com/api");
    assert_eq!(
        config.session_path,
        PathBuf::from("/var/lib/portal/session.json")
    );

    clear_env();
}

#[test]
#[serial]
#[should_panic(expected = "PORTAL_API_URL must be set in production")]
fn production_without_api_url_fails_fast() {
    clear_env();
    unsafe {
        std::env::set_var("APP_ENV", "production");
    }

    // Must refuse to start rather than run against a default backend.
    let _ = AppConfig::load();
}

#[test]
#[serial]
fn unknown_app_env_is_treated_as_local() {
    clear_env();
    unsafe {
        std::env::set_var("APP_ENV", "staging");
    }

    let config = AppConfig::load();
    assert_eq!(config.env, Env::Local);

    clear_env();
}
