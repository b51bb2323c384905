use intern_portal_client::{
    AuthError, Credentials, FileStorage, PortalClient, SignupRequest, StorageState,
    config::{AppConfig, Env},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// A small command-line harness over the session store and navigator, used
/// to exercise the full login → gate flow against a running portal backend.
///
/// Commands:
///   login <username> <password>
///   register <username> <email> <password>
///   logout
///   whoami
///   check <path>
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (Fail-Fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging Filter Setup
    // Prioritizes RUST_LOG, falling back to a sensible local default.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "intern_portal_client=debug".into());

    // 3. Initialize Logging based on Environment
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // JSON output for ingestion by centralized log aggregators.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!(api = %config.api_base_url, "portal client starting in {:?} mode", config.env);

    // 4. Storage & Client Assembly
    let storage: StorageState = Arc::new(FileStorage::new(config.session_path.clone()));
    let client = PortalClient::new(&config, storage);

    // 5. Command Dispatch
    let args: Vec<String> = std::env::args().skip(1).collect();
    let argv: Vec<&str> = args.iter().map(String::as_str).collect();

    let outcome = match argv.as_slice() {
        ["login", username, password] => login(&client, username, password).await,
        ["register", username, email, password] => register(&client, username, email, password).await,
        ["logout"] => {
            client.store.logout();
            println!("logged out");
            Ok(())
        }
        ["whoami"] => {
            whoami(&client);
            Ok(())
        }
        ["check", path] => {
            check(&client, path);
            Ok(())
        }
        _ => {
            eprintln!("usage: intern-portal-client <login|register|logout|whoami|check> ...");
            std::process::exit(2);
        }
    };

    if let Err(e) = outcome {
        tracing::error!(error = %e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn login(client: &PortalClient, username: &str, password: &str) -> Result<(), AuthError> {
    let credentials = Credentials {
        username: username.to_string(),
        password: password.to_string(),
    };

    let session = client.store.login(&credentials).await?;

    match session.primary_role() {
        Some(role) => println!(
            "logged in as {} until {}; landing on {}",
            role.as_str(),
            session.expires_at,
            role.dashboard_path()
        ),
        None => println!("logged in, but the account holds no recognized role"),
    }

    Ok(())
}

async fn register(
    client: &PortalClient,
    username: &str,
    email: &str,
    password: &str,
) -> Result<(), AuthError> {
    let request = SignupRequest {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        role_id: None,
    };

    let message = client.store.register(&request).await?;
    println!("{message}");
    Ok(())
}

fn whoami(client: &PortalClient) {
    if !client.store.is_authenticated() {
        println!("not logged in");
        return;
    }

    match client.store.role() {
        Some(role) => println!("logged in as {}", role.as_str()),
        None => println!("logged in without a recognized role"),
    }
}

fn check(client: &PortalClient, path: &str) {
    use intern_portal_client::Decision;

    match client.navigator.navigate(path) {
        Decision::Allow => println!("{path}: allow"),
        Decision::Redirect(dest) => println!("{path}: redirect to {}", dest.path()),
    }
}
