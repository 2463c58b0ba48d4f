//! ListWarden Gateway - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::Method;
use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use listwarden_gateway::api;
use listwarden_gateway::api::auth::AdminCredentials;
use listwarden_gateway::app::App;
use listwarden_gateway::infrastructure::clock::SystemClock;
use listwarden_gateway::infrastructure::detect::{DiscordDetectClient, DEFAULT_DETECT_BASE_URL};
use listwarden_gateway::infrastructure::mysql::MySqlListStore;
use listwarden_gateway::infrastructure::ports::{ClockPort, DetectableGames, ListStore};
use listwarden_gateway::infrastructure::telegram::{
    TelegramClient, TelegramNotifier, TelegramPoller, DEFAULT_TELEGRAM_API_URL,
};
use listwarden_gateway::use_cases::moderation::ModerationQueue;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "listwarden_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ListWarden Gateway");

    // Load configuration
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let bot_token =
        std::env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN must be set")?;
    let moderation_chat_id: i64 = std::env::var("TELEGRAM_MODERATION_GROUP_ID")
        .context("TELEGRAM_MODERATION_GROUP_ID must be set")?
        .parse()
        .context("TELEGRAM_MODERATION_GROUP_ID must be a numeric chat id")?;
    let admin_user_id: i64 = std::env::var("TELEGRAM_ADMIN_USER_ID")
        .context("TELEGRAM_ADMIN_USER_ID must be set")?
        .parse()
        .context("TELEGRAM_ADMIN_USER_ID must be a numeric user id")?;
    let api_user = std::env::var("API_ADMIN_USER").context("API_ADMIN_USER must be set")?;
    let api_pass = std::env::var("API_ADMIN_PASS").context("API_ADMIN_PASS must be set")?;
    let telegram_api_url = std::env::var("TELEGRAM_API_URL")
        .unwrap_or_else(|_| DEFAULT_TELEGRAM_API_URL.into());
    let detect_api_url =
        std::env::var("DETECT_API_URL").unwrap_or_else(|_| DEFAULT_DETECT_BASE_URL.into());
    let server_host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let server_port: u16 = std::env::var("SERVER_PORT")
        .or_else(|_| std::env::var("PORT"))
        .unwrap_or_else(|_| "8000".into())
        .parse()
        .unwrap_or(8000);

    // Connect to MySQL
    tracing::info!("Connecting to MySQL");
    let store: Arc<dyn ListStore> = Arc::new(MySqlListStore::connect(&database_url).await?);
    tracing::info!("Database connected");

    // Create infrastructure clients
    let telegram = TelegramClient::new(&telegram_api_url, &bot_token);
    let notifier = Arc::new(TelegramNotifier::new(telegram.clone(), moderation_chat_id));
    let detect: Arc<dyn DetectableGames> = Arc::new(DiscordDetectClient::new(&detect_api_url));
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());

    // Create the moderation queue shared by both fronts
    let queue = Arc::new(ModerationQueue::new(store.clone(), notifier, clock));

    // Spawn the Telegram callback poller
    let poller = TelegramPoller::new(telegram, queue.clone(), admin_user_id);
    tokio::spawn(poller.run());

    // Create application state
    let app = Arc::new(App::new(
        queue,
        store,
        detect,
        AdminCredentials {
            username: api_user,
            password: api_pass,
        },
    ));

    // Build router
    let mut router = api::http::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer_from_env() {
        router = router.layer(cors);
    }

    // Start server
    let addr: SocketAddr = format!("{server_host}:{server_port}").parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn build_cors_layer_from_env() -> Option<CorsLayer> {
    let allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let Some(allowed_origins) = allowed_origins else {
        return None;
    };

    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        // Clients send basic-auth and JSON content types which trigger
        // CORS preflights.
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
