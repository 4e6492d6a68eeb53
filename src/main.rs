use std::path::Path;
use std::sync::Arc;

use futures::StreamExt;

use chat_warden::config::BotConfig;
use chat_warden::filter::WordFilter;
use chat_warden::health;
use chat_warden::pipeline::MessagePipeline;
use chat_warden::platform::console::{self, ConsolePlatform};
use chat_warden::platform::ChatPlatform;
use chat_warden::relay::{ChatRelay, HttpRelay, RelayConfig};
use chat_warden::store::{LibSqlBackend, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = BotConfig::from_env()?;

    let relay_config = RelayConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export WARDEN_RELAY_URL=https://relay.example.com/respond");
        std::process::exit(1);
    });

    let db_path =
        std::env::var("WARDEN_DB_PATH").unwrap_or_else(|_| "./data/chat-warden.db".to_string());

    let health_port: u16 = std::env::var("WARDEN_HEALTH_PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    eprintln!("🛡️  Chat Warden v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Prefix: {}", config.prefix);
    eprintln!("   Relay: {}", relay_config.endpoint);
    eprintln!("   Database: {db_path}");
    eprintln!("   Keep-alive: http://0.0.0.0:{health_port}/");
    eprintln!("   Type a message and press Enter. Ctrl-D to exit.\n");

    // ── Store ───────────────────────────────────────────────────────
    let store: Arc<dyn Store> = Arc::new(
        LibSqlBackend::new_local(Path::new(&db_path))
            .await
            .unwrap_or_else(|e| {
                eprintln!("Error: Failed to open store at {db_path}: {e}");
                std::process::exit(1);
            }),
    );

    // ── Collaborators ───────────────────────────────────────────────
    let filter = Arc::new(WordFilter::new());
    let relay: Arc<dyn ChatRelay> = Arc::new(HttpRelay::new(relay_config));
    let platform: Arc<dyn ChatPlatform> = Arc::new(ConsolePlatform::new());

    let _health_handle = health::spawn(health_port);

    // ── Pipeline ────────────────────────────────────────────────────
    let pipeline = MessagePipeline::new(config, store, Arc::clone(&filter), platform, relay);
    let loaded = pipeline.load_filter().await?;
    eprintln!("   Banned words: {} ({} custom)\n", filter.len(), loaded);

    let mut events = console::stdin_stream();
    while let Some(message) = events.next().await {
        if let Err(e) = pipeline.process(message).await {
            tracing::error!(error = %e, "Message processing failed");
        }
    }

    Ok(())
}
