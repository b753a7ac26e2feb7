use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use homehero::api::{ApiClient, RetryPolicy};
use homehero::auth::{HttpIdentityProvider, IdentityBridge};
use homehero::config::{default_config_path, Config};
use homehero::session::SessionStore;
use homehero::ui::app::App;
use homehero::ui::events::{AppEvent, EventHandler};
use homehero::ui::terminal_guard::setup_terminal;

#[derive(Debug, Parser)]
#[command(name = "homehero", about = "Terminal client for the HomeHero marketplace")]
struct Cli {
    /// Config file path (defaults to the platform config dir).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the backend base URL.
    #[arg(long)]
    backend_url: Option<String>,

    /// Override the identity provider base URL.
    #[arg(long)]
    identity_url: Option<String>,

    /// Override the read retry budget.
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Override the fixed delay between read retries, in milliseconds.
    #[arg(long)]
    retry_delay_ms: Option<u64>,

    /// Write logs to this file (off by default).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    homehero::logging::init_tracing(cli.log_file.as_deref());

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = Config::load_from(&config_path).context("loading config")?;
    if let Some(url) = cli.backend_url {
        config.endpoints.backend_url = url;
    }
    if let Some(url) = cli.identity_url {
        config.endpoints.identity_url = url;
    }
    if let Some(attempts) = cli.max_attempts {
        config.retry.max_attempts = attempts;
    }
    if let Some(delay) = cli.retry_delay_ms {
        config.retry.base_delay_ms = delay;
    }
    config.validate().context("validating config")?;

    let timeout = Duration::from_secs(config.retry.timeout_seconds);
    let api = Arc::new(
        ApiClient::new(&config.endpoints.backend_url, RetryPolicy::from(&config.retry), timeout)
            .context("building backend client")?,
    );
    let provider = HttpIdentityProvider::new(&config.endpoints.identity_url, timeout)
        .context("building identity client")?;
    let bridge = Arc::new(IdentityBridge::new(Box::new(provider)));

    let session_store = SessionStore::new(Arc::clone(&bridge), Arc::clone(&api));
    tokio::spawn(Arc::clone(&session_store).run());
    {
        let bridge = Arc::clone(&bridge);
        tokio::spawn(async move {
            bridge.resolve_initial().await;
        });
    }

    let events = EventHandler::new(Duration::from_millis(250));

    // Forward session changes onto the app's event bus.
    {
        let tx = events.sender();
        let mut rx = session_store.subscribe();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let state = rx.borrow_and_update().clone();
                if tx.send(AppEvent::Session(state)).await.is_err() {
                    break;
                }
            }
        });
    }

    tracing::info!(backend = %config.endpoints.backend_url, "starting homehero");

    let (mut terminal, guard) = setup_terminal().context("setting up terminal")?;
    let app = App::new(session_store, api, events.sender());
    let result = app.run(&mut terminal, events).await;
    drop(guard);
    result.context("app loop")?;
    Ok(())
}
