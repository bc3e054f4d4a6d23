//! Redhill Aircon Bot - Main Entry Point
//!
//! A Telegram bot that tracks shared air-conditioner usage sessions and
//! reports completed intervals to a form endpoint.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use teloxide::prelude::*;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use redhill_aircon_bot::commands::CommandHandler;
use redhill_aircon_bot::config::AppConfig;
use redhill_aircon_bot::form::FormClient;
use redhill_aircon_bot::session::{FileSessionStore, InMemorySessionStore, SessionStore};

/// Telegram bot for tracking shared aircon usage.
#[derive(Parser, Debug)]
#[command(name = "aircon_bot")]
#[command(about = "Track aircon usage sessions and report them to a form endpoint")]
#[command(version)]
struct Args {
    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Persist open sessions to this JSON file so they survive restarts.
    /// Without it, sessions are kept in memory only.
    #[arg(long)]
    session_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level);

    // Load environment variables
    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    // Load configuration
    let config = AppConfig::from_env().context("Failed to load bot configuration from environment")?;

    info!("Loaded registry with {} registered user(s)", config.registry.len());

    // Select the session store variant
    let sessions: Arc<dyn SessionStore> = match &args.session_file {
        Some(path) => {
            info!("Persisting sessions to {}", path.display());
            Arc::new(
                FileSessionStore::open(path).context("Failed to open the session file")?,
            )
        }
        None => Arc::new(InMemorySessionStore::new()),
    };

    let form = FormClient::new(config.form_url.clone(), config.form_fields.clone())
        .context("Failed to build the form submission client")?;

    let handler = Arc::new(CommandHandler::new(config.registry.clone(), sessions, form));

    let bot = Bot::new(&config.token);

    info!("Starting aircon bot...");
    run_dispatcher(bot, handler).await;

    info!("Shutting down...");
    Ok(())
}

/// Runs the update dispatcher until Ctrl+C.
async fn run_dispatcher(bot: Bot, handler: Arc<CommandHandler>) {
    let tree = dptree::entry().branch(Update::filter_message().endpoint(
        |bot: Bot, handler: Arc<CommandHandler>, msg: Message| async move {
            handle_update(&bot, &handler, &msg).await;
            Ok::<(), anyhow::Error>(())
        },
    ));

    Dispatcher::builder(bot, tree)
        .dependencies(dptree::deps![handler])
        .default_handler(|update| async move {
            debug!("Ignoring non-message update: {:?}", update.kind);
        })
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

/// Handles one inbound message; failures are logged, never propagated.
async fn handle_update(bot: &Bot, handler: &CommandHandler, msg: &Message) {
    let Some(text) = msg.text() else {
        debug!("Ignoring non-text message in chat {}", msg.chat.id);
        return;
    };
    let username = msg.from.as_ref().and_then(|u| u.username.as_deref());

    match handler.handle(username, text).await {
        Ok(reply) => {
            if let Err(e) = bot.send_message(msg.chat.id, reply).await {
                warn!("Failed to send reply: {e}");
            }
        }
        Err(e) => warn!("Update handling failed: {e:#}"),
    }
}

/// Initializes the logging subsystem.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
