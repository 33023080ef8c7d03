//! Wallet Admin Bot - Main executable
//!
//! Starts the operator Telegram bot, the companion HTTP API and the
//! background confirmation service, all sharing one SQLite store.
use anyhow::Context;
use dotenv::dotenv;
use log::{error, info};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::env;
use std::str::FromStr;
use std::sync::Arc;
use teloxide::{dptree, Bot};
use teloxide::dispatching::dialogue::InMemStorage;
use wallet_admin_bot::{ConfirmationService, Router, ServiceContainer, State, TelegramRouter};

/// Application entry point
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    info!("Starting Wallet Admin Bot v{}", wallet_admin_bot::VERSION);

    let bot_token =
        env::var("BOT_TOKEN").context("BOT_TOKEN must be set in environment variables")?;

    let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:bot.db".to_string());
    let api_addr = env::var("API_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".to_string());

    let bot = Bot::new(bot_token);

    info!("Connecting to database...");
    let connect_options = SqliteConnectOptions::from_str(&database_url)
        .context("Invalid DATABASE_URL")?
        .create_if_missing(true);

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await
        .context("Failed to create database connection pool")?;
    let db_pool = Arc::new(db_pool);

    info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(db_pool.as_ref())
        .await
        .context("Failed to run migrations")?;
    info!("Migrations completed successfully");

    let services = Arc::new(ServiceContainer::new(db_pool.clone()));

    // Background promotion of pending transactions
    let mut confirmation_service = ConfirmationService::new(db_pool.clone());
    confirmation_service.start();

    // Companion HTTP API
    let api = wallet_admin_bot::api::api_router(services.clone());
    let listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .with_context(|| format!("Failed to bind HTTP API to {}", api_addr))?;
    info!("HTTP API listening on {}", api_addr);
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, api).await {
            error!("HTTP API server error: {}", e);
        }
    });

    // Telegram dispatcher
    let router = TelegramRouter::new(services.clone());
    let handler = router.setup_handlers();

    let mut dispatcher = teloxide::dispatching::Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![services, InMemStorage::<State>::new()])
        .enable_ctrlc_handler()
        .build();

    info!("Bot is running! Press Ctrl+C to stop.");
    dispatcher.dispatch().await;

    info!("Stopping confirmation service...");
    confirmation_service.stop().await;

    Ok(())
}
