mod bot;
mod config;
mod controller;
mod data;
mod error;
mod model;
mod service;
mod state;
mod util;

use dioxus_logger::tracing;

use crate::{config::Config, error::AppError, state::BotState};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    dioxus_logger::init(config.log_level)
        .map_err(|e| AppError::InternalError(format!("Failed to initialize logger: {}", e)))?;

    let state = BotState::new(&config);

    tracing::info!("Starting Guild Sentinel");

    bot::start::start_bot(&config, state).await
}
