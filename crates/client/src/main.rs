//! Bot process entry point.
//!
//! Loads `.env`, installs logging, then runs every configured session under a
//! supervisor until they finish or ctrl-c is pressed.
mod app;
mod backend;
mod config;
mod demo;
mod logging;

use anyhow::Result;

use crate::config::ClientConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = ClientConfig::from_env();
    let _guard = logging::setup_logging(config.session_id.as_deref())?;

    tracing::info!(
        data_dir = %config.data_dir.display(),
        sessions = ?config.sessions,
        "starting bot"
    );
    app::run(config).await
}
