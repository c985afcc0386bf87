use std::sync::Arc;

use erpsnap::client::config::ClientConfig;
use erpsnap::client::gui::app::{OverlayApp, OverlayFlags};
use erpsnap::client::services::backend::RemoteBackend;
use iced::Application;

fn main() -> anyhow::Result<()> {
    let config = ClientConfig::from_env();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();
    log::info!("ErpSnap overlay v{}", env!("CARGO_PKG_VERSION"));

    let backend = Arc::new(RemoteBackend::from_config(&config));
    OverlayApp::run(OverlayApp::settings(OverlayFlags { config, backend }))?;
    Ok(())
}
