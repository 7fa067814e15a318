mod analysis;
mod app;
mod capture;
mod catalog;
mod config;
mod domain;
mod error;

use crate::app::PoseGenieApp;
use crate::config::Settings;
use crate::error::AppError;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    init_logging();
    let settings = Settings::load()?;
    tracing::info!(model = %settings.model, device = %settings.camera.device, "starting PoseGenie");
    PoseGenieApp::start_gui(settings)
}
