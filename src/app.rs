use crate::camera::SyntheticWebcam;
use crate::classifier::BrightnessClassifier;
use crate::config::Config;
use crate::display::ConsoleDisplay;
use crate::session::{CaptureSession, SessionConfig};

use std::sync::Arc;
use tokio::signal;

pub async fn start_app(config: Config) -> anyhow::Result<()> {
    let camera = SyntheticWebcam::new(&config.camera);
    let classifier = Arc::new(BrightnessClassifier::new());
    let display = Arc::new(ConsoleDisplay::new());

    let mut session = CaptureSession::new(
        camera,
        classifier,
        display,
        SessionConfig::from(&config),
    );

    if let Err(e) = session.start().await {
        tracing::error!("Failed to start capture session: {:?}", e);
        return Err(e.into());
    }

    shutdown_signal().await;
    tracing::info!("Shutdown signal received, stopping capture session.");
    session.stop().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
