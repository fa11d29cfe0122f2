use crate::camera::{CameraError, Webcam};
use crate::classifier::{Classifier, ClassifierError};
use crate::config::Config;
use crate::display::DisplaySurface;
use crate::prediction::select_best;
use crate::presentation::{classify_label, format_caption, CAMERA_ACCESS_ERROR};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
    time::{sleep, Duration},
};

#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("Camera acquisition failed: {0}")]
    Camera(#[from] CameraError),
    #[error("Model acquisition failed: {0}")]
    Model(#[from] ClassifierError),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Capture session is already running")]
    AlreadyRunning,
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),
}

#[derive(Error, Debug)]
enum IterationError {
    #[error("Camera error: {0}")]
    Camera(#[from] CameraError),
    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub model_url: String,
    pub metadata_url: String,
    pub frame_delay: Duration,
    pub max_consecutive_failures: u64,
}

impl From<&Config> for SessionConfig {
    fn from(config: &Config) -> Self {
        Self {
            model_url: config.model.model_url.clone(),
            metadata_url: config.model.metadata_url.clone(),
            frame_delay: Duration::from_millis(config.camera.get_frame_delay_ms()),
            max_consecutive_failures: config.session.max_consecutive_failures,
        }
    }
}

/// Owns the capture-and-classify loop: one running flag, one loop task.
/// `start` acquires the model and camera and spawns the loop; `stop` is
/// idempotent and safe to call while an iteration is in flight.
pub struct CaptureSession<C, M, D>
where
    C: Webcam,
    M: Classifier,
    D: DisplaySurface,
{
    camera: Arc<Mutex<C>>,
    classifier: Arc<M>,
    display: Arc<D>,
    config: SessionConfig,
    running: Arc<AtomicBool>,
    shutdown_tx: Option<broadcast::Sender<()>>,
    loop_handle: Option<JoinHandle<()>>,
}

impl<C, M, D> CaptureSession<C, M, D>
where
    C: Webcam,
    M: Classifier,
    D: DisplaySurface,
{
    pub fn new(camera: C, classifier: Arc<M>, display: Arc<D>, config: SessionConfig) -> Self {
        Self {
            camera: Arc::new(Mutex::new(camera)),
            classifier,
            display,
            config,
            running: Arc::new(AtomicBool::new(false)),
            shutdown_tx: None,
            loop_handle: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub async fn start(&mut self) -> Result<(), SessionError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(SessionError::AlreadyRunning);
        }

        // Model first, camera second: a model fetch failure leaves the
        // camera untouched, a camera failure drops the model handle.
        if let Err(e) = self
            .classifier
            .load(&self.config.model_url, &self.config.metadata_url)
            .await
        {
            tracing::error!("Failed to load model: {e}");
            self.display.show_error(CAMERA_ACCESS_ERROR);
            return Err(AcquisitionError::Model(e).into());
        }

        {
            let mut camera = self.camera.lock().await;
            if let Err(e) = camera.setup().await {
                tracing::error!("Camera setup failed: {e}");
                self.display.show_error(CAMERA_ACCESS_ERROR);
                return Err(AcquisitionError::Camera(e).into());
            }
            if let Err(e) = camera.start().await {
                // Release the half-acquired device before surfacing the error.
                camera.stop().await;
                tracing::error!("Camera start failed: {e}");
                self.display.show_error(CAMERA_ACCESS_ERROR);
                return Err(AcquisitionError::Camera(e).into());
            }
        }

        tracing::info!(
            classes = self.classifier.class_count(),
            "capture session started"
        );
        self.display.show_live();
        self.running.store(true, Ordering::SeqCst);

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let handle = tokio::spawn(Self::run_loop(
            Arc::clone(&self.camera),
            Arc::clone(&self.classifier),
            Arc::clone(&self.display),
            Arc::clone(&self.running),
            self.config.clone(),
            shutdown_rx,
        ));
        self.shutdown_tx = Some(shutdown_tx);
        self.loop_handle = Some(handle);

        Ok(())
    }

    pub async fn stop(&mut self) {
        if self.loop_handle.is_none() && !self.running.load(Ordering::SeqCst) {
            return;
        }

        self.running.store(false, Ordering::SeqCst);
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }
        if let Some(handle) = self.loop_handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!("Capture loop task failed: {e}");
            }
        }

        self.camera.lock().await.stop().await;
        self.display.reset();
        tracing::info!("capture session stopped");
    }

    async fn run_loop(
        camera: Arc<Mutex<C>>,
        classifier: Arc<M>,
        display: Arc<D>,
        running: Arc<AtomicBool>,
        config: SessionConfig,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) {
        let mut consecutive_failures: u64 = 0;
        loop {
            // Sole cancellation point: no cycle runs once the flag is down.
            if !running.load(Ordering::SeqCst) {
                break;
            }

            tokio::select! {
                result = Self::run_iteration(&camera, &classifier, &display) => {
                    match result {
                        Ok(()) => consecutive_failures = 0,
                        Err(err) => {
                            consecutive_failures += 1;
                            tracing::error!(
                                "Iteration failed ({}/{}): {err}",
                                consecutive_failures,
                                config.max_consecutive_failures
                            );
                            if consecutive_failures >= config.max_consecutive_failures {
                                tracing::error!("Persistent failure detected, stopping capture loop");
                                running.store(false, Ordering::SeqCst);
                                camera.lock().await.stop().await;
                                display.show_error(CAMERA_ACCESS_ERROR);
                                break;
                            }
                        }
                    }
                },
                _ = shutdown_rx.recv() => {
                    break;
                }
            }

            sleep(config.frame_delay).await;
        }
        tracing::info!("capture loop stopped");
    }

    async fn run_iteration(
        camera: &Arc<Mutex<C>>,
        classifier: &Arc<M>,
        display: &Arc<D>,
    ) -> Result<(), IterationError> {
        let frame = camera.lock().await.refresh_frame().await?;
        display.mirror_frame(&frame);

        let predictions = classifier.predict(&frame).await?;
        let Some(best) = select_best(&predictions) else {
            tracing::debug!("classifier returned no predictions");
            return Ok(());
        };

        let kind = classify_label(&best.label);
        let caption = format_caption(&best.label, best.probability, kind);
        display.show_caption(&caption, kind);

        Ok(())
    }
}
