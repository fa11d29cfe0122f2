use crate::camera::Frame;
use crate::prediction::Prediction;
use async_trait::async_trait;
use parking_lot::Mutex;
use rand::Rng;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Failed to fetch model: {0}")]
    ModelFetchFailed(String),
    #[error("Model has not been loaded")]
    ModelNotLoaded,
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
}

/// Image classifier seam. `load` fetches the model and metadata descriptors
/// and may fail; `predict` returns one entry per known class.
#[async_trait]
pub trait Classifier: Send + Sync + 'static {
    async fn load(&self, model_url: &str, metadata_url: &str) -> Result<(), ClassifierError>;
    fn class_count(&self) -> usize;
    async fn predict(&self, frame: &Frame) -> Result<Vec<Prediction>, ClassifierError>;
}

/// Stand-in classifier splitting probability mass between an occupied and a
/// free class from mean frame brightness, with a little jitter so the demo
/// output moves. Not a model; a placeholder for one.
pub struct BrightnessClassifier {
    labels: [String; 2],
    loaded: Mutex<bool>,
}

impl BrightnessClassifier {
    pub fn new() -> Self {
        Self {
            labels: ["Persona".to_string(), "Espacio Libre".to_string()],
            loaded: Mutex::new(false),
        }
    }

    fn mean_brightness(frame: &Frame) -> f32 {
        if frame.pixels.is_empty() {
            return 0.0;
        }
        let sum: u64 = frame.pixels.iter().map(|&p| p as u64).sum();
        sum as f32 / frame.pixels.len() as f32 / 255.0
    }
}

impl Default for BrightnessClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Classifier for BrightnessClassifier {
    async fn load(&self, model_url: &str, metadata_url: &str) -> Result<(), ClassifierError> {
        if model_url.is_empty() || metadata_url.is_empty() {
            return Err(ClassifierError::ModelFetchFailed(
                "empty model descriptor".to_string(),
            ));
        }
        tracing::info!(model_url, metadata_url, "loaded stand-in classifier");
        *self.loaded.lock() = true;
        Ok(())
    }

    fn class_count(&self) -> usize {
        self.labels.len()
    }

    async fn predict(&self, frame: &Frame) -> Result<Vec<Prediction>, ClassifierError> {
        if !*self.loaded.lock() {
            return Err(ClassifierError::ModelNotLoaded);
        }

        let jitter = rand::rng().random_range(-0.05..0.05f32);
        let occupied = (Self::mean_brightness(frame) + jitter).clamp(0.0, 1.0);

        Ok(vec![
            Prediction::new(self.labels[0].clone(), occupied),
            Prediction::new(self.labels[1].clone(), 1.0 - occupied),
        ])
    }
}
