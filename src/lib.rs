pub mod camera;
pub mod classifier;
pub mod display;
pub mod prediction;
pub mod presentation;
pub mod session;

#[cfg(feature = "opencv-camera")]
pub mod opencv_camera;

pub mod app;
pub mod config;

pub use app::start_app;
pub use session::CaptureSession;
