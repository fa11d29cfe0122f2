use crate::config::CameraConfig;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Camera access denied: {0}")]
    AccessDenied(String),
    #[error("Failed to open camera: {0}")]
    OpenFailed(String),
    #[error("Camera is not streaming")]
    NotStreaming,
    #[error("Failed to read frame: {0}")]
    ReadFrameFailed(String),
}

/// One captured RGB8 image sample, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    pub seq: u64,
}

impl Frame {
    /// Mirrors the frame horizontally, matching the flipped webcam preview.
    pub fn flip_horizontal(&self) -> Frame {
        let width = self.width as usize;
        let mut pixels = vec![0u8; self.pixels.len()];
        for row in 0..self.height as usize {
            let row_start = row * width * 3;
            for col in 0..width {
                let src = row_start + col * 3;
                let dst = row_start + (width - 1 - col) * 3;
                pixels[dst..dst + 3].copy_from_slice(&self.pixels[src..src + 3]);
            }
        }
        Frame {
            width: self.width,
            height: self.height,
            pixels,
            seq: self.seq,
        }
    }
}

/// Camera device seam. Acquisition is two-phased: `setup` requests device
/// access, `start` begins streaming. `stop` releases the device and must be
/// idempotent.
#[async_trait]
pub trait Webcam: Send + 'static {
    async fn setup(&mut self) -> Result<(), CameraError>;
    async fn start(&mut self) -> Result<(), CameraError>;
    async fn refresh_frame(&mut self) -> Result<Frame, CameraError>;
    async fn stop(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeviceState {
    Idle,
    Ready,
    Streaming,
}

/// In-process camera producing a moving gradient. Used by the demo binary
/// and wherever no physical device is available.
pub struct SyntheticWebcam {
    width: u32,
    height: u32,
    flip: bool,
    state: DeviceState,
    seq: u64,
}

impl SyntheticWebcam {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            flip: config.flip,
            state: DeviceState::Idle,
            seq: 0,
        }
    }

    fn render(&self) -> Frame {
        let mut pixels = Vec::with_capacity((self.width * self.height * 3) as usize);
        let shift = (self.seq % 256) as u8;
        for y in 0..self.height {
            for x in 0..self.width {
                pixels.push((x % 256) as u8 ^ shift);
                pixels.push((y % 256) as u8);
                pixels.push(shift);
            }
        }
        Frame {
            width: self.width,
            height: self.height,
            pixels,
            seq: self.seq,
        }
    }
}

#[async_trait]
impl Webcam for SyntheticWebcam {
    async fn setup(&mut self) -> Result<(), CameraError> {
        if self.state == DeviceState::Idle {
            self.state = DeviceState::Ready;
        }
        Ok(())
    }

    async fn start(&mut self) -> Result<(), CameraError> {
        match self.state {
            DeviceState::Idle => Err(CameraError::OpenFailed(
                "setup() has not been called".to_string(),
            )),
            _ => {
                self.state = DeviceState::Streaming;
                Ok(())
            }
        }
    }

    async fn refresh_frame(&mut self) -> Result<Frame, CameraError> {
        if self.state != DeviceState::Streaming {
            return Err(CameraError::NotStreaming);
        }
        self.seq += 1;
        let frame = self.render();
        if self.flip {
            Ok(frame.flip_horizontal())
        } else {
            Ok(frame)
        }
    }

    async fn stop(&mut self) {
        self.state = DeviceState::Idle;
    }
}
