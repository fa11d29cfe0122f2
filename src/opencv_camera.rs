use crate::camera::{CameraError, Frame, Webcam};
use crate::config::CameraConfig;
use async_trait::async_trait;
use opencv::{core, imgproc, prelude::*, videoio};

impl From<opencv::Error> for CameraError {
    fn from(err: opencv::Error) -> Self {
        CameraError::ReadFrameFailed(err.to_string())
    }
}

/// Physical webcam backend over OpenCV's VideoCapture.
pub struct OpenCvWebcam {
    device_index: i32,
    flip: bool,
    capture: Option<videoio::VideoCapture>,
    streaming: bool,
    seq: u64,
}

impl OpenCvWebcam {
    pub fn new(device_index: i32, config: &CameraConfig) -> Self {
        Self {
            device_index,
            flip: config.flip,
            capture: None,
            streaming: false,
            seq: 0,
        }
    }
}

#[async_trait]
impl Webcam for OpenCvWebcam {
    async fn setup(&mut self) -> Result<(), CameraError> {
        let capture = videoio::VideoCapture::new(self.device_index, videoio::CAP_ANY)
            .map_err(|e| CameraError::OpenFailed(e.to_string()))?;
        if !capture
            .is_opened()
            .map_err(|e| CameraError::OpenFailed(e.to_string()))?
        {
            return Err(CameraError::AccessDenied(format!(
                "device {} is unavailable",
                self.device_index
            )));
        }
        self.capture = Some(capture);
        Ok(())
    }

    async fn start(&mut self) -> Result<(), CameraError> {
        if self.capture.is_none() {
            return Err(CameraError::OpenFailed(
                "setup() has not been called".to_string(),
            ));
        }
        self.streaming = true;
        Ok(())
    }

    async fn refresh_frame(&mut self) -> Result<Frame, CameraError> {
        if !self.streaming {
            return Err(CameraError::NotStreaming);
        }
        let capture = self.capture.as_mut().ok_or(CameraError::NotStreaming)?;

        let mut bgr = Mat::default();
        if !capture
            .read(&mut bgr)
            .map_err(|e| CameraError::ReadFrameFailed(e.to_string()))?
            || bgr.empty()
        {
            return Err(CameraError::ReadFrameFailed("empty frame".to_string()));
        }

        let mut rgb = Mat::default();
        imgproc::cvt_color_def(&bgr, &mut rgb, imgproc::COLOR_BGR2RGB)?;

        let oriented = if self.flip {
            let mut flipped = Mat::default();
            core::flip(&rgb, &mut flipped, 1)?;
            flipped
        } else {
            rgb
        };

        self.seq += 1;
        Ok(Frame {
            width: oriented.cols() as u32,
            height: oriented.rows() as u32,
            pixels: oriented.data_bytes()?.to_vec(),
            seq: self.seq,
        })
    }

    async fn stop(&mut self) {
        self.streaming = false;
        self.capture = None;
    }
}
