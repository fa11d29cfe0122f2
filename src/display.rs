use crate::camera::Frame;
use crate::presentation::PresentationKind;
use parking_lot::Mutex;

/// Display surface seam. The session only toggles text and visual state;
/// rendering belongs to the implementation.
pub trait DisplaySurface: Send + Sync + 'static {
    /// Preview is live; hide the start affordance.
    fn show_live(&self);
    /// Cosmetic mirror of the current frame onto a secondary surface.
    fn mirror_frame(&self, frame: &Frame);
    fn show_caption(&self, text: &str, kind: PresentationKind);
    fn show_error(&self, message: &str);
    /// Back to the neutral stopped state.
    fn reset(&self);
}

/// Surface backed by structured logs, used by the demo binary.
pub struct ConsoleDisplay;

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySurface for ConsoleDisplay {
    fn show_live(&self) {
        tracing::info!("preview live");
    }

    fn mirror_frame(&self, frame: &Frame) {
        tracing::trace!(seq = frame.seq, "mirrored frame");
    }

    fn show_caption(&self, text: &str, kind: PresentationKind) {
        tracing::info!(?kind, caption = %text.replace('\n', " "), "caption updated");
    }

    fn show_error(&self, message: &str) {
        tracing::error!(message, "display error state");
    }

    fn reset(&self) {
        tracing::info!("display reset");
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayState {
    pub live: bool,
    pub caption: Option<(String, PresentationKind)>,
    pub error: Option<String>,
    pub mirrored_frames: u64,
}

/// Surface recording its state behind a lock, for embedding and assertions.
#[derive(Default)]
pub struct InMemoryDisplay {
    state: Mutex<DisplayState>,
}

impl InMemoryDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> DisplayState {
        self.state.lock().clone()
    }
}

impl DisplaySurface for InMemoryDisplay {
    fn show_live(&self) {
        self.state.lock().live = true;
    }

    fn mirror_frame(&self, _frame: &Frame) {
        self.state.lock().mirrored_frames += 1;
    }

    fn show_caption(&self, text: &str, kind: PresentationKind) {
        let mut state = self.state.lock();
        state.caption = Some((text.to_string(), kind));
        state.error = None;
    }

    fn show_error(&self, message: &str) {
        let mut state = self.state.lock();
        state.error = Some(message.to_string());
        state.live = false;
    }

    fn reset(&self) {
        *self.state.lock() = DisplayState::default();
    }
}
