//! Frame-source capability interface and bundled implementations
//!
//! The capture surface talks to cameras only through [`FrameSource`], so a
//! real device backend, a test pattern, or a still image on disk are all
//! interchangeable.

use std::path::PathBuf;

use image::{Rgba, RgbaImage};
use thiserror::Error;

/// Camera facing preference
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Facing {
    /// User-facing (selfie) camera
    #[default]
    Front,
    /// World-facing camera
    Rear,
}

/// Requested stream constraints
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamConfig {
    pub width: u32,
    pub height: u32,
    pub facing: Facing,
}

impl Default for StreamConfig {
    fn default() -> Self {
        // The service crops to a square, so ask the device for one.
        Self {
            width: 1024,
            height: 1024,
            facing: Facing::Front,
        }
    }
}

/// Errors surfaced when acquiring a stream
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Permission denied or no device matches the constraints
    #[error("camera unavailable: {0}")]
    DeviceUnavailable(String),
}

/// A source of live frames.
///
/// `grab` must be a fresh read of the source's current buffer on every
/// call, never a cached earlier frame; it returns `None` only while the
/// source is not open.
pub trait FrameSource {
    /// Human-readable name for logs
    fn name(&self) -> &str;

    /// Acquire the device with the given constraints
    fn open(&mut self, config: &StreamConfig) -> Result<(), CaptureError>;

    /// Read the current frame
    fn grab(&mut self) -> Option<RgbaImage>;

    /// Release the device
    fn close(&mut self);
}

/// Deterministic synthetic camera: a gradient that shifts every grab, so
/// freshness is observable without hardware.
#[derive(Debug, Default)]
pub struct TestPatternSource {
    size: Option<(u32, u32)>,
    tick: u32,
}

impl TestPatternSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameSource for TestPatternSource {
    fn name(&self) -> &str {
        "test-pattern"
    }

    fn open(&mut self, config: &StreamConfig) -> Result<(), CaptureError> {
        self.size = Some((config.width, config.height));
        self.tick = 0;
        Ok(())
    }

    fn grab(&mut self) -> Option<RgbaImage> {
        let (w, h) = self.size?;
        self.tick = self.tick.wrapping_add(1);
        let tick = self.tick;
        Some(RgbaImage::from_fn(w, h, |x, y| {
            let r = (x * 255 / w.max(1)) as u8;
            let g = (y * 255 / h.max(1)) as u8;
            let b = ((tick * 7) % 251) as u8;
            Rgba([r, g, b, 255])
        }))
    }

    fn close(&mut self) {
        self.size = None;
    }
}

/// A still image on disk standing in for a camera (a static scene)
pub struct StillImageSource {
    path: PathBuf,
    frame: Option<RgbaImage>,
}

impl StillImageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            frame: None,
        }
    }
}

impl FrameSource for StillImageSource {
    fn name(&self) -> &str {
        "still-image"
    }

    fn open(&mut self, config: &StreamConfig) -> Result<(), CaptureError> {
        let img = image::open(&self.path).map_err(|err| {
            CaptureError::DeviceUnavailable(format!("{}: {}", self.path.display(), err))
        })?;
        let frame = img.to_rgba8();
        if frame.dimensions() != (config.width, config.height) {
            log::info!(
                "still image is {}x{}, requested {}x{}; using the image's own size",
                frame.width(),
                frame.height(),
                config.width,
                config.height
            );
        }
        self.frame = Some(frame);
        Ok(())
    }

    fn grab(&mut self) -> Option<RgbaImage> {
        self.frame.clone()
    }

    fn close(&mut self) {
        self.frame = None;
    }
}
