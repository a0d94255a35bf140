//! Snapshot type for frozen camera frames

use std::fmt;

use anyhow::Context;
use chrono::{DateTime, Local};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbaImage};

/// JPEG quality used when freezing a frame for transmission
pub const JPEG_QUALITY: u8 = 92;

/// An immutable still image captured from the live stream at one instant.
///
/// The pixel data is always the unmirrored frame, even when the live
/// preview is mirrored for a selfie view: the backend must receive the
/// pixels the marker was aligned against.
#[derive(Clone)]
pub struct Snapshot {
    /// JPEG-encoded frame, ready for upload
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// When the frame was frozen
    pub taken_at: DateTime<Local>,
}

impl Snapshot {
    /// Freeze an RGBA frame into a JPEG-encoded snapshot
    pub fn from_rgba(frame: &RgbaImage) -> anyhow::Result<Self> {
        let (width, height) = frame.dimensions();
        // JPEG carries no alpha channel
        let rgb = DynamicImage::ImageRgba8(frame.clone()).into_rgb8();

        let mut jpeg = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY);
        encoder
            .encode_image(&rgb)
            .context("JPEG encoding of captured frame failed")?;

        log::debug!(
            "Snapshot frozen: {}x{} pixels, {} bytes",
            width,
            height,
            jpeg.len()
        );

        Ok(Self {
            jpeg,
            width,
            height,
            taken_at: Local::now(),
        })
    }

    /// Decode the snapshot back to pixels (for the captured-image preview)
    pub fn to_rgba(&self) -> anyhow::Result<RgbaImage> {
        let img = image::load_from_memory(&self.jpeg).context("decoding snapshot JPEG")?;
        Ok(img.to_rgba8())
    }

    /// Get the width of the snapshot
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height of the snapshot
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Snapshot({}x{}, {} bytes, {})",
            self.width,
            self.height,
            self.jpeg.len(),
            self.taken_at.format("%H:%M:%S%.3f")
        )
    }
}
