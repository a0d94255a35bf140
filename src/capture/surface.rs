//! Capture surface: owns the live stream and freezes frames on demand

use image::RgbaImage;

use crate::capture::image::Snapshot;
use crate::capture::source::{CaptureError, FrameSource, StreamConfig};
use crate::domain::RegionMarker;
use crate::render::overlay;

/// Handle for an acquired camera stream
#[derive(Clone, Copy, Debug)]
pub struct LiveStream {
    config: StreamConfig,
}

impl LiveStream {
    /// The constraints the stream was acquired with
    pub fn config(&self) -> StreamConfig {
        self.config
    }
}

/// Mediates access to the camera and produces snapshots on demand.
///
/// At most one stream is active per surface; acquiring a new one releases
/// the previous device first, and dropping the surface releases it too.
pub struct CaptureSurface {
    source: Box<dyn FrameSource>,
    stream: Option<LiveStream>,
    marker: RegionMarker,
    mirror_preview: bool,
}

impl CaptureSurface {
    pub fn new(source: Box<dyn FrameSource>, marker: RegionMarker, mirror_preview: bool) -> Self {
        Self {
            source,
            stream: None,
            marker,
            mirror_preview,
        }
    }

    /// Acquire a camera stream with the given constraints.
    ///
    /// Failure means permission was denied or no device matched; the caller
    /// must surface it to the user rather than swallow it.
    pub fn start_stream(&mut self, config: StreamConfig) -> Result<(), CaptureError> {
        self.stop_stream();
        self.source.open(&config)?;
        log::info!(
            "stream started on {} ({}x{}, {:?})",
            self.source.name(),
            config.width,
            config.height,
            config.facing
        );
        self.stream = Some(LiveStream { config });
        Ok(())
    }

    /// Release the camera
    pub fn stop_stream(&mut self) {
        if self.stream.take().is_some() {
            self.source.close();
            log::info!("stream stopped, {} released", self.source.name());
        }
    }

    /// Whether a stream is currently active
    pub fn is_streaming(&self) -> bool {
        self.stream.is_some()
    }

    /// The active stream handle, if any
    pub fn stream(&self) -> Option<LiveStream> {
        self.stream
    }

    /// The marker geometry this surface overlays
    pub fn marker(&self) -> RegionMarker {
        self.marker
    }

    /// Freeze the current frame into a snapshot.
    ///
    /// Returns `None` while no stream is active; callers treat that as a
    /// no-op, not an error. The snapshot is a fresh read of the source at
    /// call time and always holds the unmirrored pixels.
    pub fn capture_frame(&mut self) -> Option<Snapshot> {
        self.stream.as_ref()?;
        let frame = self.source.grab()?;
        match Snapshot::from_rgba(&frame) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                log::error!("failed to freeze frame: {err:#}");
                None
            }
        }
    }

    /// Current live view with the marker overlaid (mirrored if configured)
    pub fn live_preview(&mut self) -> Option<RgbaImage> {
        self.stream.as_ref()?;
        let frame = self.source.grab()?;
        Some(self.compose_preview(&frame, self.mirror_preview))
    }

    /// Captured-image preview with the marker at the same geometry as the
    /// live view
    pub fn snapshot_preview(&self, snapshot: &Snapshot) -> anyhow::Result<RgbaImage> {
        let frame = snapshot.to_rgba()?;
        Ok(self.compose_preview(&frame, false))
    }

    fn compose_preview(&self, frame: &RgbaImage, mirrored: bool) -> RgbaImage {
        let (w, h) = frame.dimensions();
        if mirrored {
            let mut view = overlay::mirror_horizontal(frame);
            overlay::draw_region_marker(&mut view, self.marker.mirrored_placement(w, h));
            view
        } else {
            let mut view = frame.clone();
            overlay::draw_region_marker(&mut view, self.marker.placement(w, h));
            view
        }
    }
}

impl Drop for CaptureSurface {
    fn drop(&mut self) {
        self.stop_stream();
    }
}
