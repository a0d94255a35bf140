//! Region-of-interest marker geometry
//!
//! The marker is a fixed-size square centered on the frame. It is a purely
//! visual alignment guide: the backend punches its hole at the frame center
//! on its own, so the marker carries no data upstream. It must land on the
//! same pixels in the live view and in the captured preview.

use super::geometry::Rect;

/// Fixed-geometry overlay indicating the region the backend will fill in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionMarker {
    /// Side length of the square in logical pixels
    pub size: u32,
}

impl RegionMarker {
    /// Default side length, matching the service's mask footprint
    pub const DEFAULT_SIZE: u32 = 96;

    /// Create a marker with the given square size
    pub fn new(size: u32) -> Self {
        Self { size }
    }

    /// Placement of the marker on an unmirrored frame: a centered square,
    /// clamped to the frame bounds. Centering floors like the service does,
    /// so the outline sits exactly where the hole will be punched.
    pub fn placement(&self, frame_width: u32, frame_height: u32) -> Rect {
        let size = self.size as i32;
        let w = frame_width as i32;
        let h = frame_height as i32;
        let left = (w - size) / 2;
        let top = (h - size) / 2;
        let square = Rect::new(left, top, left + size, top + size);
        square.intersect(Rect::new(0, 0, w, h)).unwrap_or_default()
    }

    /// Placement in the coordinates of a horizontally mirrored view of the
    /// frame. Covers the same underlying pixels as [`Self::placement`], so a
    /// selfie-style preview still shows the user the exact region the
    /// backend will receive.
    pub fn mirrored_placement(&self, frame_width: u32, frame_height: u32) -> Rect {
        self.placement(frame_width, frame_height)
            .mirror_x(frame_width as i32)
    }
}

impl Default for RegionMarker {
    fn default() -> Self {
        Self {
            size: Self::DEFAULT_SIZE,
        }
    }
}
