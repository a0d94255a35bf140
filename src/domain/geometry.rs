//! Geometric types for frame regions and overlay placement

/// Logical Size and Position of a rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// Create a new rectangle from coordinates
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Calculate the intersection of two rectangles
    pub fn intersect(&self, other: Rect) -> Option<Rect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right);
        let bottom = self.bottom.min(other.bottom);
        if left < right && top < bottom {
            Some(Rect {
                left,
                top,
                right,
                bottom,
            })
        } else {
            None
        }
    }

    /// Get the width of the rectangle
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Get the height of the rectangle
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Check if this rectangle contains a point
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Reflect the rectangle across the vertical axis of a frame of the
    /// given width. Maps coordinates of a mirrored view back onto the
    /// unmirrored frame (and vice versa).
    pub fn mirror_x(&self, frame_width: i32) -> Rect {
        Rect {
            left: frame_width - self.right,
            top: self.top,
            right: frame_width - self.left,
            bottom: self.bottom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersect_overlapping() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 15, 15);
        assert_eq!(a.intersect(b), Some(Rect::new(5, 5, 10, 10)));
    }

    #[test]
    fn test_intersect_disjoint() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(20, 20, 30, 30);
        assert_eq!(a.intersect(b), None);
    }

    #[test]
    fn test_mirror_x_roundtrip() {
        let r = Rect::new(10, 20, 40, 60);
        let mirrored = r.mirror_x(100);
        assert_eq!(mirrored, Rect::new(60, 20, 90, 60));
        assert_eq!(mirrored.mirror_x(100), r);
    }

    #[test]
    fn test_mirror_x_centered_is_fixed_point() {
        // A square centered on the frame maps onto itself.
        let r = Rect::new(32, 16, 96, 80);
        assert_eq!(r.mirror_x(128), r);
    }

    #[test]
    fn test_contains_point_edges() {
        let r = Rect::new(0, 0, 4, 4);
        assert!(r.contains_point(0, 0));
        assert!(r.contains_point(3, 3));
        assert!(!r.contains_point(4, 4));
        assert!(!r.contains_point(-1, 0));
    }
}
