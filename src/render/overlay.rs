//! Overlay rendering using tiny-skia
//!
//! These functions draw the region marker onto RgbaImage previews and write
//! preview files to disk.

use std::io;

use image::RgbaImage;
use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::domain::Rect;

/// Marker outline color (red, like the original alignment square)
const MARKER_COLOR: [u8; 4] = [220, 30, 30, 255];

/// Marker outline stroke width in pixels
const MARKER_THICKNESS: f32 = 3.0;

/// Convert RgbaImage to Pixmap, apply drawing function, and copy back
fn with_pixmap(img: &mut RgbaImage, f: impl FnOnce(&mut Pixmap)) {
    let (w, h) = (img.width(), img.height());
    let Some(size) = tiny_skia::IntSize::from_wh(w, h) else {
        return;
    };
    let Some(mut pixmap) = Pixmap::from_vec(img.as_raw().clone(), size) else {
        return;
    };

    f(&mut pixmap);

    // Copy back
    img.copy_from_slice(pixmap.data());
}

/// Draw the region marker outline onto a preview image.
///
/// Both the live view and the captured preview route through this one
/// function with the same placement rectangle, which is what keeps the two
/// overlays pixel-identical.
pub fn draw_region_marker(img: &mut RgbaImage, rect: Rect) {
    if rect.width() <= 0 || rect.height() <= 0 {
        return;
    }

    with_pixmap(img, |pixmap| {
        let mut pb = PathBuilder::new();
        pb.move_to(rect.left as f32, rect.top as f32);
        pb.line_to(rect.right as f32, rect.top as f32);
        pb.line_to(rect.right as f32, rect.bottom as f32);
        pb.line_to(rect.left as f32, rect.bottom as f32);
        pb.close();
        let Some(path) = pb.finish() else {
            return;
        };

        let [r, g, b, a] = MARKER_COLOR;
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = true;

        let stroke = Stroke {
            width: MARKER_THICKNESS,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    });
}

/// Mirror a frame horizontally for the selfie-style live preview
pub fn mirror_horizontal(img: &RgbaImage) -> RgbaImage {
    image::imageops::flip_horizontal(img)
}

/// Write an RGBA image as a PNG file (used for preview files)
pub fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}
