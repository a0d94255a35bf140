//! Result sets returned by the inpainting service

use std::path::{Path, PathBuf};

use anyhow::Context;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::RgbaImage;
use serde::Deserialize;

/// Which of the three service outputs to address
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultKind {
    /// The submitted photo as the service resized it
    BaseImage,
    /// The photo with the centered region cut out
    ImageWithHole,
    /// The inpainted reconstruction
    Prediction,
}

impl ResultKind {
    pub const ALL: [ResultKind; 3] = [Self::BaseImage, Self::ImageWithHole, Self::Prediction];

    /// Stable name used in filenames and status output
    pub fn label(&self) -> &'static str {
        match self {
            Self::BaseImage => "base",
            Self::ImageWithHole => "hole",
            Self::Prediction => "prediction",
        }
    }
}

/// The three images one successful submission produces.
///
/// Payloads stay base64 exactly as received; rendering consumes them as
/// data URIs and only `decode` re-inflates the pixels.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct ResultSet {
    pub base_image: String,
    pub image_with_hole: String,
    pub prediction: String,
}

impl ResultSet {
    fn payload(&self, kind: ResultKind) -> &str {
        match kind {
            ResultKind::BaseImage => &self.base_image,
            ResultKind::ImageWithHole => &self.image_with_hole,
            ResultKind::Prediction => &self.prediction,
        }
    }

    /// Renderable `data:` URI for one output
    pub fn data_uri(&self, kind: ResultKind) -> String {
        format!("data:image/jpeg;base64,{}", self.payload(kind))
    }

    /// Decode one output back into pixels
    pub fn decode(&self, kind: ResultKind) -> anyhow::Result<RgbaImage> {
        let bytes = STANDARD
            .decode(self.payload(kind))
            .with_context(|| format!("{} payload is not valid base64", kind.label()))?;
        let img = image::load_from_memory(&bytes)
            .with_context(|| format!("{} payload is not a decodable image", kind.label()))?;
        Ok(img.to_rgba8())
    }

    /// Write all three outputs as JPEG files into `dir`, one timestamped
    /// file per kind. Returns the paths written.
    pub fn save_all(&self, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
        let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
        let mut written = Vec::with_capacity(ResultKind::ALL.len());
        for kind in ResultKind::ALL {
            let bytes = STANDARD
                .decode(self.payload(kind))
                .with_context(|| format!("{} payload is not valid base64", kind.label()))?;
            let path = dir.join(format!("Patchcam_{}_{}.jpg", stamp, kind.label()));
            std::fs::write(&path, &bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            written.push(path);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded_jpeg(width: u32, height: u32) -> String {
        let img = RgbaImage::from_pixel(width, height, image::Rgba([40, 90, 140, 255]));
        let snap = crate::capture::image::Snapshot::from_rgba(&img).unwrap();
        STANDARD.encode(&snap.jpeg)
    }

    fn sample() -> ResultSet {
        ResultSet {
            base_image: encoded_jpeg(8, 8),
            image_with_hole: encoded_jpeg(8, 8),
            prediction: encoded_jpeg(4, 4),
        }
    }

    #[test]
    fn test_data_uri_prefixes_payload_once() {
        let results = sample();
        let uri = results.data_uri(ResultKind::Prediction);
        assert!(uri.starts_with("data:image/jpeg;base64,"));
        assert_eq!(&uri["data:image/jpeg;base64,".len()..], results.prediction);
    }

    #[test]
    fn test_decode_restores_dimensions() {
        let results = sample();
        assert_eq!(results.decode(ResultKind::BaseImage).unwrap().dimensions(), (8, 8));
        assert_eq!(results.decode(ResultKind::Prediction).unwrap().dimensions(), (4, 4));
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        let results = ResultSet {
            base_image: "not@base64!".into(),
            ..sample()
        };
        assert!(results.decode(ResultKind::BaseImage).is_err());
    }

    #[test]
    fn test_save_all_writes_three_jpegs() {
        let dir = tempfile::tempdir().unwrap();
        let results = sample();
        let written = results.save_all(dir.path()).unwrap();

        assert_eq!(written.len(), 3);
        for (path, kind) in written.iter().zip(ResultKind::ALL) {
            let name = path.file_name().unwrap().to_str().unwrap();
            assert!(name.starts_with("Patchcam_"));
            assert!(name.ends_with(&format!("_{}.jpg", kind.label())));
            let bytes = std::fs::read(path).unwrap();
            assert_eq!(bytes, STANDARD.decode(results.payload(kind)).unwrap());
        }
    }

    #[test]
    fn test_parses_service_response_shape() {
        let json = r#"{"base_image":"QUFB","image_with_hole":"QkJC","prediction":"Q0ND"}"#;
        let results: ResultSet = serde_json::from_str(json).unwrap();
        assert_eq!(results.base_image, "QUFB");
        assert_eq!(results.data_uri(ResultKind::ImageWithHole), "data:image/jpeg;base64,QkJC");
    }
}
