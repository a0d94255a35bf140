//! Runtime configuration for patchcam
//!
//! Everything is resolved once at startup. The only externally
//! configurable value is the service base URL; the rest are fixed
//! defaults of the capture flow.

use std::path::PathBuf;

use crate::capture::source::StreamConfig;
use crate::domain::RegionMarker;

/// Environment variable holding the service base URL
pub const API_URL_VAR: &str = "PATCHCAM_API_URL";
/// Base URL used when no endpoint is configured
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Save location for result images and previews
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveLocation {
    #[default]
    Pictures,
    Documents,
}

impl SaveLocation {
    /// Resolve the directory, falling back to a folder under $HOME
    pub fn resolve_dir(&self) -> Option<PathBuf> {
        match self {
            SaveLocation::Pictures => {
                dirs::picture_dir().or_else(|| dirs::home_dir().map(|h| h.join("Pictures")))
            }
            SaveLocation::Documents => {
                dirs::document_dir().or_else(|| dirs::home_dir().map(|h| h.join("Documents")))
            }
        }
    }
}

/// Application configuration resolved at startup
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the inpainting service
    pub api_url: String,
    /// Requested camera resolution and facing
    pub stream: StreamConfig,
    /// Edge length of the centered region marker in pixels
    pub marker_size: u32,
    /// Whether the live preview is mirrored into a selfie view
    pub mirror_preview: bool,
    /// Where result images and previews are written
    pub save_location: SaveLocation,
}

impl Config {
    /// Resolve configuration from the environment
    pub fn load() -> Self {
        let api_url = endpoint_from(std::env::var(API_URL_VAR).ok().as_deref());
        Self {
            api_url,
            ..Self::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // Default for a locally run service
            api_url: DEFAULT_API_URL.to_string(),
            // Square feed, front camera
            stream: StreamConfig::default(),
            marker_size: RegionMarker::DEFAULT_SIZE,
            mirror_preview: true,
            save_location: SaveLocation::Pictures,
        }
    }
}

/// Pick the service base URL from an optional override
fn endpoint_from(configured: Option<&str>) -> String {
    match configured {
        Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
        Some(_) => {
            log::warn!("{API_URL_VAR} is set but empty, using {DEFAULT_API_URL}");
            DEFAULT_API_URL.to_string()
        }
        None => {
            log::info!("{API_URL_VAR} not set, using {DEFAULT_API_URL}");
            DEFAULT_API_URL.to_string()
        }
    }
}
