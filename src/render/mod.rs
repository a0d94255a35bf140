//! Preview rendering module
//!
//! This module contains:
//! - Overlay drawing using tiny-skia (marker outline, preview mirroring)
//! - PNG output for preview files

pub mod overlay;
