//! Camera capture module
//!
//! This module consolidates:
//! - Frame sources and stream constraints (source.rs)
//! - The capture surface that freezes frames (surface.rs)
//! - Snapshot image type (image.rs)

pub mod image;
pub mod source;
pub mod surface;
