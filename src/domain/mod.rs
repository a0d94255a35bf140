//! Pure domain types with minimal dependencies
//!
//! This module contains core types used throughout the application.
//! Types here should have no framework dependencies (image codecs, HTTP)
//! to avoid circular dependencies.

pub mod geometry;
pub mod marker;

pub use geometry::*;
pub use marker::*;
