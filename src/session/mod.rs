//! Capture session management module
//!
//! This module contains:
//! - The submission controller and its lifecycle states
//! - Result sets returned by the inpainting service
//! - Message types for session interactions

pub mod controller;
pub mod messages;
pub mod results;
pub mod state;
