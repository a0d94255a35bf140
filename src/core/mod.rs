//! Core application module
//!
//! This module contains:
//! - Application wiring and the event loop

pub mod app;
