//! Remote inpainting service integration

pub mod client;

pub use client::{InpaintClient, UploadError};
