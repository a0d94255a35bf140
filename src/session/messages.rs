//! Message types for the capture session
//!
//! This module contains:
//! - Msg enum driving the event loop
//! - Parsing of interactive prompt commands into messages

use crate::session::controller::UploadOutcome;

/// Messages for capture session interactions
#[derive(Debug)]
pub enum Msg {
    /// Freeze the current camera frame into a snapshot
    Capture,
    /// Submit the active snapshot to the inpainting service
    Submit,
    /// Write the live and captured previews (marker included) to disk
    Preview,
    /// Print session state, endpoint and result summary
    Status,
    /// An upload landed, tagged with the generation that authorized it
    UploadFinished(u64, UploadOutcome),
    /// Leave the application
    Quit,
}

impl Msg {
    /// Parse one interactive command line.
    ///
    /// Returns `None` for blank input and `Err` with the offending word for
    /// anything unrecognized.
    pub fn parse(line: &str) -> Option<Result<Self, String>> {
        let cmd = line.trim();
        if cmd.is_empty() {
            return None;
        }
        Some(match cmd {
            "capture" | "c" => Ok(Self::Capture),
            "submit" | "s" => Ok(Self::Submit),
            "preview" | "p" => Ok(Self::Preview),
            "status" => Ok(Self::Status),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            other => Err(other.to_string()),
        })
    }
}
