mod client;
mod framebuffer;

pub use client::VncClient;
pub use framebuffer::FrameBuffer;

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VncError {
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("VNC protocol error: {0}")]
    Protocol(#[from] vnc::Error),
    #[error("Server closed the connection")]
    Disconnected,
    #[error("No complete framebuffer update within {0:?}")]
    CaptureTimeout(Duration),
}

/// Mouse buttons addressable by the pointer tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

impl MouseButton {
    /// Bit in the RFB pointer-event button mask.
    pub fn mask(self) -> u8 {
        match self {
            MouseButton::Left => 0x01,
            MouseButton::Right => 0x04,
        }
    }
}

/// One operation's view of a live display connection.
///
/// `VncClient` is the production implementation; tests substitute a recording
/// session to assert on emitted event sequences.
pub trait DisplaySession {
    /// Move the pointer and report the current button mask in one event.
    fn pointer_event(&mut self, x: u16, y: u16, buttons: u8) -> Result<(), VncError>;

    /// Press (`down = true`) or release a single keysym.
    fn key_event(&mut self, keysym: u32, down: bool) -> Result<(), VncError>;

    /// Fetch one full framebuffer snapshot.
    fn capture(&mut self) -> Result<FrameBuffer, VncError>;

    /// Blocking delay between input events.
    fn pause(&mut self, duration: Duration);
}
