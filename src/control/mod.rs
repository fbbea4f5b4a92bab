//! Remote input/display facade: coordinate remapping, key-event sequencing
//! and framebuffer transcoding on top of a session-per-operation VNC layer.

mod controller;
mod screen;

pub use controller::Controller;
pub use screen::{encode_screenshot, remap};

use thiserror::Error;

use crate::keymap::KeymapError;
use crate::vnc::VncError;

#[derive(Error, Debug)]
pub enum ControlError {
    #[error("Session error: {0}")]
    Session(#[from] VncError),
    #[error("Key lookup failed: {0}")]
    Key(#[from] KeymapError),
    #[error("Unsupported character {0:?}; only printable ASCII can be typed")]
    UnsupportedCharacter(char),
    #[error("Captured frame was incomplete")]
    IncompleteFrame,
    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}
