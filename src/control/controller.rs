use std::time::Duration;

use tracing::debug;

use super::{screen, ControlError};
use crate::config::Config;
use crate::keymap;
use crate::vnc::{DisplaySession, MouseButton, VncClient};

/// Gap between successive input events.
const EVENT_PAUSE: Duration = Duration::from_millis(50);

/// Stateless facade over the VNC session layer. Every operation opens its own
/// session and releases it when the session value drops, error paths included.
///
/// The `*_with` methods carry the actual sequencing logic against the
/// [`DisplaySession`] trait, so callers (and tests) can drive a session they
/// already hold.
pub struct Controller {
    config: Config,
}

impl Controller {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn connect(&self) -> Result<VncClient, ControlError> {
        Ok(VncClient::connect(&self.config)?)
    }

    /// Capture the remote screen, scaled to the logical display size, as
    /// JPEG bytes.
    pub fn screenshot(&self) -> Result<Vec<u8>, ControlError> {
        let mut session = self.connect()?;
        self.screenshot_with(&mut session)
    }

    pub fn click(
        &self,
        x: u16,
        y: u16,
        button: MouseButton,
        repeat: u32,
    ) -> Result<(), ControlError> {
        let mut session = self.connect()?;
        self.click_with(&mut session, x, y, button, repeat)
    }

    pub fn type_text(&self, text: &str) -> Result<(), ControlError> {
        let mut session = self.connect()?;
        self.type_text_with(&mut session, text)
    }

    pub fn keyboard_shortcut(&self, keys: &[String]) -> Result<(), ControlError> {
        let mut session = self.connect()?;
        self.keyboard_shortcut_with(&mut session, keys)
    }

    pub fn drag(
        &self,
        x_start: u16,
        y_start: u16,
        x_end: u16,
        y_end: u16,
    ) -> Result<(), ControlError> {
        let mut session = self.connect()?;
        self.drag_with(&mut session, x_start, y_start, x_end, y_end)
    }

    pub fn screenshot_with<S: DisplaySession>(
        &self,
        session: &mut S,
    ) -> Result<Vec<u8>, ControlError> {
        let frame = session.capture()?;
        debug!(width = frame.width, height = frame.height, "captured frame");
        screen::encode_screenshot(&frame, self.config.logical_width, self.config.logical_height)
    }

    pub fn click_with<S: DisplaySession>(
        &self,
        session: &mut S,
        x: u16,
        y: u16,
        button: MouseButton,
        repeat: u32,
    ) -> Result<(), ControlError> {
        let (x, y) = screen::remap_point(&self.config, x, y);
        debug!(x, y, ?button, repeat, "mouse click");
        session.pointer_event(x, y, 0)?;
        for _ in 0..repeat {
            // explicit press and release to improve compatibility with some servers
            session.pointer_event(x, y, button.mask())?;
            session.pause(EVENT_PAUSE);
            session.pointer_event(x, y, 0)?;
            session.pause(EVENT_PAUSE);
        }
        Ok(())
    }

    pub fn type_text_with<S: DisplaySession>(
        &self,
        session: &mut S,
        text: &str,
    ) -> Result<(), ControlError> {
        debug!(chars = text.len(), "typing text");
        for ch in text.chars() {
            if ch != ' ' && !ch.is_ascii_graphic() {
                return Err(ControlError::UnsupportedCharacter(ch));
            }
            let descriptor = if ch.is_ascii_uppercase() {
                format!("shift-{}", ch.to_ascii_lowercase())
            } else {
                ch.to_string()
            };
            self.press_chord(session, &descriptor)?;
            session.pause(EVENT_PAUSE);
        }
        Ok(())
    }

    pub fn keyboard_shortcut_with<S: DisplaySession>(
        &self,
        session: &mut S,
        keys: &[String],
    ) -> Result<(), ControlError> {
        let descriptor = keys
            .iter()
            .map(|key| key.to_lowercase())
            .collect::<Vec<_>>()
            .join("-");
        debug!(%descriptor, "keyboard shortcut");
        self.press_chord(session, &descriptor)?;
        session.pause(EVENT_PAUSE);
        Ok(())
    }

    /// Held-button move: this is a pointer drag, not a touch gesture.
    pub fn drag_with<S: DisplaySession>(
        &self,
        session: &mut S,
        x_start: u16,
        y_start: u16,
        x_end: u16,
        y_end: u16,
    ) -> Result<(), ControlError> {
        let (x_start, y_start) = screen::remap_point(&self.config, x_start, y_start);
        let (x_end, y_end) = screen::remap_point(&self.config, x_end, y_end);
        debug!(x_start, y_start, x_end, y_end, "mouse drag");

        let held = MouseButton::Left.mask();
        session.pointer_event(x_start, y_start, 0)?;
        session.pause(EVENT_PAUSE);
        session.pointer_event(x_start, y_start, held)?;
        session.pause(EVENT_PAUSE);
        // the move carries the held mask; that is what makes it a drag
        session.pointer_event(x_end, y_end, held)?;
        session.pause(EVENT_PAUSE);
        session.pointer_event(x_end, y_end, 0)?;
        session.pause(EVENT_PAUSE);
        Ok(())
    }

    /// Key-downs in token order, key-ups in reverse: a simultaneous chord as
    /// the wire protocol expresses it. Resolution happens before any event is
    /// sent, so an unknown token never leaves keys half-pressed.
    fn press_chord<S: DisplaySession>(
        &self,
        session: &mut S,
        descriptor: &str,
    ) -> Result<(), ControlError> {
        let keysyms = keymap::resolve_chord(descriptor)?;
        for &keysym in &keysyms {
            session.key_event(keysym, true)?;
        }
        for &keysym in keysyms.iter().rev() {
            session.key_event(keysym, false)?;
        }
        Ok(())
    }
}
