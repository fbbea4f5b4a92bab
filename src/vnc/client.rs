use std::net::TcpStream;
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;
use vnc::client::{AuthChoice, Event};
use vnc::{Client, PixelFormat, Rect};

use super::{DisplaySession, FrameBuffer, VncError};
use crate::config::Config;

/// How long to wait for the server to deliver a complete framebuffer update.
const CAPTURE_DEADLINE: Duration = Duration::from_secs(10);
/// Poll interval while waiting for framebuffer events.
const POLL_INTERVAL: Duration = Duration::from_millis(16);

pub struct VncClient {
    client: Client,
    width: u16,
    height: u16,
}

impl VncClient {
    /// Open an authenticated session. One session serves exactly one
    /// operation; dropping the value closes the underlying TCP stream.
    pub fn connect(config: &Config) -> Result<Self, VncError> {
        let addr = format!("{}:{}", config.host, config.port);
        let tcp = TcpStream::connect(&addr)
            .map_err(|e| VncError::Connection(format!("Failed to connect to {}: {}", addr, e)))?;
        tcp.set_nonblocking(false)
            .map_err(|e| VncError::Connection(e.to_string()))?;

        let password = config.password.clone();
        let mut client = Client::from_tcp_stream(tcp, false, move |_auth_methods| {
            // VNC password auth is a DES challenge keyed on exactly 8 bytes
            let mut key = [0u8; 8];
            let bytes = password.as_bytes();
            let len = bytes.len().min(8);
            key[..len].copy_from_slice(&bytes[..len]);
            Some(AuthChoice::Password(key))
        })?;

        let (width, height) = client.size();
        debug!(width, height, "VNC session established");

        // 32-bit true colour, red in the high byte
        let pixel_format = PixelFormat {
            bits_per_pixel: 32,
            depth: 24,
            big_endian: false,
            true_colour: true,
            red_max: 255,
            green_max: 255,
            blue_max: 255,
            red_shift: 16,
            green_shift: 8,
            blue_shift: 0,
        };
        client.set_format(pixel_format)?;

        client.set_encodings(&[vnc::Encoding::Zrle, vnc::Encoding::CopyRect, vnc::Encoding::Raw])?;

        Ok(Self {
            client,
            width,
            height,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    fn request_full_update(&mut self) -> Result<(), VncError> {
        self.client.request_update(
            Rect {
                left: 0,
                top: 0,
                width: self.width,
                height: self.height,
            },
            false,
        )?;
        Ok(())
    }
}

impl DisplaySession for VncClient {
    fn pointer_event(&mut self, x: u16, y: u16, buttons: u8) -> Result<(), VncError> {
        self.client.send_pointer_event(buttons, x, y)?;
        Ok(())
    }

    fn key_event(&mut self, keysym: u32, down: bool) -> Result<(), VncError> {
        self.client.send_key_event(down, keysym)?;
        Ok(())
    }

    fn capture(&mut self) -> Result<FrameBuffer, VncError> {
        let mut framebuffer = FrameBuffer::new(self.width, self.height);
        self.request_full_update()?;

        let deadline = Instant::now() + CAPTURE_DEADLINE;
        loop {
            match self.client.poll_event() {
                Some(Event::PutPixels(rect, pixels)) => {
                    framebuffer.update_rect(rect.left, rect.top, rect.width, rect.height, &pixels);
                }
                Some(Event::CopyPixels { src, dst }) => {
                    framebuffer.copy_rect(src.left, src.top, dst.left, dst.top, dst.width, dst.height);
                }
                Some(Event::Resize(width, height)) => {
                    // server changed resolution mid-capture; start over
                    self.width = width;
                    self.height = height;
                    framebuffer.resize(width, height);
                    self.request_full_update()?;
                }
                Some(Event::EndOfFrame) => return Ok(framebuffer),
                Some(Event::Disconnected(None)) => return Err(VncError::Disconnected),
                Some(Event::Disconnected(Some(e))) => return Err(VncError::Protocol(e)),
                Some(_) => {
                    // cursor shapes, bells, clipboard: not part of the capture
                }
                None => {
                    if Instant::now() >= deadline {
                        return Err(VncError::CaptureTimeout(CAPTURE_DEADLINE));
                    }
                    thread::sleep(POLL_INTERVAL);
                }
            }
        }
    }

    fn pause(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}
