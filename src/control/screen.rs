use std::io::Cursor;

use image::imageops::FilterType;
use image::{ImageFormat, RgbImage};

use super::ControlError;
use crate::config::Config;
use crate::vnc::FrameBuffer;

/// Linear logical-to-remote coordinate mapping. Stateless: the same input
/// always maps to the same output for fixed dimensions.
pub fn remap(value: u16, logical: u16, remote: u16) -> u16 {
    (f64::from(value) * f64::from(remote) / f64::from(logical)).round() as u16
}

pub(crate) fn remap_point(config: &Config, x: u16, y: u16) -> (u16, u16) {
    (
        remap(x, config.logical_width, config.remote_width),
        remap(y, config.logical_height, config.remote_height),
    )
}

/// Scale a captured frame to the given dimensions and JPEG-encode it into an
/// in-memory buffer.
pub fn encode_screenshot(
    frame: &FrameBuffer,
    width: u16,
    height: u16,
) -> Result<Vec<u8>, ControlError> {
    let image = RgbImage::from_raw(frame.width.into(), frame.height.into(), frame.to_rgb())
        .ok_or(ControlError::IncompleteFrame)?;
    let image = image::imageops::resize(&image, width.into(), height.into(), FilterType::Lanczos3);

    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Jpeg)?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remap_endpoints() {
        assert_eq!(remap(0, 1024, 1280), 0);
        assert_eq!(remap(1024, 1024, 1280), 1280);
    }

    #[test]
    fn test_remap_identity_when_dimensions_match() {
        for x in [0, 1, 512, 767, 1024] {
            assert_eq!(remap(x, 1024, 1024), x);
        }
    }

    #[test]
    fn test_remap_rounds_to_nearest() {
        // 1 * 768 / 1024 = 0.75 -> 1
        assert_eq!(remap(1, 1024, 768), 1);
        // 1 * 256 / 1024 = 0.25 -> 0
        assert_eq!(remap(1, 1024, 256), 0);
    }

    #[test]
    fn test_encode_screenshot_produces_jpeg_at_target_size() {
        let mut frame = FrameBuffer::new(8, 8);
        frame.update_rect(0, 0, 8, 8, &vec![0x80; 8 * 8 * 4]);

        let bytes = encode_screenshot(&frame, 16, 12).unwrap();
        // JPEG SOI marker
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 16);
        assert_eq!(decoded.height(), 12);
    }
}
