//! QR decoding of sampled video frames.

use tracing::debug;

/// An RGBA8 frame as read back from a 2D canvas.
#[derive(Debug, Clone, Copy)]
pub struct RgbaFrame<'a> {
    width: u32,
    height: u32,
    data: &'a [u8],
}

impl<'a> RgbaFrame<'a> {
    /// Returns `None` unless `data` holds exactly `width * height` pixels.
    pub fn new(width: u32, height: u32, data: &'a [u8]) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        (width > 0 && height > 0 && data.len() == expected).then_some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Rec. 709 luma of one pixel; alpha is ignored.
    pub fn luma(&self, x: usize, y: usize) -> u8 {
        let i = (y * self.width as usize + x) * 4;
        let (r, g, b) = (
            self.data[i] as u32,
            self.data[i + 1] as u32,
            self.data[i + 2] as u32,
        );
        ((r * 2126 + g * 7152 + b * 722) / 10_000) as u8
    }
}

pub trait QrDecoder {
    /// Text payload of the first readable code in the frame.
    fn decode(&mut self, frame: &RgbaFrame<'_>) -> Option<String>;
}

/// Decoder backed by `rqrr`. Only dark-on-light codes are searched.
#[derive(Debug, Default, Clone, Copy)]
pub struct RqrrDecoder;

impl QrDecoder for RqrrDecoder {
    fn decode(&mut self, frame: &RgbaFrame<'_>) -> Option<String> {
        let mut image = rqrr::PreparedImage::prepare_from_greyscale(
            frame.width as usize,
            frame.height as usize,
            |x, y| frame.luma(x, y),
        );

        for grid in image.detect_grids() {
            match grid.decode() {
                Ok((_, content)) if !content.is_empty() => return Some(content),
                Ok(_) => {}
                Err(e) => debug!(error = ?e, "QR grid found but not decodable"),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrcode::{Color, QrCode};

    const MODULE_PX: usize = 6;
    const QUIET_MODULES: usize = 4;

    /// Render `payload` as a black-on-white RGBA frame with a quiet zone.
    fn render(payload: &str) -> (u32, Vec<u8>) {
        let code = QrCode::new(payload.as_bytes()).unwrap();
        let modules = code.width();
        let colors = code.to_colors();
        let side = (modules + 2 * QUIET_MODULES) * MODULE_PX;

        let mut rgba = vec![255u8; side * side * 4];
        for y in 0..side {
            for x in 0..side {
                let mx = (x / MODULE_PX) as isize - QUIET_MODULES as isize;
                let my = (y / MODULE_PX) as isize - QUIET_MODULES as isize;
                let dark = mx >= 0
                    && my >= 0
                    && (mx as usize) < modules
                    && (my as usize) < modules
                    && colors[my as usize * modules + mx as usize] == Color::Dark;
                if dark {
                    let i = (y * side + x) * 4;
                    rgba[i..i + 3].fill(0);
                }
            }
        }
        (side as u32, rgba)
    }

    #[test]
    fn frame_requires_exact_buffer_length() {
        let data = vec![0u8; 2 * 2 * 4];
        assert!(RgbaFrame::new(2, 2, &data).is_some());
        assert!(RgbaFrame::new(3, 2, &data).is_none());
        assert!(RgbaFrame::new(0, 0, &[]).is_none());
    }

    #[test]
    fn luma_of_primaries() {
        let data = [255, 255, 255, 255, 0, 0, 0, 255];
        let frame = RgbaFrame::new(2, 1, &data).unwrap();
        assert_eq!(frame.luma(0, 0), 255);
        assert_eq!(frame.luma(1, 0), 0);
    }

    #[test]
    fn decodes_rendered_code() {
        let (side, rgba) = render("https://x/a");
        let frame = RgbaFrame::new(side, side, &rgba).unwrap();
        assert_eq!(RqrrDecoder.decode(&frame).as_deref(), Some("https://x/a"));
    }

    #[test]
    fn blank_frame_has_no_code() {
        let rgba = vec![255u8; 64 * 64 * 4];
        let frame = RgbaFrame::new(64, 64, &rgba).unwrap();
        assert!(RqrrDecoder.decode(&frame).is_none());
    }
}
