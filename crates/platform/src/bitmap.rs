//! 1-bit bitmap resources
//!
//! Bitmaps are read-only views over packed pixel data bundled with the
//! application. Rows are `row_stride` bytes wide; within a byte, bit 0 is
//! the leftmost pixel. A set bit is white.
//!
//! # Packed resource format
//!
//! ```text
//! offset  size  field
//! 0       2     row_size_bytes (u16 LE)
//! 2       2     info_flags     (u16 LE)  version << 12 | format << 1 | heap flag
//! 4       2     bounds.x       (i16 LE)
//! 6       2     bounds.y       (i16 LE)
//! 8       2     bounds.w       (i16 LE)
//! 10      2     bounds.h       (i16 LE)
//! 12      ..    pixel rows
//! ```

use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;
use thiserror::Error;

/// Header length of the packed resource format.
pub const PBI_HEADER_LEN: usize = 12;

/// Bitmap decoding failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitmapError {
    /// Fewer bytes than the header or the declared rows need.
    #[error("bitmap data truncated: need {needed} bytes, have {actual}")]
    Truncated {
        /// Bytes required.
        needed: usize,
        /// Bytes available.
        actual: usize,
    },
    /// Row stride too narrow for the bounds.
    #[error("row stride {stride} too narrow for {width} px")]
    StrideTooNarrow {
        /// Declared row stride in bytes.
        stride: u16,
        /// Right edge of the bounds in pixels.
        width: u32,
    },
    /// Negative origin or size in the bounds.
    #[error("bitmap bounds are negative")]
    NegativeBounds,
    /// Unsupported format version.
    #[error("unsupported bitmap version {0}")]
    UnsupportedVersion(u8),
    /// Pixel format other than 1 bit per pixel.
    #[error("unsupported pixel format {0}")]
    UnsupportedFormat(u8),
}

/// Read-only 1-bit bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bitmap<'a> {
    data: &'a [u8],
    row_stride: u16,
    bounds: Rectangle,
}

impl<'a> Bitmap<'a> {
    /// Wrap raw rows of `size`, each `row_stride` bytes long.
    pub fn new(data: &'a [u8], row_stride: u16, size: Size) -> Result<Self, BitmapError> {
        Self::with_bounds(data, row_stride, Rectangle::new(Point::zero(), size))
    }

    fn with_bounds(data: &'a [u8], row_stride: u16, bounds: Rectangle) -> Result<Self, BitmapError> {
        if bounds.top_left.x < 0 || bounds.top_left.y < 0 {
            return Err(BitmapError::NegativeBounds);
        }
        // Non-negative checked above.
        #[allow(clippy::cast_sign_loss)]
        let (right, bottom) = (
            bounds.top_left.x as u32 + bounds.size.width,
            bounds.top_left.y as u32 + bounds.size.height,
        );
        if u32::from(row_stride) * 8 < right {
            return Err(BitmapError::StrideTooNarrow {
                stride: row_stride,
                width: right,
            });
        }
        let needed = usize::from(row_stride) * bottom as usize;
        if data.len() < needed {
            return Err(BitmapError::Truncated {
                needed,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            row_stride,
            bounds,
        })
    }

    /// Parse the packed resource format.
    pub fn from_pbi(bytes: &'a [u8]) -> Result<Self, BitmapError> {
        let (header, pixels) = match (bytes.get(..PBI_HEADER_LEN), bytes.get(PBI_HEADER_LEN..)) {
            (Some(h), Some(p)) => (h, p),
            _ => {
                return Err(BitmapError::Truncated {
                    needed: PBI_HEADER_LEN,
                    actual: bytes.len(),
                })
            }
        };
        let u16_at = |i: usize| {
            u16::from_le_bytes([
                header.get(i).copied().unwrap_or(0),
                header.get(i + 1).copied().unwrap_or(0),
            ])
        };
        let row_stride = u16_at(0);
        let info_flags = u16_at(2);
        // Top nibble / five format bits: both fit in u8.
        #[allow(clippy::cast_possible_truncation)]
        let (version, format) = ((info_flags >> 12) as u8, ((info_flags >> 1) & 0x1f) as u8);
        if version > 1 {
            return Err(BitmapError::UnsupportedVersion(version));
        }
        if format != 0 {
            return Err(BitmapError::UnsupportedFormat(format));
        }
        #[allow(clippy::cast_possible_wrap)]
        let (x, y, w, h) = (
            u16_at(4) as i16,
            u16_at(6) as i16,
            u16_at(8) as i16,
            u16_at(10) as i16,
        );
        if w < 0 || h < 0 {
            return Err(BitmapError::NegativeBounds);
        }
        #[allow(clippy::cast_sign_loss)]
        let bounds = Rectangle::new(
            Point::new(i32::from(x), i32::from(y)),
            Size::new(w as u32, h as u32),
        );
        Self::with_bounds(pixels, row_stride, bounds)
    }

    /// Region of the data that makes up the image.
    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    /// Image size.
    pub fn size(&self) -> Size {
        self.bounds.size
    }

    /// Bytes per row.
    pub fn row_stride(&self) -> u16 {
        self.row_stride
    }

    /// Pixel at `p`, relative to the bounds origin. `None` outside the bounds.
    pub fn pixel(&self, p: Point) -> Option<bool> {
        if p.x < 0 || p.y < 0 {
            return None;
        }
        #[allow(clippy::cast_sign_loss)]
        let (px, py) = (p.x as u32, p.y as u32);
        if px >= self.bounds.size.width || py >= self.bounds.size.height {
            return None;
        }
        #[allow(clippy::cast_sign_loss)]
        let (x, y) = (
            px as usize + self.bounds.top_left.x as usize,
            py as usize + self.bounds.top_left.y as usize,
        );
        let byte = self.data.get(y * usize::from(self.row_stride) + x / 8)?;
        Some(byte >> (x % 8) & 1 == 1)
    }
}

/// Bytes per row needed for `width` pixels.
// Bitmaps on this display are at most a few hundred pixels wide.
#[allow(clippy::cast_possible_truncation)]
pub const fn row_stride_for(width: u32) -> u16 {
    width.div_ceil(8) as u16
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// 3x2 image: top row white-black-white, bottom row all black.
    const PIXELS: [u8; 2] = [0b0000_0101, 0b0000_0000];

    #[test]
    fn pixel_reads_lsb_first() {
        let bmp = Bitmap::new(&PIXELS, 1, Size::new(3, 2)).unwrap();
        assert_eq!(bmp.pixel(Point::new(0, 0)), Some(true));
        assert_eq!(bmp.pixel(Point::new(1, 0)), Some(false));
        assert_eq!(bmp.pixel(Point::new(2, 0)), Some(true));
        assert_eq!(bmp.pixel(Point::new(2, 1)), Some(false));
        assert_eq!(bmp.pixel(Point::new(3, 0)), None);
        assert_eq!(bmp.pixel(Point::new(0, -1)), None);
    }

    #[test]
    fn new_rejects_short_data() {
        let err = Bitmap::new(&PIXELS, 1, Size::new(3, 3)).unwrap_err();
        assert_eq!(err, BitmapError::Truncated { needed: 3, actual: 2 });
    }

    #[test]
    fn new_rejects_narrow_stride() {
        let err = Bitmap::new(&PIXELS, 1, Size::new(9, 1)).unwrap_err();
        assert_eq!(err, BitmapError::StrideTooNarrow { stride: 1, width: 9 });
    }

    #[test]
    fn from_pbi_parses_header() {
        let mut raw = [0u8; PBI_HEADER_LEN + 4];
        raw[0] = 2; // row stride
        raw[3] = 0x10; // version 1
        raw[8] = 10; // w
        raw[10] = 2; // h
        raw[PBI_HEADER_LEN] = 0xff;
        let bmp = Bitmap::from_pbi(&raw).unwrap();
        assert_eq!(bmp.size(), Size::new(10, 2));
        assert_eq!(bmp.row_stride(), 2);
        assert_eq!(bmp.pixel(Point::new(7, 0)), Some(true));
        assert_eq!(bmp.pixel(Point::new(8, 0)), Some(false));
    }

    #[test]
    fn from_pbi_rejects_truncated_header() {
        assert_eq!(
            Bitmap::from_pbi(&[0u8; 5]),
            Err(BitmapError::Truncated { needed: PBI_HEADER_LEN, actual: 5 })
        );
    }

    #[test]
    fn from_pbi_rejects_other_formats() {
        let mut raw = [0u8; PBI_HEADER_LEN];
        raw[2] = 0b0000_0010; // format 1
        assert_eq!(Bitmap::from_pbi(&raw), Err(BitmapError::UnsupportedFormat(1)));
        raw[2] = 0;
        raw[3] = 0x20; // version 2
        assert_eq!(Bitmap::from_pbi(&raw), Err(BitmapError::UnsupportedVersion(2)));
    }

    #[test]
    fn stride_rounds_up() {
        assert_eq!(row_stride_for(1), 1);
        assert_eq!(row_stride_for(8), 1);
        assert_eq!(row_stride_for(9), 2);
        assert_eq!(row_stride_for(144), 18);
    }
}
