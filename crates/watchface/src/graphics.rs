//! 1-bit framebuffer and compositing primitives
//!
//! The display is 144x168 pixels, one bit each, white = set. Two-tone hands
//! and glyphs are built from a pair of monochrome bitmaps: the white image
//! drawn with [`CompositingMode::Or`], then the black mask drawn with
//! [`CompositingMode::Clear`].

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Point, Size};
use embedded_graphics::primitives::{ContainsPoint, PointsIter, Rectangle};

use platform::bitmap::row_stride_for;
use platform::Bitmap;

use crate::angle::{cos_lookup, sin_lookup, TRIG_MAX_RATIO};

/// Display width in pixels.
pub const DISPLAY_WIDTH: u32 = 144;
/// Display height in pixels.
pub const DISPLAY_HEIGHT: u32 = 168;
/// Full-screen rectangle.
pub const SCREEN: Rectangle = Rectangle::new(Point::zero(), Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT));
/// Centre of the dial; hand pivots land here.
#[allow(clippy::cast_possible_wrap)]
pub const SCREEN_CENTER: Point = Point::new(DISPLAY_WIDTH as i32 / 2, DISPLAY_HEIGHT as i32 / 2);

const STRIDE: usize = row_stride_for(DISPLAY_WIDTH) as usize;
const FRAMEBUFFER_LEN: usize = STRIDE * DISPLAY_HEIGHT as usize;

/// How a source pixel combines with the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CompositingMode {
    /// `dst = src`
    #[default]
    Assign,
    /// `dst = !src`
    AssignInverted,
    /// `dst |= src`: white source pixels turn white.
    Or,
    /// `dst &= src`
    And,
    /// `dst &= !src`: white source pixels turn black.
    Clear,
    /// `dst |= !src`
    Set,
}

impl CompositingMode {
    /// Combine one source pixel with one destination pixel.
    pub const fn apply(self, dst: bool, src: bool) -> bool {
        match self {
            Self::Assign => src,
            Self::AssignInverted => !src,
            Self::Or => dst | src,
            Self::And => dst & src,
            Self::Clear => dst & !src,
            Self::Set => dst | !src,
        }
    }
}

/// Whole-screen 1-bit framebuffer, rows packed LSB-first like [`Bitmap`].
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    bits: [u8; FRAMEBUFFER_LEN],
}

impl core::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Framebuffer")
            .field("white_pixels", &self.count_white(SCREEN))
            .finish()
    }
}

impl Framebuffer {
    /// White screen.
    pub const fn new() -> Self {
        Self {
            bits: [0xff; FRAMEBUFFER_LEN],
        }
    }

    /// Fill the whole screen.
    pub fn fill(&mut self, white: bool) {
        self.bits.fill(if white { 0xff } else { 0x00 });
    }

    fn index(p: Point) -> Option<(usize, u8)> {
        let x = usize::try_from(p.x).ok()?;
        let y = usize::try_from(p.y).ok()?;
        if x >= DISPLAY_WIDTH as usize || y >= DISPLAY_HEIGHT as usize {
            return None;
        }
        // x % 8 < 8.
        #[allow(clippy::cast_possible_truncation)]
        Some((y * STRIDE + x / 8, 1 << (x % 8) as u8))
    }

    /// Pixel at `p`, `None` off screen.
    pub fn pixel(&self, p: Point) -> Option<bool> {
        let (i, mask) = Self::index(p)?;
        self.bits.get(i).map(|b| b & mask != 0)
    }

    /// Set the pixel at `p`. Off-screen points are ignored.
    pub fn set_pixel(&mut self, p: Point, white: bool) {
        if let Some((i, mask)) = Self::index(p) {
            if let Some(byte) = self.bits.get_mut(i) {
                if white {
                    *byte |= mask;
                } else {
                    *byte &= !mask;
                }
            }
        }
    }

    /// Number of white pixels inside `area`.
    pub fn count_white(&self, area: Rectangle) -> usize {
        area.intersection(&SCREEN)
            .points()
            .filter(|p| self.pixel(*p) == Some(true))
            .count()
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawTarget for Framebuffer {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, color) in pixels {
            self.set_pixel(p, color.is_on());
        }
        Ok(())
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        SCREEN.size
    }
}

/// Layer-local drawing state.
///
/// Coordinates are relative to the layer frame's top-left corner and every
/// write is clipped to the frame.
pub struct GraphicsContext<'fb> {
    fb: &'fb mut Framebuffer,
    origin: Point,
    size: Size,
    clip: Rectangle,
    mode: CompositingMode,
    fill: BinaryColor,
}

impl<'fb> GraphicsContext<'fb> {
    /// Context drawing into `frame` (screen coordinates).
    pub fn new(fb: &'fb mut Framebuffer, frame: Rectangle) -> Self {
        Self {
            fb,
            origin: frame.top_left,
            size: frame.size,
            clip: frame.intersection(&SCREEN),
            mode: CompositingMode::Assign,
            fill: BinaryColor::Off,
        }
    }

    /// Compositing mode for subsequent bitmap draws.
    pub fn set_compositing_mode(&mut self, mode: CompositingMode) {
        self.mode = mode;
    }

    /// Colour used by [`GraphicsContext::fill_rect`].
    pub fn set_fill_color(&mut self, color: BinaryColor) {
        self.fill = color;
    }

    /// Layer bounds in local coordinates.
    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(Point::zero(), self.size)
    }

    fn composite(&mut self, local: Point, src: bool) {
        let p = self.origin + local;
        if !self.clip.contains(p) {
            return;
        }
        if let Some(dst) = self.fb.pixel(p) {
            self.fb.set_pixel(p, self.mode.apply(dst, src));
        }
    }

    /// Draw `bitmap` into `rect`, tiling it when `rect` is larger.
    pub fn draw_bitmap_in_rect(&mut self, bitmap: &Bitmap<'_>, rect: Rectangle) {
        let size = bitmap.size();
        if size.width == 0 || size.height == 0 {
            return;
        }
        #[allow(clippy::cast_possible_wrap)]
        let (w, h) = (size.width as i32, size.height as i32);
        for p in Rectangle::new(Point::zero(), rect.size).points() {
            if let Some(src) = bitmap.pixel(Point::new(p.x % w, p.y % h)) {
                self.composite(rect.top_left + p, src);
            }
        }
    }

    /// Fill `rect` with the fill colour. Compositing does not apply.
    pub fn fill_rect(&mut self, rect: Rectangle) {
        let white = self.fill.is_on();
        for p in rect.points() {
            let p = self.origin + p;
            if self.clip.contains(p) {
                self.fb.set_pixel(p, white);
            }
        }
    }

    /// Draw `bitmap` rotated clockwise by `angle` about its pixel `src_ic`,
    /// placing that pixel at layer-local `dest_ic`.
    pub fn draw_rotated_bitmap(
        &mut self,
        bitmap: &Bitmap<'_>,
        src_ic: Point,
        angle: i32,
        dest_ic: Point,
    ) {
        let (sin, cos) = (sin_lookup(angle), cos_lookup(angle));
        for local in self.bounds().points() {
            let d = local - dest_ic;
            // Inverse rotation: destination offset back to source offset.
            let sx = div_round(d.x * cos + d.y * sin, TRIG_MAX_RATIO);
            let sy = div_round(d.y * cos - d.x * sin, TRIG_MAX_RATIO);
            if let Some(src) = bitmap.pixel(src_ic + Point::new(sx, sy)) {
                self.composite(local, src);
            }
        }
    }
}

fn div_round(n: i32, d: i32) -> i32 {
    (2 * n + d).div_euclid(2 * d)
}
