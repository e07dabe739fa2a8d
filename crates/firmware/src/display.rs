//! Framebuffer output
//!
//! The watchface renders into a packed [`Framebuffer`]. Any 1-bit
//! `DrawTarget` can show it, the simulator window in particular.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, Pixel, PointsIter};

use watchface::graphics::SCREEN;
use watchface::Framebuffer;

/// Simulator window upscale factor.
pub const OUTPUT_SCALE: u32 = 3;

/// Copy every pixel of `fb` to `target`; white maps to `BinaryColor::On`.
pub fn mirror<D>(fb: &Framebuffer, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    target.draw_iter(SCREEN.points().map(|p| {
        let white = fb.pixel(p).unwrap_or(false);
        Pixel(p, BinaryColor::from(white))
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use embedded_graphics::prelude::Point;

    #[test]
    fn mirror_copies_pixels() {
        let mut src = Framebuffer::new();
        src.fill(false);
        src.set_pixel(Point::new(3, 4), true);
        src.set_pixel(Point::new(143, 167), true);
        let mut dst = Framebuffer::new();
        mirror(&src, &mut dst).unwrap();
        assert_eq!(dst, src);
    }
}
