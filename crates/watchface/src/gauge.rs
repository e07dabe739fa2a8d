//! Battery gauge and disconnect glyph
//!
//! Both are custom layers drawn from fresh host readings on every pass.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

use platform::{Bitmap, ChargePercent, ChargeState};

use crate::graphics::{CompositingMode, GraphicsContext};

/// Top-left of the charge bar inside the battery glyph.
pub const BAR_ORIGIN: Point = Point::new(4, 4);
/// Height of the charge bar.
pub const BAR_HEIGHT: u32 = 6;

/// White stroke and black mask of one glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphPair {
    /// Drawn first, with `Or`.
    pub white: Bitmap<'static>,
    /// Drawn second, with `Clear`.
    pub black: Bitmap<'static>,
}

impl GlyphPair {
    /// Two-tone draw at the white image's bounds.
    pub fn draw(&self, ctx: &mut GraphicsContext<'_>) {
        let rect = self.white.bounds();
        ctx.set_compositing_mode(CompositingMode::Or);
        ctx.draw_bitmap_in_rect(&self.white, rect);
        ctx.set_compositing_mode(CompositingMode::Clear);
        ctx.draw_bitmap_in_rect(&self.black, rect);
    }
}

/// Glyphs used by the battery gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryGlyphs {
    /// Empty battery outline.
    pub battery: GlyphPair,
    /// Battery with charging bolt.
    pub charging: GlyphPair,
}

/// Width of the charge bar: one pixel per ten percent, rounded down.
pub fn battery_bar_width(charge: ChargePercent) -> u32 {
    u32::from(charge.get() / 10)
}

/// Charge bar rectangle, glyph-local.
pub fn battery_bar(charge: ChargePercent) -> Rectangle {
    Rectangle::new(BAR_ORIGIN, Size::new(battery_bar_width(charge), BAR_HEIGHT))
}

/// Draw the battery gauge, or nothing when `show` is clear.
///
/// While charging only the bolt glyph is drawn; otherwise the outline and a
/// black bar proportional to the charge.
pub fn draw_battery_gauge(
    ctx: &mut GraphicsContext<'_>,
    show: bool,
    state: ChargeState,
    glyphs: &BatteryGlyphs,
) {
    if !show {
        return;
    }
    if state.is_charging {
        glyphs.charging.draw(ctx);
    } else {
        glyphs.battery.draw(ctx);
        ctx.set_fill_color(BinaryColor::Off);
        ctx.fill_rect(battery_bar(state.charge_percent));
    }
}

/// Draw the crossed-out phone when `show` is set and the link is down.
pub fn draw_no_phone(ctx: &mut GraphicsContext<'_>, show: bool, connected: bool, glyph: &GlyphPair) {
    if show && !connected {
        glyph.draw(ctx);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::graphics::{Framebuffer, SCREEN};
    use platform::mocks::leak_bitmap;

    const FRAME: Rectangle = Rectangle::new(Point::new(120, 5), Size::new(20, 14));

    fn pair(size: Size) -> GlyphPair {
        GlyphPair {
            white: leak_bitmap(size, |_| true).unwrap(),
            black: leak_bitmap(size, |p| p.x == 0).unwrap(),
        }
    }

    fn glyphs() -> BatteryGlyphs {
        BatteryGlyphs {
            battery: pair(Size::new(20, 14)),
            charging: pair(Size::new(20, 14)),
        }
    }

    fn render(show: bool, state: ChargeState) -> Framebuffer {
        let mut fb = Framebuffer::new();
        fb.fill(false);
        let mut ctx = GraphicsContext::new(&mut fb, FRAME);
        draw_battery_gauge(&mut ctx, show, state, &glyphs());
        fb
    }

    #[test]
    fn bar_width_truncates() {
        assert_eq!(battery_bar_width(ChargePercent::new(57)), 5);
        assert_eq!(battery_bar_width(ChargePercent::new(9)), 0);
        assert_eq!(battery_bar_width(ChargePercent::new(100)), 10);
    }

    #[test]
    fn hidden_gauge_draws_nothing() {
        assert_eq!(render(false, ChargeState::discharging(57)).count_white(SCREEN), 0);
    }

    #[test]
    fn discharging_draws_bar() {
        let fb = render(true, ChargeState::discharging(57));
        // 20x14 glyph, left column masked, 5x6 bar blacked out.
        assert_eq!(fb.count_white(SCREEN), 19 * 14 - 5 * 6);
        assert_eq!(fb.pixel(Point::new(124, 9)), Some(false));
        assert_eq!(fb.pixel(Point::new(129, 9)), Some(true));
    }

    #[test]
    fn charging_draws_no_bar() {
        let fb = render(true, ChargeState::charging(57));
        assert_eq!(fb.count_white(SCREEN), 19 * 14);
    }

    #[test]
    fn no_phone_only_when_disconnected() {
        let glyph = pair(Size::new(11, 12));
        let frame = Rectangle::new(Point::new(7, 5), Size::new(11, 12));
        for (show, connected, expect) in [
            (true, false, 10 * 12),
            (true, true, 0),
            (false, false, 0),
        ] {
            let mut fb = Framebuffer::new();
            fb.fill(false);
            let mut ctx = GraphicsContext::new(&mut fb, frame);
            draw_no_phone(&mut ctx, show, connected, &glyph);
            assert_eq!(fb.count_white(SCREEN), expect, "show={show} connected={connected}");
        }
    }
}
