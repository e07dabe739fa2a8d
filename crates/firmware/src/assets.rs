//! Generated artwork
//!
//! The desktop build ships no resource pack. Every bitmap is drawn once at
//! startup with embedded-graphics primitives, packed into the 1-bit resource
//! format and leaked, so the watchface sees the same `'static` views it would
//! get from a device bundle.
//!
//! Hands are drawn pointing at 12 o'clock around their pivot. The black image
//! is the wider silhouette and the white image the narrower stroke inside it.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Point, Primitive, Size};
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle};
use embedded_graphics::Drawable;

use platform::bitmap::{row_stride_for, PBI_HEADER_LEN};
use platform::{Bitmap, ResourceBundle, ResourceError, ResourceId};
use watchface::app::{HOUR_PIVOT, MINUTE_PIVOT, SECOND_PIVOT};
use watchface::graphics::{DISPLAY_HEIGHT, DISPLAY_WIDTH, SCREEN_CENTER};

/// Format version written into generated headers.
const PBI_VERSION: u16 = 1;

/// Pixel size of each generated resource.
pub const fn resource_size(id: ResourceId) -> Size {
    match id {
        ResourceId::HourHandBlack | ResourceId::HourHandWhite => Size::new(67, 52),
        ResourceId::MinuteHandBlack | ResourceId::MinuteHandWhite => Size::new(33, 72),
        ResourceId::SecondHandBlack | ResourceId::SecondHandWhite => Size::new(15, 56),
        ResourceId::BatteryBlack
        | ResourceId::BatteryWhite
        | ResourceId::BatteryChargingBlack
        | ResourceId::BatteryChargingWhite => Size::new(20, 14),
        ResourceId::NoPhoneBlack | ResourceId::NoPhoneWhite => Size::new(11, 12),
        ResourceId::Background | ResourceId::BackgroundSimple => {
            Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)
        }
    }
}

/// Draw `id` and pack it into the resource format.
pub fn render_pbi(id: ResourceId) -> Vec<u8> {
    let mut canvas = Canvas::new(resource_size(id));
    if let Err(never) = paint(id, &mut canvas) {
        match never {}
    }
    canvas.into_pbi()
}

/// Every generated bitmap, leaked once.
#[derive(Debug, Clone)]
pub struct Assets {
    bitmaps: Vec<(ResourceId, Bitmap<'static>)>,
}

impl Assets {
    /// Draw, pack and decode all fourteen resources.
    pub fn generate() -> Result<Self, ResourceError> {
        let bitmaps = ResourceId::ALL
            .into_iter()
            .map(|id| {
                let bytes: &'static [u8] = Box::leak(render_pbi(id).into_boxed_slice());
                Bitmap::from_pbi(bytes)
                    .map(|bitmap| (id, bitmap))
                    .map_err(|source| ResourceError::Invalid { id, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(count = bitmaps.len(), "generated artwork");
        Ok(Self { bitmaps })
    }
}

impl ResourceBundle for Assets {
    fn load(&self, id: ResourceId) -> Result<Bitmap<'static>, ResourceError> {
        self.bitmaps
            .iter()
            .find(|(r, _)| *r == id)
            .map(|(_, bitmap)| *bitmap)
            .ok_or(ResourceError::Missing(id))
    }
}

/// Packed 1-bit drawing surface, LSB-first like [`Bitmap`].
struct Canvas {
    size: Size,
    stride: usize,
    rows: Vec<u8>,
}

impl Canvas {
    fn new(size: Size) -> Self {
        let stride = usize::from(row_stride_for(size.width));
        Self {
            size,
            stride,
            rows: vec![0; stride * size.height as usize],
        }
    }

    fn set(&mut self, p: Point, white: bool) {
        let (Ok(x), Ok(y)) = (usize::try_from(p.x), usize::try_from(p.y)) else {
            return;
        };
        if x >= self.size.width as usize || y >= self.size.height as usize {
            return;
        }
        if let Some(byte) = self.rows.get_mut(y * self.stride + x / 8) {
            let bit = 1u8 << (x % 8);
            if white {
                *byte |= bit;
            } else {
                *byte &= !bit;
            }
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn into_pbi(self) -> Vec<u8> {
        let mut out = Vec::with_capacity(PBI_HEADER_LEN + self.rows.len());
        out.extend_from_slice(&row_stride_for(self.size.width).to_le_bytes());
        out.extend_from_slice(&(PBI_VERSION << 12).to_le_bytes());
        for field in [0, 0, self.size.width as i16, self.size.height as i16] {
            out.extend_from_slice(&field.to_le_bytes());
        }
        out.extend_from_slice(&self.rows);
        out
    }
}

impl DrawTarget for Canvas {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, color) in pixels {
            self.set(p, color.is_on());
        }
        Ok(())
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        self.size
    }
}

fn paint<D>(id: ResourceId, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    match id {
        ResourceId::HourHandBlack => leg(target, HOUR_PIVOT, 8, 24, 7),
        ResourceId::HourHandWhite => leg(target, HOUR_PIVOT, 8, 24, 3),
        ResourceId::MinuteHandBlack => leg(target, MINUTE_PIVOT, 6, -10, 5),
        ResourceId::MinuteHandWhite => leg(target, MINUTE_PIVOT, 6, -10, 1),
        ResourceId::SecondHandBlack => leg(target, SECOND_PIVOT, 3, 0, 3),
        ResourceId::SecondHandWhite => leg(target, SECOND_PIVOT, 3, 0, 1),
        ResourceId::BatteryWhite | ResourceId::BatteryChargingWhite => battery_body(target),
        ResourceId::BatteryBlack => battery_outline(target),
        ResourceId::BatteryChargingBlack => {
            battery_outline(target)?;
            bolt(target)
        }
        ResourceId::NoPhoneWhite => Rectangle::new(Point::zero(), Size::new(11, 12))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(target),
        ResourceId::NoPhoneBlack => {
            Rectangle::new(Point::new(2, 0), Size::new(7, 12))
                .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
                .draw(target)?;
            Line::new(Point::new(0, 0), Point::new(10, 11))
                .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
                .draw(target)
        }
        ResourceId::Background => dial(target, 12),
        ResourceId::BackgroundSimple => dial(target, 4),
    }
}

/// Straight leg from `pivot` up to `top`, ending in a foot `foot` px long.
fn leg<D>(target: &mut D, pivot: Point, top: i32, foot: i32, width: u32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = PrimitiveStyle::with_stroke(BinaryColor::On, width);
    let ankle = Point::new(pivot.x, top);
    Line::new(pivot, ankle).into_styled(style).draw(target)?;
    if foot != 0 {
        Line::new(ankle, ankle + Point::new(foot, 0))
            .into_styled(style)
            .draw(target)?;
    }
    Circle::with_center(pivot, width + 4)
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(target)
}

fn battery_body<D>(target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let fill = PrimitiveStyle::with_fill(BinaryColor::On);
    Rectangle::new(Point::new(0, 1), Size::new(18, 12))
        .into_styled(fill)
        .draw(target)?;
    Rectangle::new(Point::new(18, 4), Size::new(2, 6))
        .into_styled(fill)
        .draw(target)
}

/// One-pixel ring inside the body; the charge bar sits in the white inside it.
fn battery_outline<D>(target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let stroke = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
    Rectangle::new(Point::new(1, 2), Size::new(16, 10))
        .into_styled(stroke)
        .draw(target)?;
    Line::new(Point::new(17, 5), Point::new(17, 8))
        .into_styled(stroke)
        .draw(target)
}

fn bolt<D>(target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let stroke = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
    for (from, to) in [((10, 3), (7, 7)), ((7, 7), (11, 7)), ((11, 7), (8, 11))] {
        Line::new(Point::new(from.0, from.1), Point::new(to.0, to.1))
            .into_styled(stroke)
            .draw(target)?;
    }
    Ok(())
}

/// Black dial with `marks` white ticks evenly spaced around the centre.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn dial<D>(target: &mut D, marks: u32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    const INNER: f32 = 58.0;
    const OUTER: f32 = 68.0;
    for i in 0..marks {
        let theta = std::f32::consts::TAU * i as f32 / marks as f32;
        let (sin, cos) = theta.sin_cos();
        let at = |r: f32| SCREEN_CENTER + Point::new((r * sin).round() as i32, -(r * cos).round() as i32);
        let width = if (i * 4) % marks == 0 { 5 } else { 2 };
        Line::new(at(INNER), at(OUTER))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, width))
            .draw(target)?;
    }
    Ok(())
}
