//! Layer tree
//!
//! A [`Window`] owns an ordered list of [`Layer`]s drawn back to front.
//! Any layer marked dirty triggers a redraw of the whole window on the next
//! render pass.

use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;
use heapless::Vec;
use thiserror::Error;

use platform::Bitmap;

use crate::graphics::{CompositingMode, Framebuffer, GraphicsContext, SCREEN_CENTER};

/// Most layers one window holds.
pub const MAX_LAYERS: usize = 9;

/// Identity of each layer, listed back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayerId {
    /// Dial background.
    Background,
    /// Hour hand mask.
    HourBlack,
    /// Hour hand stroke.
    HourWhite,
    /// Minute hand mask.
    MinuteBlack,
    /// Minute hand stroke.
    MinuteWhite,
    /// Second hand mask.
    SecondBlack,
    /// Second hand stroke.
    SecondWhite,
    /// Battery gauge.
    Battery,
    /// Crossed-out phone.
    NoPhone,
}

impl LayerId {
    /// Child order, back to front.
    pub const ALL: [LayerId; MAX_LAYERS] = [
        LayerId::Background,
        LayerId::HourBlack,
        LayerId::HourWhite,
        LayerId::MinuteBlack,
        LayerId::MinuteWhite,
        LayerId::SecondBlack,
        LayerId::SecondWhite,
        LayerId::Battery,
        LayerId::NoPhone,
    ];
}

/// Layer tree failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayerError {
    /// A layer with this id is already a child.
    #[error("layer {0:?} already added")]
    Duplicate(LayerId),
    /// The window holds [`MAX_LAYERS`] children.
    #[error("window has no room for layer {0:?}")]
    Full(LayerId),
}

/// Bitmap drawn rotated about a pivot.
///
/// The frame is a square large enough for any rotation of the bitmap about
/// `src_ic`; the pivot sits at the centre of the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotBitmapLayer {
    bitmap: Bitmap<'static>,
    src_ic: Point,
    angle: i32,
    mode: CompositingMode,
}

impl RotBitmapLayer {
    /// Rotating layer for `bitmap`, pivoting on its centre.
    pub fn new(bitmap: Bitmap<'static>, mode: CompositingMode) -> Self {
        let size = bitmap.size();
        #[allow(clippy::cast_possible_wrap)]
        let src_ic = Point::new(size.width as i32 / 2, size.height as i32 / 2);
        Self {
            bitmap,
            src_ic,
            angle: 0,
            mode,
        }
    }

    /// Set the pivot, in bitmap pixels.
    #[must_use]
    pub fn with_src_ic(mut self, src_ic: Point) -> Self {
        self.src_ic = src_ic;
        self
    }

    /// Pivot, in bitmap pixels.
    pub fn src_ic(&self) -> Point {
        self.src_ic
    }

    /// Rotation, clockwise from 12 o'clock.
    pub fn angle(&self) -> i32 {
        self.angle
    }

    /// Set the rotation.
    pub fn set_angle(&mut self, angle: i32) {
        self.angle = angle;
    }

    /// Compositing mode used to draw the bitmap.
    pub fn mode(&self) -> CompositingMode {
        self.mode
    }

    /// Rotated bitmap.
    pub fn bitmap(&self) -> &Bitmap<'static> {
        &self.bitmap
    }

    /// Farthest bitmap corner from the pivot, rounded up.
    #[allow(
        clippy::cast_possible_wrap,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn radius(&self) -> u32 {
        let size = self.bitmap.size();
        let (w, h) = (size.width as i32, size.height as i32);
        let far = [Point::new(0, 0), Point::new(w, 0), Point::new(0, h), Point::new(w, h)]
            .into_iter()
            .map(|c| {
                let d = c - self.src_ic;
                d.x * d.x + d.y * d.y
            })
            .max()
            .unwrap_or(0);
        libm::ceilf(libm::sqrtf(far as f32)) as u32
    }

    /// Frame size fitting every rotation.
    pub fn frame_size(&self) -> Size {
        let side = 2 * self.radius() + 1;
        Size::new(side, side)
    }

    /// Frame of [`RotBitmapLayer::frame_size`] centred on the dial.
    pub fn centered_frame(&self) -> Rectangle {
        let size = self.frame_size();
        #[allow(clippy::cast_possible_wrap)]
        let half = Point::new(size.width as i32 / 2, size.height as i32 / 2);
        Rectangle::new(SCREEN_CENTER - half, size)
    }

    fn draw(&self, ctx: &mut GraphicsContext<'_>) {
        #[allow(clippy::cast_possible_wrap)]
        let r = self.radius() as i32;
        ctx.set_compositing_mode(self.mode);
        ctx.draw_rotated_bitmap(&self.bitmap, self.src_ic, self.angle, Point::new(r, r));
    }
}

/// What a layer draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerContent {
    /// A bitmap drawn at the frame origin with `Assign`.
    Bitmap(Option<Bitmap<'static>>),
    /// A rotated bitmap.
    Rotated(RotBitmapLayer),
    /// Drawn by the owner's update callback.
    Custom,
}

/// One rectangle of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layer {
    /// Screen position and size.
    pub frame: Rectangle,
    /// Hidden layers are skipped when drawing.
    pub hidden: bool,
    dirty: bool,
    /// What to draw.
    pub content: LayerContent,
}

impl Layer {
    /// Visible layer with `content` at `frame`.
    pub fn new(frame: Rectangle, content: LayerContent) -> Self {
        Self {
            frame,
            hidden: false,
            dirty: true,
            content,
        }
    }

    /// Needs redrawing.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// Root of the layer tree.
#[derive(Debug, Clone, Default)]
pub struct Window {
    children: Vec<(LayerId, Layer), MAX_LAYERS>,
}

impl Window {
    /// Window with no children.
    pub const fn new() -> Self {
        Self {
            children: Vec::new(),
        }
    }

    /// Append `layer` on top of the existing children.
    pub fn add_child(&mut self, id: LayerId, layer: Layer) -> Result<(), LayerError> {
        if self.layer(id).is_some() {
            return Err(LayerError::Duplicate(id));
        }
        self.children
            .push((id, layer))
            .map_err(|_| LayerError::Full(id))
    }

    /// Child ids, back to front.
    pub fn child_ids(&self) -> impl Iterator<Item = LayerId> + '_ {
        self.children.iter().map(|(id, _)| *id)
    }

    /// Layer `id`.
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.children.iter().find(|(c, _)| *c == id).map(|(_, l)| l)
    }

    /// Layer `id`, mutable. Does not mark it dirty.
    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.children
            .iter_mut()
            .find(|(c, _)| *c == id)
            .map(|(_, l)| l)
    }

    /// Request a redraw of `id`.
    pub fn mark_dirty(&mut self, id: LayerId) {
        if let Some(layer) = self.layer_mut(id) {
            layer.dirty = true;
        }
    }

    /// Request a redraw of every layer.
    pub fn mark_all_dirty(&mut self) {
        for (_, layer) in &mut self.children {
            layer.dirty = true;
        }
    }

    /// Show or hide `id`, marking it dirty when that changes.
    pub fn set_hidden(&mut self, id: LayerId, hidden: bool) {
        if let Some(layer) = self.layer_mut(id) {
            if layer.hidden != hidden {
                layer.hidden = hidden;
                layer.dirty = true;
            }
        }
    }

    /// Returns `true` if `id` is a child and not hidden.
    pub fn is_visible(&self, id: LayerId) -> bool {
        self.layer(id).is_some_and(|l| !l.hidden)
    }

    /// Visible children, back to front.
    pub fn visible(&self) -> impl Iterator<Item = LayerId> + '_ {
        self.children
            .iter()
            .filter(|(_, l)| !l.hidden)
            .map(|(id, _)| *id)
    }

    /// Dirty children, back to front.
    pub fn dirty(&self) -> impl Iterator<Item = LayerId> + '_ {
        self.children
            .iter()
            .filter(|(_, l)| l.dirty)
            .map(|(id, _)| *id)
    }

    /// Clear every dirty flag, returning `true` if any was set.
    pub fn take_dirty(&mut self) -> bool {
        let mut any = false;
        for (_, layer) in &mut self.children {
            any |= core::mem::take(&mut layer.dirty);
        }
        any
    }

    /// Draw every visible child into `fb`, back to front.
    ///
    /// `custom` draws [`LayerContent::Custom`] layers.
    pub fn draw(
        &self,
        fb: &mut Framebuffer,
        mut custom: impl FnMut(LayerId, &mut GraphicsContext<'_>),
    ) {
        for (id, layer) in self.children.iter().filter(|(_, l)| !l.hidden) {
            let mut ctx = GraphicsContext::new(fb, layer.frame);
            match &layer.content {
                LayerContent::Bitmap(Some(bitmap)) => {
                    ctx.set_compositing_mode(CompositingMode::Assign);
                    ctx.draw_bitmap_in_rect(bitmap, Rectangle::new(Point::zero(), bitmap.size()));
                }
                LayerContent::Bitmap(None) => {}
                LayerContent::Rotated(rot) => rot.draw(&mut ctx),
                LayerContent::Custom => custom(*id, &mut ctx),
            }
        }
    }
}
