//! Watchface lifecycle and event handling
//!
//! The host owns the event loop. It calls [`Watchface::init`] once, feeds
//! every [`HostEvent`] to [`Watchface::handle`], calls [`Watchface::render`]
//! whenever it wants a frame, and finally [`Watchface::deinit`].

use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;
use thiserror::Error;

use platform::{
    BatteryMonitor, Bitmap, ChannelError, ChargeState, ConnectionMonitor, EventService, Host,
    KeyValueStore, LocalTime, MessageChannel, ResourceBundle, ResourceError, ResourceId,
    TickService, VibePattern, Vibration,
};

use crate::angle::HandAngles;
use crate::config::{Config, ConfigKey, ConfigUpdate};
use crate::gauge::{draw_battery_gauge, draw_no_phone, BatteryGlyphs, GlyphPair};
use crate::graphics::{CompositingMode, Framebuffer, SCREEN};
use crate::layer::{Layer, LayerContent, LayerError, LayerId, RotBitmapLayer, Window};
use crate::message::{Dictionary, MessageError};

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Battery gauge frame.
pub const BATTERY_FRAME: Rectangle = Rectangle::new(Point::new(120, 5), Size::new(20, 14));
/// Disconnect glyph frame.
pub const NO_PHONE_FRAME: Rectangle = Rectangle::new(Point::new(7, 5), Size::new(11, 12));
/// Hour hand pivot, in bitmap pixels.
pub const HOUR_PIVOT: Point = Point::new(33, 40);
/// Minute hand pivot, in bitmap pixels.
pub const MINUTE_PIVOT: Point = Point::new(16, 60);
/// Second hand pivot, in bitmap pixels.
pub const SECOND_PIVOT: Point = Point::new(7, 44);

// ── Host resources ───────────────────────────────────────────────────────────

/// Inbox size requested from the message channel.
pub const INBOX_SIZE: usize = 64;
/// Outbox size requested from the message channel.
pub const OUTBOX_SIZE: usize = 64;
/// Played when the link drops and vibration is enabled.
pub const DISCONNECT_VIBE: [u32; 5] = [100, 200, 100, 200, 100];

/// Startup and event handling failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WatchfaceError {
    /// The message channel could not be opened.
    #[error("message channel: {0}")]
    Channel(#[from] ChannelError),
    /// A bundled bitmap could not be loaded.
    #[error(transparent)]
    Resource(#[from] ResourceError),
    /// The layer tree could not be built.
    #[error("layer tree: {0}")]
    Layer(#[from] LayerError),
    /// An inbound message did not decode.
    #[error("inbound message: {0}")]
    Message(#[from] MessageError),
}

/// Something the host observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent<'a> {
    /// Tick at the subscribed granularity.
    Tick(LocalTime),
    /// Battery state changed.
    Battery(ChargeState),
    /// Companion link went up (`true`) or down.
    Connection(bool),
    /// Raw message bytes from the companion app.
    Message(&'a [u8]),
}

/// The fourteen bundled bitmaps.
#[derive(Debug, Clone, Copy)]
struct Resources {
    hour: GlyphPair,
    minute: GlyphPair,
    second: GlyphPair,
    battery: BatteryGlyphs,
    no_phone: GlyphPair,
    background: Bitmap<'static>,
    background_simple: Bitmap<'static>,
}

impl Resources {
    /// Load in [`ResourceId::ALL`] order: black masks, white strokes, backgrounds.
    fn load(bundle: &impl ResourceBundle) -> Result<Self, ResourceError> {
        let hour_black = bundle.load(ResourceId::HourHandBlack)?;
        let minute_black = bundle.load(ResourceId::MinuteHandBlack)?;
        let second_black = bundle.load(ResourceId::SecondHandBlack)?;
        let battery_black = bundle.load(ResourceId::BatteryBlack)?;
        let charging_black = bundle.load(ResourceId::BatteryChargingBlack)?;
        let no_phone_black = bundle.load(ResourceId::NoPhoneBlack)?;
        let hour_white = bundle.load(ResourceId::HourHandWhite)?;
        let minute_white = bundle.load(ResourceId::MinuteHandWhite)?;
        let second_white = bundle.load(ResourceId::SecondHandWhite)?;
        let battery_white = bundle.load(ResourceId::BatteryWhite)?;
        let charging_white = bundle.load(ResourceId::BatteryChargingWhite)?;
        let no_phone_white = bundle.load(ResourceId::NoPhoneWhite)?;
        Ok(Self {
            hour: GlyphPair { white: hour_white, black: hour_black },
            minute: GlyphPair { white: minute_white, black: minute_black },
            second: GlyphPair { white: second_white, black: second_black },
            battery: BatteryGlyphs {
                battery: GlyphPair { white: battery_white, black: battery_black },
                charging: GlyphPair { white: charging_white, black: charging_black },
            },
            no_phone: GlyphPair { white: no_phone_white, black: no_phone_black },
            background: bundle.load(ResourceId::Background)?,
            background_simple: bundle.load(ResourceId::BackgroundSimple)?,
        })
    }
}

/// Hand layers: black mask below, white stroke above.
const HANDS: [(LayerId, LayerId, Point); 3] = [
    (LayerId::HourBlack, LayerId::HourWhite, HOUR_PIVOT),
    (LayerId::MinuteBlack, LayerId::MinuteWhite, MINUTE_PIVOT),
    (LayerId::SecondBlack, LayerId::SecondWhite, SECOND_PIVOT),
];

/// Running watchface.
#[derive(Debug)]
pub struct Watchface {
    config: Config,
    resources: Resources,
    window: Window,
    angles: HandAngles,
    vibe: Option<VibePattern>,
}

impl Watchface {
    /// Start up against `host`.
    ///
    /// Loads the persisted config, opens the message channel, loads every
    /// bitmap, builds the layer tree, subscribes to ticks at the configured
    /// granularity, and finally to battery and link changes. Any failure is
    /// fatal; the channel is closed again before returning the error.
    pub fn init<H: Host>(host: &mut H) -> Result<Self, WatchfaceError> {
        let config = Config::load(&*host);
        tracing::debug!(?config, "loaded config");

        host.open(INBOX_SIZE, OUTBOX_SIZE)?;
        let built = Resources::load(&*host)
            .map_err(WatchfaceError::from)
            .and_then(|resources| Ok((resources, build_window(&resources)?)));
        let (resources, window) = match built {
            Ok(built) => built,
            Err(e) => {
                host.close();
                return Err(e);
            }
        };

        let mut face = Self {
            config,
            resources,
            window,
            angles: HandAngles::from_time(LocalTime::MIDNIGHT, false),
            vibe: VibePattern::new(&DISCONNECT_VIBE),
        };
        face.apply_config(host);
        face.update_time(host.now());

        face.window.mark_all_dirty();
        host.subscribe_battery();
        host.subscribe_connection();
        tracing::info!(seconds = config.seconds, simple = config.simple, "watchface started");
        Ok(face)
    }

    /// Current configuration.
    pub fn config(&self) -> Config {
        self.config
    }

    /// Layer tree.
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Hand angles from the last time update.
    pub fn angles(&self) -> HandAngles {
        self.angles
    }

    /// Bitmap currently shown by the background layer.
    pub fn background(&self) -> Option<Bitmap<'static>> {
        match self.window.layer(LayerId::Background)?.content {
            LayerContent::Bitmap(bitmap) => bitmap,
            _ => None,
        }
    }

    /// Angle of the rotated layer `id`, `None` for other layers.
    pub fn hand_angle(&self, id: LayerId) -> Option<i32> {
        match &self.window.layer(id)?.content {
            LayerContent::Rotated(rot) => Some(rot.angle()),
            _ => None,
        }
    }

    /// Dispatch one host event.
    pub fn handle<H: Host>(&mut self, host: &mut H, event: HostEvent<'_>) -> Result<(), WatchfaceError> {
        match event {
            HostEvent::Tick(time) => self.on_tick(time),
            HostEvent::Battery(state) => self.on_battery(state),
            HostEvent::Connection(connected) => self.on_connection(host, connected),
            HostEvent::Message(bytes) => {
                self.on_raw_message(host, bytes)?;
            }
        }
        Ok(())
    }

    /// Move the hands to `time`.
    pub fn on_tick(&mut self, time: LocalTime) {
        self.update_time(time);
    }

    /// Redraw the gauge with the new charge state.
    pub fn on_battery(&mut self, _state: ChargeState) {
        self.window.mark_dirty(LayerId::Battery);
    }

    /// Redraw the disconnect glyph; buzz if the link dropped and vibration is on.
    pub fn on_connection(&mut self, host: &mut impl Vibration, connected: bool) {
        self.window.mark_dirty(LayerId::NoPhone);
        if self.config.vibe && !connected {
            if let Some(pattern) = &self.vibe {
                host.enqueue(pattern);
            }
        }
    }

    /// Apply a decoded companion-app message.
    ///
    /// Updates the flags present in `dict`, re-applies the configuration and
    /// persists all five flags. A persistence failure is logged and the new
    /// configuration stays in effect.
    pub fn on_message<H>(&mut self, host: &mut H, dict: &Dictionary<'_>) -> ConfigUpdate
    where
        H: TickService + KeyValueStore,
    {
        tracing::debug!(tuples = dict.len(), "received config");
        let update = self.config.apply_message(dict);
        self.config = update.config;
        if update.touched.contains(ConfigKey::ShowNoPhone) {
            self.window.mark_dirty(LayerId::NoPhone);
        }
        if update.touched.contains(ConfigKey::ShowBattery) {
            self.window.mark_dirty(LayerId::Battery);
        }
        self.apply_config(host);
        if let Err(e) = self.config.persist(host) {
            tracing::warn!(%e, "failed to persist config");
        }
        update
    }

    /// Decode `bytes` against the open inbox and apply the message.
    pub fn on_raw_message<H>(&mut self, host: &mut H, bytes: &[u8]) -> Result<ConfigUpdate, MessageError>
    where
        H: TickService + KeyValueStore + MessageChannel,
    {
        let dict = Dictionary::decode(bytes, host.inbox_size()).inspect_err(|e| {
            tracing::warn!(%e, len = bytes.len(), "dropping malformed message");
        })?;
        Ok(self.on_message(host, &dict))
    }

    /// Redraw into `fb` if anything is dirty. Returns `true` if a frame was drawn.
    pub fn render<H>(&mut self, host: &H, fb: &mut Framebuffer) -> bool
    where
        H: BatteryMonitor + ConnectionMonitor,
    {
        if !self.window.take_dirty() {
            return false;
        }
        fb.fill(true);
        let config = self.config;
        let resources = &self.resources;
        self.window.draw(fb, |id, ctx| match id {
            LayerId::Battery => {
                draw_battery_gauge(ctx, config.show_battery, host.charge_state(), &resources.battery);
            }
            LayerId::NoPhone => {
                draw_no_phone(ctx, config.show_no_phone, host.is_connected(), &resources.no_phone);
            }
            _ => {}
        });
        true
    }

    /// Shut down: drop every subscription and close the channel.
    pub fn deinit<H>(self, host: &mut H)
    where
        H: TickService + EventService + MessageChannel,
    {
        host.unsubscribe();
        host.unsubscribe_battery();
        host.unsubscribe_connection();
        host.close();
        tracing::info!("watchface stopped");
    }

    /// Background variant, second hand visibility and tick granularity.
    fn apply_config(&mut self, host: &mut impl TickService) {
        let background = if self.config.simple {
            self.resources.background_simple
        } else {
            self.resources.background
        };
        if let Some(layer) = self.window.layer_mut(LayerId::Background) {
            layer.content = LayerContent::Bitmap(Some(background));
        }
        self.window.mark_dirty(LayerId::Background);
        self.window.set_hidden(LayerId::SecondBlack, !self.config.seconds);
        self.window.set_hidden(LayerId::SecondWhite, !self.config.seconds);
        host.unsubscribe();
        host.subscribe(self.config.tick_unit());
    }

    fn update_time(&mut self, time: LocalTime) {
        let angles = HandAngles::from_time(time, self.config.seconds);
        let [hour, minute, second] = HANDS;
        self.set_hand(hour, angles.hour);
        self.set_hand(minute, angles.minute);
        if let Some(angle) = angles.second {
            self.set_hand(second, angle);
        }
        self.angles = angles;
    }

    fn set_hand(&mut self, (black, white, _): (LayerId, LayerId, Point), angle: i32) {
        for id in [black, white] {
            if let Some(Layer {
                content: LayerContent::Rotated(rot),
                ..
            }) = self.window.layer_mut(id)
            {
                rot.set_angle(angle);
            }
            self.window.mark_dirty(id);
        }
    }
}

fn build_window(res: &Resources) -> Result<Window, LayerError> {
    let mut window = Window::new();
    window.add_child(
        LayerId::Background,
        Layer::new(SCREEN, LayerContent::Bitmap(Some(res.background_simple))),
    )?;
    for ((black, white, pivot), pair) in HANDS.into_iter().zip([res.hour, res.minute, res.second]) {
        let black_layer = RotBitmapLayer::new(pair.black, CompositingMode::Clear).with_src_ic(pivot);
        let white_layer = RotBitmapLayer::new(pair.white, CompositingMode::Or).with_src_ic(pivot);
        // Both halves share the black layer's frame.
        let frame = black_layer.centered_frame();
        window.add_child(black, Layer::new(frame, LayerContent::Rotated(black_layer)))?;
        window.add_child(white, Layer::new(frame, LayerContent::Rotated(white_layer)))?;
    }
    window.add_child(LayerId::Battery, Layer::new(BATTERY_FRAME, LayerContent::Custom))?;
    window.add_child(LayerId::NoPhone, Layer::new(NO_PHONE_FRAME, LayerContent::Custom))?;
    Ok(window)
}
