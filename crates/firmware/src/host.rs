//! Simulated host services
//!
//! [`EmulatorHost`] implements every `platform` service for the desktop:
//! wall-clock time from the system time zone (or a manual clock in tests),
//! a file-backed store, and battery and link state toggled from the
//! keyboard.

use platform::app_message::check_buffer_size;
use platform::storage_local::FileStore;
use platform::{
    BatteryMonitor, Bitmap, ChannelError, ChargePercent, ChargeState, ConnectionMonitor,
    EventService, KeyValueStore, LocalTime, MessageChannel, ResourceBundle, ResourceError,
    ResourceId, StorageError, TickService, TickUnit, VibePattern, Vibration, WallClock,
};

use crate::assets::Assets;

/// Where [`EmulatorHost`] reads the time from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    /// Local time in the system time zone.
    System,
    /// Fixed time, moved with [`EmulatorHost::advance`].
    Manual(LocalTime),
}

impl Clock {
    fn now(self) -> LocalTime {
        match self {
            Self::System => system_time(),
            Self::Manual(t) => t,
        }
    }
}

fn system_time() -> LocalTime {
    let now = jiff::Zoned::now();
    let (h, m, s) = (now.hour(), now.minute(), now.second());
    match (u8::try_from(h), u8::try_from(m), u8::try_from(s)) {
        (Ok(h), Ok(m), Ok(s)) => LocalTime::new(h, m, s).unwrap_or(LocalTime::MIDNIGHT),
        _ => LocalTime::MIDNIGHT,
    }
}

/// Desktop implementation of every host service.
#[derive(Debug)]
pub struct EmulatorHost {
    clock: Clock,
    store: FileStore,
    assets: Assets,
    charge: ChargeState,
    connected: bool,
    tick: Option<TickUnit>,
    /// Tick period index of the last delivered tick.
    last_tick: Option<u32>,
    battery_events: bool,
    connection_events: bool,
    inbox_size: usize,
    outbox_size: usize,
    vibrations: Vec<VibePattern>,
}

impl EmulatorHost {
    /// Connected host on the system clock with a full, discharging battery.
    pub fn new(store: FileStore, assets: Assets) -> Self {
        Self {
            clock: Clock::System,
            store,
            assets,
            charge: ChargeState::default(),
            connected: true,
            tick: None,
            last_tick: None,
            battery_events: false,
            connection_events: false,
            inbox_size: 0,
            outbox_size: 0,
            vibrations: Vec::new(),
        }
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Move a manual clock forward by `secs`, wrapping at midnight.
    ///
    /// No effect on the system clock.
    pub fn advance(&mut self, secs: u32) {
        if let Clock::Manual(t) = self.clock {
            let next = t.seconds_since_midnight().wrapping_add(secs);
            self.clock = Clock::Manual(LocalTime::from_seconds_since_midnight(next));
        }
    }

    /// Time for the next tick, if the subscribed period has rolled over
    /// since the last one.
    pub fn poll_tick(&mut self) -> Option<LocalTime> {
        let unit = self.tick?;
        let now = self.clock.now();
        let period = now.seconds_since_midnight() / unit.period_secs();
        if self.last_tick == Some(period) {
            return None;
        }
        self.last_tick = Some(period);
        Some(now)
    }

    /// Flip the companion link. Returns the new state when link events are
    /// subscribed.
    pub fn toggle_link(&mut self) -> Option<bool> {
        self.connected = !self.connected;
        tracing::info!(connected = self.connected, "link toggled");
        self.connection_events.then_some(self.connected)
    }

    /// Plug or unplug the charger. Returns the new state when battery
    /// events are subscribed.
    pub fn toggle_charging(&mut self) -> Option<ChargeState> {
        let percent = self.charge.charge_percent.get();
        self.charge = if self.charge.is_charging {
            ChargeState::discharging(percent)
        } else {
            ChargeState::charging(percent)
        };
        tracing::info!(charging = self.charge.is_charging, "charger toggled");
        self.battery_events.then_some(self.charge)
    }

    /// Move the charge by `delta` percent, saturating at 0 and 100.
    pub fn step_charge(&mut self, delta: i8) -> Option<ChargeState> {
        self.charge.charge_percent = self.charge.charge_percent.step(delta);
        tracing::info!(percent = self.charge.charge_percent.get(), "charge changed");
        self.battery_events.then_some(self.charge)
    }

    /// Patterns played so far.
    pub fn vibrations(&self) -> &[VibePattern] {
        &self.vibrations
    }

    /// Outbox size reserved by `open`, 0 when closed.
    pub fn outbox_size(&self) -> usize {
        self.outbox_size
    }

    /// Returns `true` while battery changes are delivered.
    pub fn battery_events(&self) -> bool {
        self.battery_events
    }

    /// Returns `true` while link changes are delivered.
    pub fn connection_events(&self) -> bool {
        self.connection_events
    }

    /// Backing store.
    pub fn store(&self) -> &FileStore {
        &self.store
    }

    /// Current battery charge.
    pub fn charge_percent(&self) -> ChargePercent {
        self.charge.charge_percent
    }
}

impl WallClock for EmulatorHost {
    fn now(&self) -> LocalTime {
        self.clock.now()
    }
}

impl TickService for EmulatorHost {
    fn subscribe(&mut self, unit: TickUnit) {
        tracing::debug!(?unit, "tick subscribe");
        self.tick = Some(unit);
        // First tick on the next boundary, not immediately.
        self.last_tick = Some(self.clock.now().seconds_since_midnight() / unit.period_secs());
    }

    fn unsubscribe(&mut self) {
        tracing::debug!("tick unsubscribe");
        self.tick = None;
        self.last_tick = None;
    }

    fn subscription(&self) -> Option<TickUnit> {
        self.tick
    }
}

impl BatteryMonitor for EmulatorHost {
    fn charge_state(&self) -> ChargeState {
        self.charge
    }
}

impl ConnectionMonitor for EmulatorHost {
    fn is_connected(&self) -> bool {
        self.connected
    }
}

impl EventService for EmulatorHost {
    fn subscribe_battery(&mut self) {
        self.battery_events = true;
    }

    fn unsubscribe_battery(&mut self) {
        self.battery_events = false;
    }

    fn subscribe_connection(&mut self) {
        self.connection_events = true;
    }

    fn unsubscribe_connection(&mut self) {
        self.connection_events = false;
    }
}

impl KeyValueStore for EmulatorHost {
    fn exists(&self, key: u32) -> bool {
        self.store.exists(key)
    }

    fn read_bool(&self, key: u32) -> Option<bool> {
        self.store.read_bool(key)
    }

    fn write_bool(&mut self, key: u32, value: bool) -> Result<(), StorageError> {
        self.store.write_bool(key, value)
    }
}

impl MessageChannel for EmulatorHost {
    fn open(&mut self, inbox_size: usize, outbox_size: usize) -> Result<(), ChannelError> {
        if self.inbox_size > 0 {
            return Err(ChannelError::AlreadyOpen);
        }
        check_buffer_size(inbox_size)?;
        check_buffer_size(outbox_size)?;
        self.inbox_size = inbox_size;
        self.outbox_size = outbox_size;
        tracing::debug!(inbox_size, outbox_size, "message channel open");
        Ok(())
    }

    fn close(&mut self) {
        self.inbox_size = 0;
        self.outbox_size = 0;
        tracing::debug!("message channel closed");
    }

    fn inbox_size(&self) -> usize {
        self.inbox_size
    }
}

impl Vibration for EmulatorHost {
    fn enqueue(&mut self, pattern: &VibePattern) {
        tracing::info!(segments = ?pattern.segments(), total_ms = pattern.total_ms(), "bzzt");
        self.vibrations.push(pattern.clone());
    }
}

impl ResourceBundle for EmulatorHost {
    fn load(&self, id: ResourceId) -> Result<Bitmap<'static>, ResourceError> {
        self.assets.load(id)
    }
}
