//! Mock implementations for testing
//!
//! [`MockHost`] implements every platform service and records the calls the
//! watchface makes, so tests can assert on subscriptions, persisted values
//! and vibrations without a device.

#![cfg(any(test, feature = "std"))]

use std::collections::BTreeMap;
use std::vec::Vec;

use embedded_graphics::prelude::{Point, Size};

use crate::app_message::check_buffer_size;
use crate::bitmap::row_stride_for;
use crate::*;

/// Recorded tick subscription call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickCall {
    /// `subscribe(unit)` was called
    Subscribe(TickUnit),
    /// `unsubscribe()` was called
    Unsubscribe,
}

/// Mock host implementing every platform service.
pub struct MockHost {
    /// Time returned by [`WallClock::now`].
    pub time: LocalTime,
    /// Battery state returned by [`BatteryMonitor::charge_state`].
    pub charge: ChargeState,
    /// Link state returned by [`ConnectionMonitor::is_connected`].
    pub connected: bool,
    /// When set, every `write_bool` fails.
    pub fail_writes: bool,
    /// Resources that `load` reports as missing.
    pub missing: Vec<ResourceId>,
    tick: Option<TickUnit>,
    tick_calls: Vec<TickCall>,
    battery_subscribed: bool,
    connection_subscribed: bool,
    store: BTreeMap<u32, bool>,
    write_count: usize,
    inbox_size: usize,
    outbox_size: usize,
    vibrations: Vec<VibePattern>,
    resources: BTreeMap<usize, Result<Bitmap<'static>, ResourceError>>,
}

impl MockHost {
    /// Create a connected host at 10:10:30 with a full battery and empty store.
    pub fn new() -> Self {
        let resources = ResourceId::ALL
            .iter()
            .map(|id| (resource_slot(*id), mock_bitmap(*id)))
            .collect();
        Self {
            time: LocalTime::from_seconds_since_midnight(10 * 3600 + 10 * 60 + 30),
            charge: ChargeState::default(),
            connected: true,
            fail_writes: false,
            missing: Vec::new(),
            tick: None,
            tick_calls: Vec::new(),
            battery_subscribed: false,
            connection_subscribed: false,
            store: BTreeMap::new(),
            write_count: 0,
            inbox_size: 0,
            outbox_size: 0,
            vibrations: Vec::new(),
            resources,
        }
    }

    /// Pre-populate the store, as if a previous run had persisted `value`.
    pub fn with_stored(mut self, key: u32, value: bool) -> Self {
        self.store.insert(key, value);
        self
    }

    /// Every tick subscribe/unsubscribe call, in order.
    pub fn tick_calls(&self) -> &[TickCall] {
        &self.tick_calls
    }

    /// Forget recorded tick calls.
    pub fn clear_tick_calls(&mut self) {
        self.tick_calls.clear();
    }

    /// Battery change subscription state.
    pub fn battery_subscribed(&self) -> bool {
        self.battery_subscribed
    }

    /// Link change subscription state.
    pub fn connection_subscribed(&self) -> bool {
        self.connection_subscribed
    }

    /// Snapshot of the persisted values.
    pub fn stored(&self) -> &BTreeMap<u32, bool> {
        &self.store
    }

    /// Number of successful `write_bool` calls.
    pub fn write_count(&self) -> usize {
        self.write_count
    }

    /// Outbox size reserved by the last `open`.
    pub fn outbox_size(&self) -> usize {
        self.outbox_size
    }

    /// Whether the message channel is open.
    pub fn channel_open(&self) -> bool {
        self.inbox_size > 0
    }

    /// Vibration patterns enqueued so far.
    pub fn vibrations(&self) -> &[VibePattern] {
        &self.vibrations
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl WallClock for MockHost {
    fn now(&self) -> LocalTime {
        self.time
    }
}

impl TickService for MockHost {
    fn subscribe(&mut self, unit: TickUnit) {
        self.tick = Some(unit);
        self.tick_calls.push(TickCall::Subscribe(unit));
    }

    fn unsubscribe(&mut self) {
        self.tick = None;
        self.tick_calls.push(TickCall::Unsubscribe);
    }

    fn subscription(&self) -> Option<TickUnit> {
        self.tick
    }
}

impl BatteryMonitor for MockHost {
    fn charge_state(&self) -> ChargeState {
        self.charge
    }
}

impl ConnectionMonitor for MockHost {
    fn is_connected(&self) -> bool {
        self.connected
    }
}

impl EventService for MockHost {
    fn subscribe_battery(&mut self) {
        self.battery_subscribed = true;
    }

    fn unsubscribe_battery(&mut self) {
        self.battery_subscribed = false;
    }

    fn subscribe_connection(&mut self) {
        self.connection_subscribed = true;
    }

    fn unsubscribe_connection(&mut self) {
        self.connection_subscribed = false;
    }
}

impl KeyValueStore for MockHost {
    fn exists(&self, key: u32) -> bool {
        self.store.contains_key(&key)
    }

    fn read_bool(&self, key: u32) -> Option<bool> {
        self.store.get(&key).copied()
    }

    fn write_bool(&mut self, key: u32, value: bool) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::WriteFailed);
        }
        self.store.insert(key, value);
        self.write_count += 1;
        Ok(())
    }
}

impl MessageChannel for MockHost {
    fn open(&mut self, inbox_size: usize, outbox_size: usize) -> Result<(), ChannelError> {
        if self.channel_open() {
            return Err(ChannelError::AlreadyOpen);
        }
        check_buffer_size(inbox_size)?;
        check_buffer_size(outbox_size)?;
        self.inbox_size = inbox_size;
        self.outbox_size = outbox_size;
        Ok(())
    }

    fn close(&mut self) {
        self.inbox_size = 0;
        self.outbox_size = 0;
    }

    fn inbox_size(&self) -> usize {
        self.inbox_size
    }
}

impl Vibration for MockHost {
    fn enqueue(&mut self, pattern: &VibePattern) {
        self.vibrations.push(pattern.clone());
    }
}

impl ResourceBundle for MockHost {
    fn load(&self, id: ResourceId) -> Result<Bitmap<'static>, ResourceError> {
        if self.missing.contains(&id) {
            return Err(ResourceError::Missing(id));
        }
        self.resources
            .get(&resource_slot(id))
            .copied()
            .unwrap_or(Err(ResourceError::Missing(id)))
    }
}

// ── Mock artwork ─────────────────────────────────────────────────────────────

/// Size of the mock image for `id`.
pub fn mock_size(id: ResourceId) -> Size {
    match id {
        ResourceId::HourHandBlack | ResourceId::HourHandWhite => Size::new(67, 52),
        ResourceId::MinuteHandBlack | ResourceId::MinuteHandWhite => Size::new(33, 72),
        ResourceId::SecondHandBlack | ResourceId::SecondHandWhite => Size::new(15, 56),
        ResourceId::BatteryBlack
        | ResourceId::BatteryWhite
        | ResourceId::BatteryChargingBlack
        | ResourceId::BatteryChargingWhite => Size::new(20, 14),
        ResourceId::NoPhoneBlack | ResourceId::NoPhoneWhite => Size::new(11, 12),
        ResourceId::Background | ResourceId::BackgroundSimple => Size::new(144, 168),
    }
}

/// Mock artwork: white images are solid, black masks are a 1 px outline,
/// the detailed background has white stripes every 4th row and the simple
/// one is plain black.
fn mock_bitmap(id: ResourceId) -> Result<Bitmap<'static>, ResourceError> {
    let size = mock_size(id);
    let pattern: fn(Point, Size) -> bool = match id {
        ResourceId::HourHandWhite
        | ResourceId::MinuteHandWhite
        | ResourceId::SecondHandWhite
        | ResourceId::BatteryWhite
        | ResourceId::BatteryChargingWhite
        | ResourceId::NoPhoneWhite => |_, _| true,
        ResourceId::Background => |p, _| p.y % 4 == 0,
        ResourceId::BackgroundSimple => |_, _| false,
        _ => |p, s| {
            #[allow(clippy::cast_possible_wrap)]
            let (w, h) = (s.width as i32, s.height as i32);
            p.x == 0 || p.y == 0 || p.x + 1 == w || p.y + 1 == h
        },
    };
    leak_bitmap(size, |p| pattern(p, size)).map_err(|source| ResourceError::Invalid { id, source })
}

/// Build a `'static` bitmap of `size` from a pixel predicate.
///
/// The pixel data is leaked; intended for tests and one-off desktop assets.
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
pub fn leak_bitmap(
    size: Size,
    white: impl Fn(Point) -> bool,
) -> Result<Bitmap<'static>, BitmapError> {
    let stride = usize::from(row_stride_for(size.width));
    let mut data = std::vec![0u8; stride * size.height as usize];
    for y in 0..size.height as usize {
        for x in 0..size.width as usize {
            if !white(Point::new(x as i32, y as i32)) {
                continue;
            }
            if let Some(byte) = data.get_mut(y * stride + x / 8) {
                *byte |= 1 << (x % 8);
            }
        }
    }
    let data: &'static [u8] = std::boxed::Box::leak(data.into_boxed_slice());
    Bitmap::new(data, row_stride_for(size.width), size)
}

fn resource_slot(id: ResourceId) -> usize {
    ResourceId::ALL.iter().position(|r| *r == id).unwrap_or(0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn mock_store_roundtrip() {
        let mut host = MockHost::new();
        assert!(!host.exists(3));
        host.write_bool(3, true).unwrap();
        assert!(host.exists(3));
        assert_eq!(host.read_bool(3), Some(true));
        assert_eq!(host.write_count(), 1);
    }

    #[test]
    fn mock_store_failure() {
        let mut host = MockHost::new();
        host.fail_writes = true;
        assert_eq!(host.write_bool(0, true), Err(StorageError::WriteFailed));
        assert!(!host.exists(0));
    }

    #[test]
    fn mock_tick_calls_recorded() {
        let mut host = MockHost::new();
        host.subscribe(TickUnit::Minute);
        host.unsubscribe();
        host.subscribe(TickUnit::Second);
        assert_eq!(
            host.tick_calls(),
            &[
                TickCall::Subscribe(TickUnit::Minute),
                TickCall::Unsubscribe,
                TickCall::Subscribe(TickUnit::Second)
            ]
        );
        assert_eq!(host.subscription(), Some(TickUnit::Second));
    }

    #[test]
    fn mock_channel_rejects_double_open() {
        let mut host = MockHost::new();
        host.open(64, 64).unwrap();
        assert_eq!(host.open(64, 64), Err(ChannelError::AlreadyOpen));
        host.close();
        assert!(!host.channel_open());
    }

    #[test]
    fn mock_resources_have_expected_sizes() {
        let host = MockHost::new();
        for id in ResourceId::ALL {
            assert_eq!(host.load(id).unwrap().size(), mock_size(id));
        }
    }

    #[test]
    fn mock_missing_resource() {
        let mut host = MockHost::new();
        host.missing.push(ResourceId::NoPhoneWhite);
        assert_eq!(
            host.load(ResourceId::NoPhoneWhite),
            Err(ResourceError::Missing(ResourceId::NoPhoneWhite))
        );
    }

    #[test]
    fn leak_bitmap_outline() {
        let size = Size::new(4, 3);
        let bmp = leak_bitmap(size, |p| p.x == 0).unwrap();
        assert_eq!(bmp.pixel(Point::new(0, 2)), Some(true));
        assert_eq!(bmp.pixel(Point::new(1, 2)), Some(false));
    }
}
