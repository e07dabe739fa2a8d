//! Watchface running on the desktop host.
//!
//! Drives the watchface the way the emulator loop does: key actions become
//! host events, ticks come from `poll_tick`, settings land in a real store
//! file. Run with `cargo test -p firmware --test emulator_host`.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::path::Path;

use firmware::display::mirror;
use firmware::input::{self, KeyAction};
use firmware::{Assets, Clock, EmulatorHost};
use platform::storage_local::FileStore;
use platform::{KeyValueStore, LocalTime, MessageChannel, TickService, TickUnit};
use watchface::app::{BATTERY_FRAME, INBOX_SIZE, NO_PHONE_FRAME};
use watchface::{ConfigKey, Framebuffer, HostEvent, Watchface, DISCONNECT_VIBE};

fn host_at(path: &Path, time: LocalTime) -> EmulatorHost {
    let store = FileStore::open(path).unwrap();
    EmulatorHost::new(store, Assets::generate().unwrap()).with_clock(Clock::Manual(time))
}

fn press(face: &mut Watchface, host: &mut EmulatorHost, key: char) {
    let action = KeyAction::from_char(key).expect("bound key");
    if let Some(stimulus) = input::apply(host, action, face.config()).unwrap() {
        face.handle(host, stimulus.as_event()).unwrap();
    }
}

fn frame(face: &mut Watchface, host: &EmulatorHost) -> Framebuffer {
    let mut fb = Framebuffer::new();
    face.render(host, &mut fb);
    let mut shown = Framebuffer::new();
    mirror(&fb, &mut shown).unwrap();
    shown
}

#[test]
fn init_opens_channel_and_subscribes() {
    let dir = tempfile::tempdir().unwrap();
    let mut host = host_at(&dir.path().join("state.bin"), LocalTime::new(10, 9, 59).unwrap());
    let face = Watchface::init(&mut host).unwrap();
    assert_eq!(host.inbox_size(), INBOX_SIZE);
    assert_eq!(host.subscription(), Some(TickUnit::Minute));
    assert!(host.battery_events() && host.connection_events());
    assert!(face.config().show_battery);

    face.deinit(&mut host);
    assert_eq!(host.inbox_size(), 0);
    assert_eq!(host.subscription(), None);
    assert!(!host.battery_events() && !host.connection_events());
}

#[test]
fn minute_tick_moves_the_hands() {
    let dir = tempfile::tempdir().unwrap();
    let mut host = host_at(&dir.path().join("state.bin"), LocalTime::new(10, 9, 59).unwrap());
    let mut face = Watchface::init(&mut host).unwrap();
    let before = face.angles();

    assert_eq!(host.poll_tick(), None);
    host.advance(1);
    let time = host.poll_tick().unwrap();
    assert_eq!(time, LocalTime::new(10, 10, 0).unwrap());
    face.handle(&mut host, HostEvent::Tick(time)).unwrap();

    assert_ne!(face.angles().minute, before.minute);
    assert_eq!(face.angles().second, None);
}

#[test]
fn seconds_setting_persists_across_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.bin");
    {
        let mut host = host_at(&path, LocalTime::MIDNIGHT);
        let mut face = Watchface::init(&mut host).unwrap();
        press(&mut face, &mut host, '5');
        assert!(face.config().seconds);
        assert_eq!(host.subscription(), Some(TickUnit::Second));
        assert_eq!(host.store().len(), 5);
        assert_eq!(host.read_bool(ConfigKey::Vibe.key()), Some(false));
        face.deinit(&mut host);
    }
    let mut host = host_at(&path, LocalTime::MIDNIGHT);
    let face = Watchface::init(&mut host).unwrap();
    assert!(face.config().seconds);
    assert_eq!(host.read_bool(ConfigKey::Seconds.key()), Some(true));
    assert_eq!(host.subscription(), Some(TickUnit::Second));
}

#[test]
fn disconnect_buzzes_only_with_vibe_enabled() {
    let dir = tempfile::tempdir().unwrap();
    let mut host = host_at(&dir.path().join("state.bin"), LocalTime::MIDNIGHT);
    let mut face = Watchface::init(&mut host).unwrap();

    press(&mut face, &mut host, 'b');
    assert!(host.vibrations().is_empty());
    press(&mut face, &mut host, 'b');

    press(&mut face, &mut host, '3');
    assert!(face.config().vibe);
    press(&mut face, &mut host, 'b');
    assert_eq!(host.vibrations().len(), 1);
    assert_eq!(host.vibrations()[0].segments(), DISCONNECT_VIBE);

    press(&mut face, &mut host, 'b');
    assert_eq!(host.vibrations().len(), 1, "reconnect is silent");
}

#[test]
fn battery_gauge_follows_setting() {
    let dir = tempfile::tempdir().unwrap();
    let mut host = host_at(&dir.path().join("state.bin"), LocalTime::MIDNIGHT);
    let mut face = Watchface::init(&mut host).unwrap();

    let shown = frame(&mut face, &host);
    assert!(shown.count_white(BATTERY_FRAME) > 0);

    press(&mut face, &mut host, '2');
    assert!(!face.config().show_battery);
    assert!(face.config().show_no_phone, "other settings untouched");
    let hidden = frame(&mut face, &host);
    assert_eq!(hidden.count_white(BATTERY_FRAME), 0);
}

#[test]
fn charge_changes_redraw_the_bar() {
    let dir = tempfile::tempdir().unwrap();
    let mut host = host_at(&dir.path().join("state.bin"), LocalTime::MIDNIGHT);
    let mut face = Watchface::init(&mut host).unwrap();
    let full = frame(&mut face, &host).count_white(BATTERY_FRAME);

    for _ in 0..5 {
        press(&mut face, &mut host, '-');
    }
    let mut fb = Framebuffer::new();
    assert!(face.render(&host, &mut fb), "battery event marks the gauge dirty");
    // Five fewer bar columns, six rows each, turn back to white.
    assert_eq!(fb.count_white(BATTERY_FRAME), full + 5 * 6);
}

#[test]
fn no_phone_glyph_tracks_link() {
    let dir = tempfile::tempdir().unwrap();
    let mut host = host_at(&dir.path().join("state.bin"), LocalTime::MIDNIGHT);
    let mut face = Watchface::init(&mut host).unwrap();
    assert_eq!(frame(&mut face, &host).count_white(NO_PHONE_FRAME), 0);

    press(&mut face, &mut host, 'b');
    assert!(frame(&mut face, &host).count_white(NO_PHONE_FRAME) > 0);

    press(&mut face, &mut host, '1');
    assert!(!face.config().show_no_phone);
    assert_eq!(frame(&mut face, &host).count_white(NO_PHONE_FRAME), 0);
}

#[test]
fn oversized_message_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut host = host_at(&dir.path().join("state.bin"), LocalTime::MIDNIGHT);
    let mut face = Watchface::init(&mut host).unwrap();
    let before = face.config();
    let bytes = vec![0u8; INBOX_SIZE + 1];
    assert!(face.handle(&mut host, HostEvent::Message(&bytes)).is_err());
    assert_eq!(face.config(), before);
    assert!(host.store().is_empty());
}
