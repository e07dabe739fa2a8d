//! End-to-end watchface behaviour against the mock host.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use embedded_graphics::prelude::Point;
use platform::mocks::{MockHost, TickCall};
use platform::{ChargeState, LocalTime, ResourceBundle, ResourceId, TickService, TickUnit};
use watchface::app::{BATTERY_FRAME, NO_PHONE_FRAME};
use watchface::graphics::SCREEN;
use watchface::{
    ConfigKey, Dictionary, Framebuffer, HostEvent, LayerId, Tuple, Watchface, DISCONNECT_VIBE,
};

fn message(pairs: &[(ConfigKey, &'static str)]) -> Dictionary<'static> {
    let mut dict = Dictionary::new();
    for (key, value) in pairs {
        assert!(dict.push(Tuple::cstring(key.key(), *value)).is_ok());
    }
    dict
}

fn encode(dict: &Dictionary<'_>) -> Vec<u8> {
    let mut buf = vec![0u8; dict.encoded_len()];
    let n = dict.encode(&mut buf).unwrap();
    buf.truncate(n);
    buf
}

fn start() -> (MockHost, Watchface) {
    let mut host = MockHost::new();
    let face = Watchface::init(&mut host).unwrap();
    (host, face)
}

#[test]
fn same_message_twice_is_idempotent() {
    let (mut host, mut face) = start();
    let dict = message(&[(ConfigKey::Seconds, "true"), (ConfigKey::ShowBattery, "false")]);

    face.on_message(&mut host, &dict);
    let stored = host.stored().clone();
    let visible: Vec<_> = face.window().visible().collect();

    face.on_message(&mut host, &dict);
    assert_eq!(host.stored(), &stored);
    assert_eq!(face.window().visible().collect::<Vec<_>>(), visible);
    assert_eq!(host.write_count(), 10);
}

#[test]
fn every_message_persists_all_five_keys() {
    let (mut host, mut face) = start();
    face.on_message(&mut host, &message(&[(ConfigKey::Vibe, "true")]));
    assert_eq!(host.stored().len(), 5);
    assert_eq!(host.stored().get(&ConfigKey::Vibe.key()), Some(&true));
    assert_eq!(host.stored().get(&ConfigKey::ShowNoPhone.key()), Some(&true));
}

#[test]
fn simple_mode_swaps_only_the_background() {
    let (mut host, mut face) = start();
    let hands = |face: &Watchface| {
        [LayerId::HourBlack, LayerId::HourWhite, LayerId::MinuteBlack, LayerId::MinuteWhite]
            .map(|id| *face.window().layer(id).unwrap())
    };
    let before = hands(&face);
    assert_eq!(face.background(), Some(host.load(ResourceId::Background).unwrap()));

    face.on_message(&mut host, &message(&[(ConfigKey::Simple, "true")]));
    assert_eq!(face.background(), Some(host.load(ResourceId::BackgroundSimple).unwrap()));
    let after = hands(&face);
    for (a, b) in before.iter().zip(after.iter()) {
        assert_eq!(a.content, b.content);
        assert_eq!(a.frame, b.frame);
    }
}

#[test]
fn vibe_only_on_next_disconnect() {
    let mut host = MockHost::new();
    for key in ConfigKey::ALL {
        host = host.with_stored(key.key(), false);
    }
    let mut face = Watchface::init(&mut host).unwrap();

    face.handle(&mut host, HostEvent::Connection(false)).unwrap();
    assert!(host.vibrations().is_empty());

    face.on_message(&mut host, &message(&[(ConfigKey::Vibe, "true")]));
    assert!(host.vibrations().is_empty());

    face.handle(&mut host, HostEvent::Connection(true)).unwrap();
    assert!(host.vibrations().is_empty());

    face.handle(&mut host, HostEvent::Connection(false)).unwrap();
    assert_eq!(host.vibrations().len(), 1);
    assert_eq!(host.vibrations()[0].segments(), &DISCONNECT_VIBE);
}

#[test]
fn seconds_toggle_resubscribes_ticks() {
    let (mut host, mut face) = start();
    host.clear_tick_calls();
    face.on_message(&mut host, &message(&[(ConfigKey::Seconds, "true")]));
    assert_eq!(
        host.tick_calls(),
        &[TickCall::Unsubscribe, TickCall::Subscribe(TickUnit::Second)]
    );
    assert!(face.window().is_visible(LayerId::SecondBlack));

    face.on_message(&mut host, &message(&[(ConfigKey::Seconds, "false")]));
    assert_eq!(host.subscription(), Some(TickUnit::Minute));
    assert!(!face.window().is_visible(LayerId::SecondWhite));
}

#[test]
fn unrelated_message_still_resubscribes() {
    let (mut host, mut face) = start();
    host.clear_tick_calls();
    face.on_message(&mut host, &message(&[(ConfigKey::Vibe, "false")]));
    assert_eq!(
        host.tick_calls(),
        &[TickCall::Unsubscribe, TickCall::Subscribe(TickUnit::Minute)]
    );
}

#[test]
fn tick_moves_hands() {
    let (mut host, mut face) = start();
    let t = LocalTime::new(3, 0, 0).unwrap();
    face.handle(&mut host, HostEvent::Tick(t)).unwrap();
    assert_eq!(face.hand_angle(LayerId::HourBlack), Some(0x4000));
    assert_eq!(face.hand_angle(LayerId::HourWhite), Some(0x4000));
    assert_eq!(face.hand_angle(LayerId::MinuteWhite), Some(0));
    assert_eq!(face.angles().second, None);
}

#[test]
fn second_hand_stays_put_while_disabled() {
    let (mut host, mut face) = start();
    let before = face.hand_angle(LayerId::SecondBlack);
    face.on_tick(LocalTime::new(4, 5, 45).unwrap());
    assert_eq!(face.hand_angle(LayerId::SecondBlack), before);
    face.on_message(&mut host, &message(&[(ConfigKey::Seconds, "true")]));
    face.on_tick(LocalTime::new(4, 5, 45).unwrap());
    assert_eq!(face.hand_angle(LayerId::SecondBlack), Some(0xc000));
}

#[test]
fn raw_message_goes_through_codec() {
    let (mut host, mut face) = start();
    let bytes = encode(&message(&[(ConfigKey::ShowBattery, "false"), (ConfigKey::Simple, "true")]));
    face.handle(&mut host, HostEvent::Message(&bytes)).unwrap();
    assert!(!face.config().show_battery);
    assert!(face.config().simple);
}

#[test]
fn bad_value_does_not_drop_its_neighbours() {
    let (mut host, mut face) = start();
    let mut bytes = encode(&message(&[(ConfigKey::ShowBattery, "false")]));
    // Second tuple: key 0, C-string type, two bytes that are not UTF-8.
    bytes[0] = 2;
    bytes.extend_from_slice(&[0, 0, 0, 0, 1, 2, 0, 0xff, 0]);

    face.handle(&mut host, HostEvent::Message(&bytes)).unwrap();
    assert!(!face.config().show_battery);
    assert!(!face.config().show_no_phone);
    assert_eq!(host.write_count(), 5);
    assert_eq!(host.stored().get(&ConfigKey::ShowNoPhone.key()), Some(&false));
}

#[test]
fn oversized_raw_message_is_dropped() {
    let (mut host, mut face) = start();
    let bytes = vec![0u8; 65];
    assert!(face.handle(&mut host, HostEvent::Message(&bytes)).is_err());
    assert_eq!(host.write_count(), 0);
}

#[test]
fn persistence_failure_keeps_new_config() {
    let (mut host, mut face) = start();
    host.fail_writes = true;
    face.on_message(&mut host, &message(&[(ConfigKey::Simple, "true")]));
    assert!(face.config().simple);
    assert!(host.stored().is_empty());
}

#[test]
fn persisted_config_survives_restart() {
    let (mut host, mut face) = start();
    face.on_message(&mut host, &message(&[(ConfigKey::ShowNoPhone, "false")]));
    face.deinit(&mut host);

    let face = Watchface::init(&mut host).unwrap();
    assert!(!face.config().show_no_phone);
}

// ── Rendering ────────────────────────────────────────────────────────────────

#[test]
fn gauge_bar_width_matches_charge() {
    let (mut host, mut face) = start();
    let state = ChargeState::discharging(57);
    host.charge = state;
    face.handle(&mut host, HostEvent::Battery(state)).unwrap();
    let mut fb = Framebuffer::new();
    assert!(face.render(&host, &mut fb));

    // Mock glyph: solid white with a 1 px black outline; the bar spans rows 4..10.
    let row = BATTERY_FRAME.top_left.y + 6;
    let black = (1..19)
        .filter(|x| fb.pixel(Point::new(BATTERY_FRAME.top_left.x + x, row)) == Some(false))
        .count();
    assert_eq!(black, 5);
}

#[test]
fn gauge_hidden_leaves_background() {
    let (mut host, mut face) = start();
    face.on_message(
        &mut host,
        &message(&[(ConfigKey::ShowBattery, "false"), (ConfigKey::Simple, "true")]),
    );
    let mut fb = Framebuffer::new();
    face.render(&host, &mut fb);
    // Simple mock background is all black.
    assert_eq!(fb.count_white(BATTERY_FRAME), 0);
}

#[test]
fn no_phone_glyph_follows_link() {
    let (mut host, mut face) = start();
    face.on_message(&mut host, &message(&[(ConfigKey::Simple, "true")]));
    let mut fb = Framebuffer::new();

    face.render(&host, &mut fb);
    assert_eq!(fb.count_white(NO_PHONE_FRAME), 0);

    host.connected = false;
    face.handle(&mut host, HostEvent::Connection(false)).unwrap();
    assert!(face.render(&host, &mut fb));
    // 11x12 glyph minus its 1 px outline.
    assert_eq!(fb.count_white(NO_PHONE_FRAME), 9 * 10);
}

#[test]
fn hands_draw_on_plain_background() {
    let (mut host, mut face) = start();
    face.on_message(&mut host, &message(&[(ConfigKey::Simple, "true")]));
    let mut fb = Framebuffer::new();
    face.render(&host, &mut fb);
    assert!(fb.count_white(SCREEN) > 0);
}
