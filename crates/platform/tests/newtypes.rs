//! Type system enforcement tests for platform newtypes.
//! Out-of-range charge levels and clock readings must be unrepresentable.

// ── ChargePercent ────────────────────────────────────────────────────────────

#[test]
fn charge_percent_new_clamps_over_100() {
    use platform::ChargePercent;
    let c = ChargePercent::new(150);
    assert_eq!(c.get(), 100, "ChargePercent::new(150) should clamp to 100");
}

#[test]
fn charge_percent_new_allows_0() {
    use platform::ChargePercent;
    assert_eq!(ChargePercent::new(0).get(), 0);
}

#[test]
fn charge_percent_step_saturates() {
    use platform::ChargePercent;
    assert_eq!(ChargePercent::new(95).step(10).get(), 100);
    assert_eq!(ChargePercent::new(5).step(-10).get(), 0);
    assert_eq!(ChargePercent::new(50).step(-10).get(), 40);
}

#[test]
fn charge_percent_is_one_byte() {
    use platform::ChargePercent;
    assert_eq!(core::mem::size_of::<ChargePercent>(), 1);
}

// ── ChargeState ──────────────────────────────────────────────────────────────

#[test]
fn charge_state_default_is_full_and_unplugged() {
    use platform::ChargeState;
    let s = ChargeState::default();
    assert_eq!(s.charge_percent.get(), 100);
    assert!(!s.is_charging);
    assert!(!s.is_plugged);
}

#[test]
fn charge_state_charging_is_plugged() {
    use platform::ChargeState;
    let s = ChargeState::charging(40);
    assert!(s.is_charging && s.is_plugged);
    assert_eq!(s.charge_percent.get(), 40);
}

// ── LocalTime ────────────────────────────────────────────────────────────────

#[test]
fn local_time_new_validates_each_field() {
    use platform::{LocalTime, TimeError};
    assert_eq!(LocalTime::new(25, 0, 0), Err(TimeError::Hour(25)));
    assert_eq!(LocalTime::new(12, 61, 0), Err(TimeError::Minute(61)));
    assert_eq!(LocalTime::new(12, 0, 99), Err(TimeError::Second(99)));
}

#[test]
fn local_time_midnight_is_zero() {
    use platform::LocalTime;
    assert_eq!(LocalTime::MIDNIGHT.seconds_since_midnight(), 0);
}

// ── VibePattern ──────────────────────────────────────────────────────────────

#[test]
fn vibe_pattern_empty_is_allowed() {
    use platform::VibePattern;
    let p = VibePattern::new(&[]);
    assert_eq!(p.map(|p| p.total_ms()), Some(0));
}

// ── Channel buffers ──────────────────────────────────────────────────────────

#[test]
fn channel_buffer_limit_is_enforced() {
    use platform::app_message::{check_buffer_size, MAX_BUFFER_SIZE};
    use platform::ChannelError;
    assert!(check_buffer_size(64).is_ok());
    assert!(check_buffer_size(MAX_BUFFER_SIZE).is_ok());
    assert_eq!(
        check_buffer_size(MAX_BUFFER_SIZE + 1),
        Err(ChannelError::BufferTooLarge {
            requested: MAX_BUFFER_SIZE + 1,
            max: MAX_BUFFER_SIZE
        })
    );
}
