//! Clock hand angles
//!
//! Angles use the fixed-point full-turn unit: [`TRIG_MAX_ANGLE`] is 360°,
//! zero points at 12 o'clock and angles grow clockwise.

use core::f32::consts::TAU;

use platform::LocalTime;

/// One full turn.
pub const TRIG_MAX_ANGLE: i32 = 0x10000;

/// Fixed-point 1.0 returned by [`sin_lookup`] and [`cos_lookup`].
pub const TRIG_MAX_RATIO: i32 = 0xffff;

/// Angles for the three hands at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HandAngles {
    /// Hour hand, advancing with the minutes.
    pub hour: i32,
    /// Minute hand, whole minutes only.
    pub minute: i32,
    /// Second hand; `None` when seconds are not shown.
    pub second: Option<i32>,
}

impl HandAngles {
    /// Angles for `time`. The second angle is only computed when `seconds` is set.
    pub fn from_time(time: LocalTime, seconds: bool) -> Self {
        Self {
            hour: hour_angle(time),
            minute: minute_angle(time),
            second: seconds.then(|| second_angle(time)),
        }
    }
}

/// `FULL * (h % 12) / 12 + FULL * m / 720`
pub fn hour_angle(time: LocalTime) -> i32 {
    TRIG_MAX_ANGLE * i32::from(time.hour() % 12) / 12
        + TRIG_MAX_ANGLE * i32::from(time.minute()) / 720
}

/// `FULL * m / 60`
pub fn minute_angle(time: LocalTime) -> i32 {
    TRIG_MAX_ANGLE * i32::from(time.minute()) / 60
}

/// `FULL * s / 60`
pub fn second_angle(time: LocalTime) -> i32 {
    TRIG_MAX_ANGLE * i32::from(time.second()) / 60
}

fn radians(angle: i32) -> f32 {
    // Angles stay well inside f32's exact integer range.
    #[allow(clippy::cast_precision_loss)]
    let turns = angle.rem_euclid(TRIG_MAX_ANGLE) as f32 / TRIG_MAX_ANGLE as f32;
    turns * TAU
}

/// Sine of `angle`, scaled to [`TRIG_MAX_RATIO`].
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn sin_lookup(angle: i32) -> i32 {
    libm::roundf(libm::sinf(radians(angle)) * TRIG_MAX_RATIO as f32) as i32
}

/// Cosine of `angle`, scaled to [`TRIG_MAX_RATIO`].
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn cos_lookup(angle: i32) -> i32 {
    libm::roundf(libm::cosf(radians(angle)) * TRIG_MAX_RATIO as f32) as i32
}
