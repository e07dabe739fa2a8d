//! Bundled bitmap resources
//!
//! Read-only images packaged with the application. On a device port they
//! live in flash next to the code; the emulator generates them at startup.
//! Every loaded bitmap is `'static` and stays valid until the process exits.

use thiserror::Error;

use crate::bitmap::{Bitmap, BitmapError};

/// Catalogue of the bundled images.
///
/// Hands and glyphs come in black/white pairs: the white image is drawn with
/// `Or`, then the black one with `Clear`, which gives two-tone strokes on a
/// 1-bit display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResourceId {
    // ── Hands ────────────────────────────────────────────────────────────────
    /// Hour hand, black mask
    HourHandBlack,
    /// Hour hand, white stroke
    HourHandWhite,
    /// Minute hand, black mask
    MinuteHandBlack,
    /// Minute hand, white stroke
    MinuteHandWhite,
    /// Second hand, black mask
    SecondHandBlack,
    /// Second hand, white stroke
    SecondHandWhite,

    // ── Status glyphs ────────────────────────────────────────────────────────
    /// Battery outline, black mask
    BatteryBlack,
    /// Battery outline, white stroke
    BatteryWhite,
    /// Battery with charging bolt, black mask
    BatteryChargingBlack,
    /// Battery with charging bolt, white stroke
    BatteryChargingWhite,
    /// Crossed-out phone, black mask
    NoPhoneBlack,
    /// Crossed-out phone, white stroke
    NoPhoneWhite,

    // ── Backgrounds ──────────────────────────────────────────────────────────
    /// Detailed dial
    Background,
    /// Plain dial
    BackgroundSimple,
}

impl ResourceId {
    /// Every bundled resource, in load order.
    pub const ALL: [ResourceId; 14] = [
        ResourceId::HourHandBlack,
        ResourceId::MinuteHandBlack,
        ResourceId::SecondHandBlack,
        ResourceId::BatteryBlack,
        ResourceId::BatteryChargingBlack,
        ResourceId::NoPhoneBlack,
        ResourceId::HourHandWhite,
        ResourceId::MinuteHandWhite,
        ResourceId::SecondHandWhite,
        ResourceId::BatteryWhite,
        ResourceId::BatteryChargingWhite,
        ResourceId::NoPhoneWhite,
        ResourceId::Background,
        ResourceId::BackgroundSimple,
    ];

    /// Resource name as it appears in the bundle manifest.
    pub const fn name(self) -> &'static str {
        match self {
            Self::HourHandBlack => "IMAGE_HOUR_HAND_BLACK",
            Self::HourHandWhite => "IMAGE_HOUR_HAND_WHITE",
            Self::MinuteHandBlack => "IMAGE_MINUTE_HAND_BLACK",
            Self::MinuteHandWhite => "IMAGE_MINUTE_HAND_WHITE",
            Self::SecondHandBlack => "IMAGE_SECOND_HAND_BLACK",
            Self::SecondHandWhite => "IMAGE_SECOND_HAND_WHITE",
            Self::BatteryBlack => "IMAGE_BATTERY_BLACK",
            Self::BatteryWhite => "IMAGE_BATTERY_WHITE",
            Self::BatteryChargingBlack => "IMAGE_BATTERY_CHARGING_BLACK",
            Self::BatteryChargingWhite => "IMAGE_BATTERY_CHARGING_WHITE",
            Self::NoPhoneBlack => "IMAGE_NO_PHONE_BLACK",
            Self::NoPhoneWhite => "IMAGE_NO_PHONE_WHITE",
            Self::Background => "IMAGE_BACKGROUND",
            Self::BackgroundSimple => "IMAGE_BACKGROUND_SIMPLE",
        }
    }
}

/// Resource loading failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResourceError {
    /// The bundle has no entry for the resource.
    #[error("resource {} missing from bundle", .0.name())]
    Missing(ResourceId),
    /// The entry exists but does not decode as a bitmap.
    #[error("resource {} is not a valid bitmap: {source}", .id.name())]
    Invalid {
        /// Offending resource.
        id: ResourceId,
        /// Decoding failure.
        source: BitmapError,
    },
}

/// Read-only bundle of application images.
pub trait ResourceBundle {
    /// Load `id`.
    fn load(&self, id: ResourceId) -> Result<Bitmap<'static>, ResourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_lists_every_resource_once() {
        for (i, a) in ResourceId::ALL.iter().enumerate() {
            for b in ResourceId::ALL.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn names_are_distinct() {
        for (i, a) in ResourceId::ALL.iter().enumerate() {
            for b in ResourceId::ALL.iter().skip(i + 1) {
                assert_ne!(a.name(), b.name());
            }
        }
    }
}
