//! Battery state abstraction

/// Battery charge as a percentage, clamped to 0–100.
///
/// Wraps a `u8` with the invariant `0 <= value <= 100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct ChargePercent(u8);

impl ChargePercent {
    /// Create a `ChargePercent`, clamping values above 100 to 100.
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    /// Return the inner percentage (0–100).
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Add `delta` percentage points, saturating at 0 and 100.
    #[must_use]
    pub fn step(self, delta: i8) -> Self {
        Self::new(self.0.saturating_add_signed(delta))
    }
}

/// Snapshot of the battery, read fresh whenever the gauge is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChargeState {
    /// Remaining charge.
    pub charge_percent: ChargePercent,
    /// The battery is currently charging.
    pub is_charging: bool,
    /// External power is connected (may be true while not charging when full).
    pub is_plugged: bool,
}

impl ChargeState {
    /// Discharging battery at `percent`.
    #[must_use]
    pub fn discharging(percent: u8) -> Self {
        Self {
            charge_percent: ChargePercent::new(percent),
            is_charging: false,
            is_plugged: false,
        }
    }

    /// Battery at `percent`, on external power and charging.
    #[must_use]
    pub fn charging(percent: u8) -> Self {
        Self {
            charge_percent: ChargePercent::new(percent),
            is_charging: true,
            is_plugged: true,
        }
    }
}

impl Default for ChargeState {
    fn default() -> Self {
        Self::discharging(100)
    }
}

/// Battery state monitor
pub trait BatteryMonitor {
    /// Current charge state.
    fn charge_state(&self) -> ChargeState;
}
