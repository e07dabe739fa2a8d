//! Wall clock and tick subscription abstraction

use thiserror::Error;

/// Local wall-clock time of day.
///
/// Construct with [`LocalTime::new`], which enforces
/// `hour < 24`, `minute < 60`, `second < 60`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocalTime {
    hour: u8,
    minute: u8,
    second: u8,
}

/// Error returned when a time component is out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeError {
    /// Hour outside `0..24`.
    #[error("hour {0} out of range 0..24")]
    Hour(u8),
    /// Minute outside `0..60`.
    #[error("minute {0} out of range 0..60")]
    Minute(u8),
    /// Second outside `0..60`.
    #[error("second {0} out of range 0..60")]
    Second(u8),
}

impl LocalTime {
    /// Midnight.
    pub const MIDNIGHT: Self = Self {
        hour: 0,
        minute: 0,
        second: 0,
    };

    /// Validate and build a time of day.
    pub fn new(hour: u8, minute: u8, second: u8) -> Result<Self, TimeError> {
        if hour >= 24 {
            return Err(TimeError::Hour(hour));
        }
        if minute >= 60 {
            return Err(TimeError::Minute(minute));
        }
        if second >= 60 {
            return Err(TimeError::Second(second));
        }
        Ok(Self {
            hour,
            minute,
            second,
        })
    }

    /// Hour of day, 0–23.
    pub fn hour(self) -> u8 {
        self.hour
    }

    /// Minute, 0–59.
    pub fn minute(self) -> u8 {
        self.minute
    }

    /// Second, 0–59.
    pub fn second(self) -> u8 {
        self.second
    }

    /// Seconds elapsed since midnight.
    pub fn seconds_since_midnight(self) -> u32 {
        u32::from(self.hour) * 3600 + u32::from(self.minute) * 60 + u32::from(self.second)
    }

    /// Build from seconds since midnight, wrapping at 24 h.
    // Each component is bounded by the modulo, so the casts are lossless.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_seconds_since_midnight(secs: u32) -> Self {
        let secs = secs % 86_400;
        Self {
            hour: (secs / 3600) as u8,
            minute: (secs / 60 % 60) as u8,
            second: (secs % 60) as u8,
        }
    }
}

/// Source of the current local time.
pub trait WallClock {
    /// Current local time of day.
    fn now(&self) -> LocalTime;
}

/// Tick granularity. The host fixes it at subscription time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickUnit {
    /// One tick per second.
    Second,
    /// One tick per minute, on the minute boundary.
    Minute,
}

impl TickUnit {
    /// Tick period in seconds.
    pub const fn period_secs(self) -> u32 {
        match self {
            Self::Second => 1,
            Self::Minute => 60,
        }
    }

    /// Returns `true` if a tick is due when the clock reads `time`.
    pub fn is_boundary(self, time: LocalTime) -> bool {
        match self {
            Self::Second => true,
            Self::Minute => time.second() == 0,
        }
    }
}

/// Periodic tick subscription.
pub trait TickService {
    /// Start delivering ticks at `unit` granularity.
    fn subscribe(&mut self, unit: TickUnit);

    /// Stop delivering ticks.
    fn unsubscribe(&mut self);

    /// Current subscription, `None` when unsubscribed.
    fn subscription(&self) -> Option<TickUnit>;
}
