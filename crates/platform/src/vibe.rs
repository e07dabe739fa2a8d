//! Vibration motor abstraction

use heapless::Vec;

/// Maximum number of on/off segments in one pattern.
pub const MAX_SEGMENTS: usize = 16;

/// Alternating on/off durations in milliseconds, starting with "on".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VibePattern {
    segments: Vec<u32, MAX_SEGMENTS>,
}

impl VibePattern {
    /// Build a pattern from segment durations.
    ///
    /// Returns `None` if `durations_ms` has more than [`MAX_SEGMENTS`] entries.
    pub fn new(durations_ms: &[u32]) -> Option<Self> {
        Vec::from_slice(durations_ms)
            .ok()
            .map(|segments| Self { segments })
    }

    /// Segment durations in milliseconds.
    pub fn segments(&self) -> &[u32] {
        &self.segments
    }

    /// Total pattern length in milliseconds.
    pub fn total_ms(&self) -> u32 {
        self.segments.iter().fold(0u32, |acc, d| acc.saturating_add(*d))
    }
}

/// Vibration motor.
pub trait Vibration {
    /// Queue `pattern` after any pattern already playing.
    fn enqueue(&mut self, pattern: &VibePattern);
}
