//! Companion-app link abstraction

/// Wireless link to the paired phone.
pub trait ConnectionMonitor {
    /// Returns `true` while the companion device is connected.
    fn is_connected(&self) -> bool;
}
