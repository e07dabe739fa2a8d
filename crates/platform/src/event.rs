//! Battery and link change subscriptions
//!
//! Subscribing only tells the host to start delivering the matching
//! `HostEvent`s; the events themselves flow through the host event loop.

/// Change-notification subscriptions.
pub trait EventService {
    /// Start delivering battery state changes.
    fn subscribe_battery(&mut self);

    /// Stop delivering battery state changes.
    fn unsubscribe_battery(&mut self);

    /// Start delivering link connect/disconnect changes.
    fn subscribe_connection(&mut self);

    /// Stop delivering link connect/disconnect changes.
    fn unsubscribe_connection(&mut self);
}
