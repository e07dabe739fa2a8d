//! Host service layer for the Silly Walk watchface
//!
//! The watchface runs inside a host that owns the event loop and every
//! device service. This crate describes those services as small traits so
//! the watchface logic can run on a device port, in the desktop emulator,
//! and in tests without changes.
//!
//! # Architecture Layers
//!
//! ```text
//! Host event loop (firmware crate: emulator / device port)
//!         ↓  HostEvent (tick, battery, link, message)
//! Watchface logic (watchface crate)
//!         ↓
//! Platform services (this crate - trait abstractions)
//! ```
//!
//! # Services
//!
//! - [`WallClock`] / [`TickService`] - local time and tick subscriptions
//! - [`BatteryMonitor`] - charge state
//! - [`ConnectionMonitor`] - companion-app link state
//! - [`EventService`] - battery and link change subscriptions
//! - [`KeyValueStore`] - persisted integer-keyed values
//! - [`MessageChannel`] - companion-app message inbox/outbox
//! - [`Vibration`] - vibration motor patterns
//! - [`ResourceBundle`] - bundled 1-bit bitmaps
//!
//! [`Host`] bundles all of them for code that needs the whole surface.
//!
//! # Features
//!
//! - `std`: file-backed store and mock host (for the emulator and tests)
//! - `defmt`: derive `defmt::Format` on platform types

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::must_use_candidate)] // accessors — callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod app_message;
pub mod bitmap;
pub mod bluetooth;
pub mod config;
pub mod event;
pub mod power;
pub mod resource;
pub mod storage;
pub mod timer;
pub mod vibe;

#[cfg(any(test, feature = "std"))]
pub mod mocks;

#[cfg(feature = "std")]
pub mod storage_local;

// Re-export main service traits
pub use app_message::{ChannelError, MessageChannel};
pub use bitmap::{Bitmap, BitmapError};
pub use bluetooth::ConnectionMonitor;
pub use event::EventService;
pub use power::{BatteryMonitor, ChargePercent, ChargeState};
pub use resource::{ResourceBundle, ResourceError, ResourceId};
pub use storage::{KeyValueStore, StorageError};
pub use timer::{LocalTime, TickService, TickUnit, TimeError, WallClock};
pub use vibe::{VibePattern, Vibration};

/// Every service the watchface needs from its host.
///
/// Implemented automatically for any type that implements all of the
/// individual service traits.
pub trait Host:
    WallClock
    + TickService
    + BatteryMonitor
    + ConnectionMonitor
    + EventService
    + KeyValueStore
    + MessageChannel
    + Vibration
    + ResourceBundle
{
}

impl<T> Host for T where
    T: WallClock
        + TickService
        + BatteryMonitor
        + ConnectionMonitor
        + EventService
        + KeyValueStore
        + MessageChannel
        + Vibration
        + ResourceBundle
{
}
