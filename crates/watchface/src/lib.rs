//! Silly Walk analog watchface
//!
//! Host-independent watchface logic: hand angles, the layer tree and its
//! 1-bit compositing, the battery and disconnect glyphs, and the persisted
//! configuration driven by companion-app messages.
//!
//! Everything the watchface needs from the device goes through the
//! [`platform::Host`] traits, so the same code runs on a device port, in the
//! desktop emulator and under `platform::mocks::MockHost` in tests.
//!
//! This crate is `no_std`; it only uses `core`, `heapless` and `libm`.

#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod angle;
pub mod app;
pub mod config;
pub mod gauge;
pub mod graphics;
pub mod layer;
pub mod message;

pub use angle::{HandAngles, TRIG_MAX_ANGLE};
pub use app::{HostEvent, Watchface, WatchfaceError, DISCONNECT_VIBE};
pub use config::{Config, ConfigKey, ConfigUpdate, KeySet};
pub use graphics::{CompositingMode, Framebuffer, GraphicsContext};
pub use layer::{LayerId, Window};
pub use message::{Dictionary, MessageError, Tuple, TupleValue};
