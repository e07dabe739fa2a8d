//! Silly Walk desktop host
//!
//! Runs the watchface on a desktop with every device service simulated.
//!
//! # Architecture
//!
//! ```text
//! main.rs (simulator window, tokio loop, keyboard)
//!         ↓  HostEvent
//! watchface::Watchface
//!         ↓
//! EmulatorHost (clock, store file, battery/link state, generated artwork)
//! ```
//!
//! # Features
//!
//! - `emulator` - build the `silly-walk-emulator` binary (SDL window, tokio,
//!   tracing-subscriber)
//!
//! ```bash
//! RUST_LOG=debug cargo run -p firmware --features emulator
//! ```
//!
//! Settings persist to `silly-walk-state.bin` in the working directory, or
//! to the path in `SILLY_WALK_STATE`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::print_stdout)] // prefer tracing over println! in lib code
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod assets;
pub mod display;
pub mod host;
pub mod input;

pub use assets::Assets;
pub use host::{Clock, EmulatorHost};
pub use input::{KeyAction, Stimulus};
