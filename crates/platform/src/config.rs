//! Application configuration and constants
//!
//! Identity values used by the emulator window title and logs.

/// The application name
pub const APP_NAME: &str = "Silly Walk";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Emulator window banner
pub const fn dev_banner() -> &'static str {
    "Silly Walk - Emulator"
}
