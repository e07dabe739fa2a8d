//! Silly Walk - Emulator Entry Point
//!
//! Opens a simulator window at the watch resolution and drives the watchface
//! from a tokio loop. Keyboard controls are listed in `firmware::input`;
//! `Esc` or closing the window quits.

use std::time::Duration;

use anyhow::Context as _;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{
    BinaryColorTheme, OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window,
};
use tracing_subscriber::EnvFilter;

use firmware::display::{mirror, OUTPUT_SCALE};
use firmware::{input, Assets, EmulatorHost, KeyAction};
use platform::config;
use platform::storage_local::FileStore;
use watchface::graphics::SCREEN;
use watchface::{Framebuffer, HostEvent, Watchface};

/// Event loop period.
const FRAME_PERIOD: Duration = Duration::from_millis(50);

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    tracing::info!(version = config::APP_VERSION, "{}", config::dev_banner());

    let store = FileStore::from_env().context("opening settings store")?;
    tracing::info!(path = %store.path().display(), keys = store.len(), "settings store");
    let assets = Assets::generate().context("generating artwork")?;
    let mut host = EmulatorHost::new(store, assets);
    let mut face = Watchface::init(&mut host).context("starting watchface")?;

    let mut display = SimulatorDisplay::<BinaryColor>::new(SCREEN.size);
    let settings = OutputSettingsBuilder::new()
        .scale(OUTPUT_SCALE)
        .theme(BinaryColorTheme::OledWhite)
        .build();
    let mut window = Window::new(config::dev_banner(), &settings);
    let mut fb = Framebuffer::new();

    let mut frames = tokio::time::interval(FRAME_PERIOD);
    'running: loop {
        frames.tick().await;

        if let Some(time) = host.poll_tick() {
            deliver(&mut face, &mut host, HostEvent::Tick(time));
        }
        if face.render(&host, &mut fb) {
            mirror(&fb, &mut display)?;
        }
        window.update(&display);

        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,
                SimulatorEvent::KeyDown {
                    keycode,
                    repeat: false,
                    ..
                } => {
                    if keycode == Keycode::Escape {
                        break 'running;
                    }
                    let Some(action) = key_char(keycode).and_then(KeyAction::from_char) else {
                        continue;
                    };
                    match input::apply(&mut host, action, face.config()) {
                        Ok(Some(stimulus)) => deliver(&mut face, &mut host, stimulus.as_event()),
                        Ok(None) => {}
                        Err(e) => tracing::warn!(%e, "cannot encode settings message"),
                    }
                }
                _ => {}
            }
        }
    }

    face.deinit(&mut host);
    tracing::info!("emulator closed");
    Ok(())
}

fn deliver(face: &mut Watchface, host: &mut EmulatorHost, event: HostEvent<'_>) {
    if let Err(e) = face.handle(host, event) {
        tracing::warn!(%e, ?event, "event rejected");
    }
}

/// Single-character key name, lowercased (`"B"` -> `'b'`, `"="` -> `'='`).
fn key_char(keycode: Keycode) -> Option<char> {
    let name = keycode.name();
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c.to_ascii_lowercase()),
        _ => None,
    }
}
