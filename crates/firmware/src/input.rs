//! Keyboard controls
//!
//! | Key       | Action                                   |
//! |-----------|------------------------------------------|
//! | `b`       | drop / restore the companion link        |
//! | `c`       | plug / unplug the charger                |
//! | `+` / `-` | charge up / down by 10 %                 |
//! | `1`..`5`  | companion app flips one setting          |
//!
//! Settings keys map to [`ConfigKey`] in key order. A flip sends a single
//! tuple carrying the chosen setting's new value.

use platform::ChargeState;
use watchface::{Config, ConfigKey, Dictionary, HostEvent, MessageError, Tuple};

use crate::host::EmulatorHost;

/// Charge change per `+` / `-` press, in percent.
pub const CHARGE_STEP: i8 = 10;

/// What a key press asks the emulator to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Flip the companion link.
    ToggleLink,
    /// Flip the charger.
    ToggleCharging,
    /// Change the charge by this many percent.
    Charge(i8),
    /// Send a settings message flipping this key.
    ToggleSetting(ConfigKey),
}

impl KeyAction {
    /// Action bound to `key`, if any.
    pub fn from_char(key: char) -> Option<Self> {
        Some(match key {
            'b' | 'B' => Self::ToggleLink,
            'c' | 'C' => Self::ToggleCharging,
            '+' | '=' => Self::Charge(CHARGE_STEP),
            '-' => Self::Charge(-CHARGE_STEP),
            '1'..='5' => {
                let index = key.to_digit(10)? - 1;
                Self::ToggleSetting(ConfigKey::from_key(index)?)
            }
            _ => return None,
        })
    }
}

/// Owned host event produced by a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stimulus {
    /// Battery state changed.
    Battery(ChargeState),
    /// Link went up or down.
    Connection(bool),
    /// Encoded companion message.
    Message(Vec<u8>),
}

impl Stimulus {
    /// Borrow as the event the watchface handles.
    pub fn as_event(&self) -> HostEvent<'_> {
        match self {
            Self::Battery(state) => HostEvent::Battery(*state),
            Self::Connection(up) => HostEvent::Connection(*up),
            Self::Message(bytes) => HostEvent::Message(bytes),
        }
    }
}

/// Encode a one-tuple settings message that inverts `flip`.
pub fn settings_message(config: Config, flip: ConfigKey) -> Result<Vec<u8>, MessageError> {
    let text = if config.get(flip) { "false" } else { "true" };
    let mut dict = Dictionary::new();
    dict.push(Tuple::cstring(flip.key(), text))
        .map_err(|_| MessageError::TooManyTuples(1))?;
    let mut out = vec![0; dict.encoded_len()];
    let len = dict.encode(&mut out)?;
    out.truncate(len);
    Ok(out)
}

/// Apply `action` to `host`. Returns the event the watchface should see,
/// if the host delivers one.
pub fn apply(
    host: &mut EmulatorHost,
    action: KeyAction,
    config: Config,
) -> Result<Option<Stimulus>, MessageError> {
    Ok(match action {
        KeyAction::ToggleLink => host.toggle_link().map(Stimulus::Connection),
        KeyAction::ToggleCharging => host.toggle_charging().map(Stimulus::Battery),
        KeyAction::Charge(delta) => host.step_charge(delta).map(Stimulus::Battery),
        KeyAction::ToggleSetting(key) => {
            tracing::info!(?key, to = !config.get(key), "companion settings");
            Some(Stimulus::Message(settings_message(config, key)?))
        }
    })
}
