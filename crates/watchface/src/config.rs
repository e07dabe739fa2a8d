//! Persisted watchface configuration
//!
//! Five independent flags. The same integer keys address them in the
//! persistent store and in companion-app messages.

use platform::{KeyValueStore, StorageError, TickUnit};

use crate::message::Dictionary;

/// Configuration keys, shared by storage and the message protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum ConfigKey {
    /// Show the crossed-out phone while the link is down.
    ShowNoPhone = 0,
    /// Show the battery gauge.
    ShowBattery = 1,
    /// Vibrate when the link drops.
    Vibe = 2,
    /// Use the plain background.
    Simple = 3,
    /// Show the second hand.
    Seconds = 4,
}

impl ConfigKey {
    /// Every key, in persist order.
    pub const ALL: [ConfigKey; 5] = [
        ConfigKey::ShowNoPhone,
        ConfigKey::ShowBattery,
        ConfigKey::Vibe,
        ConfigKey::Simple,
        ConfigKey::Seconds,
    ];

    /// Integer key.
    pub const fn key(self) -> u32 {
        self as u32
    }

    /// Key for an integer, `None` when unrecognised.
    pub fn from_key(key: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.key() == key)
    }

    const fn bit(self) -> u8 {
        1 << (self as u32)
    }
}

/// Small set of [`ConfigKey`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeySet(u8);

impl KeySet {
    /// Empty set.
    pub const EMPTY: Self = Self(0);

    /// Add `key`.
    pub fn insert(&mut self, key: ConfigKey) {
        self.0 |= key.bit();
    }

    /// Returns `true` if `key` is in the set.
    pub fn contains(self, key: ConfigKey) -> bool {
        self.0 & key.bit() != 0
    }

    /// Returns `true` if no key is in the set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Keys in the set, in key order.
    pub fn iter(self) -> impl Iterator<Item = ConfigKey> {
        ConfigKey::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl FromIterator<ConfigKey> for KeySet {
    fn from_iter<I: IntoIterator<Item = ConfigKey>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for key in iter {
            set.insert(key);
        }
        set
    }
}

/// The five configuration flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(clippy::struct_excessive_bools)]
pub struct Config {
    /// Show the crossed-out phone while the link is down.
    pub show_no_phone: bool,
    /// Show the battery gauge.
    pub show_battery: bool,
    /// Vibrate when the link drops.
    pub vibe: bool,
    /// Use the plain background.
    pub simple: bool,
    /// Show the second hand.
    pub seconds: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show_no_phone: true,
            show_battery: true,
            vibe: false,
            simple: false,
            seconds: false,
        }
    }
}

/// Result of [`Config::apply_message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigUpdate {
    /// Configuration after the message.
    pub config: Config,
    /// Keys the message carried, whether or not the value changed.
    pub touched: KeySet,
}

impl Config {
    /// Flag for `key`.
    pub fn get(&self, key: ConfigKey) -> bool {
        match key {
            ConfigKey::ShowNoPhone => self.show_no_phone,
            ConfigKey::ShowBattery => self.show_battery,
            ConfigKey::Vibe => self.vibe,
            ConfigKey::Simple => self.simple,
            ConfigKey::Seconds => self.seconds,
        }
    }

    /// Set the flag for `key`.
    pub fn set(&mut self, key: ConfigKey, value: bool) {
        let slot = match key {
            ConfigKey::ShowNoPhone => &mut self.show_no_phone,
            ConfigKey::ShowBattery => &mut self.show_battery,
            ConfigKey::Vibe => &mut self.vibe,
            ConfigKey::Simple => &mut self.simple,
            ConfigKey::Seconds => &mut self.seconds,
        };
        *slot = value;
    }

    /// Defaults, overridden by every key present in `store`.
    pub fn load(store: &impl KeyValueStore) -> Self {
        let mut config = Self::default();
        for key in ConfigKey::ALL {
            if !store.exists(key.key()) {
                continue;
            }
            if let Some(value) = store.read_bool(key.key()) {
                config.set(key, value);
            }
        }
        config
    }

    /// Write all five flags, changed or not.
    ///
    /// Every key is attempted; the first failure is returned.
    pub fn persist(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        let mut result = Ok(());
        for key in ConfigKey::ALL {
            if let Err(e) = store.write_bool(key.key(), self.get(key)) {
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }

    /// Apply a companion-app message.
    ///
    /// Each recognised key present in `dict` sets its flag to whether the
    /// value is the string `"true"`. Absent keys keep their value.
    #[must_use]
    pub fn apply_message(self, dict: &Dictionary<'_>) -> ConfigUpdate {
        let mut config = self;
        let mut touched = KeySet::EMPTY;
        for key in ConfigKey::ALL {
            if let Some(tuple) = dict.find(key.key()) {
                config.set(key, tuple.is_true());
                touched.insert(key);
            }
        }
        ConfigUpdate { config, touched }
    }

    /// Tick granularity the hands need.
    pub fn tick_unit(&self) -> TickUnit {
        if self.seconds {
            TickUnit::Second
        } else {
            TickUnit::Minute
        }
    }
}
