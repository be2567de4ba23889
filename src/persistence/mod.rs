//! Integer key/value persistence for the economy
//!
//! Gold and the high score outlive a session. The game only needs two calls:
//! read with a default, and write. LocalStorage backs it in the browser;
//! `MemoryStorage` stands in everywhere else.

use std::collections::HashMap;

/// Storage key for the gold balance
pub const GOLD_KEY: &str = "flappy_shark_gold";
/// Storage key for the best score
pub const HIGH_SCORE_KEY: &str = "flappy_shark_high_score";

/// Persistence gateway
pub trait Storage {
    /// Stored value, or `default` when missing or unreadable
    fn read_int(&self, key: &str, default: u64) -> u64;
    fn write_int(&mut self, key: &str, value: u64);
}

/// In-memory storage (tests and native runs)
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, u64>,
    /// Number of writes performed
    pub writes: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: u64) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }
}

impl Storage for MemoryStorage {
    fn read_int(&self, key: &str, default: u64) -> u64 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn write_int(&mut self, key: &str, value: u64) {
        self.writes += 1;
        self.values.insert(key.to_string(), value);
    }
}

/// Browser LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn new() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable, progress will not be saved");
        }
        Self { storage }
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl Storage for LocalStorage {
    fn read_int(&self, key: &str, default: u64) -> u64 {
        let Some(storage) = &self.storage else {
            return default;
        };
        match storage.get_item(key) {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring malformed value for {}: {:?}", key, raw);
                default
            }),
            _ => default,
        }
    }

    fn write_int(&mut self, key: &str, value: u64) {
        if let Some(storage) = &self.storage {
            if storage.set_item(key, &value.to_string()).is_err() {
                log::warn!("Failed to save {}", key);
            }
        }
    }
}
