use std::collections::HashMap;

pub const CURRENT_LEVEL_KEY: &str = "current_game_level";
pub const HIGHEST_UNLOCKED_LEVEL_KEY: &str = "highest_unlocked_level";

/// Persistence boundary for level progression.
///
/// The host owns the actual storage; the engine reads resolved values when
/// a round starts and writes updates as they happen. Only the two keys
/// above are ever used.
pub trait ProgressStore {
    /// Returns the stored value for `key`, or 1 when the key is absent.
    fn read_int(&self, key: &str) -> u32;
    fn write_int(&mut self, key: &str, value: u32);
}

/// In-memory store. Backs tests, and the wasm sessions where the host
/// seeds it with its persisted values and reads updates back out of the
/// state snapshots.
#[derive(Debug, Default, Clone)]
pub struct MemoryProgress {
    values: HashMap<String, u32>,
}

impl MemoryProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(current_level: u32, highest_unlocked: u32) -> Self {
        let mut store = Self::default();
        store.write_int(CURRENT_LEVEL_KEY, current_level);
        store.write_int(HIGHEST_UNLOCKED_LEVEL_KEY, highest_unlocked);
        store
    }
}

impl ProgressStore for MemoryProgress {
    fn read_int(&self, key: &str) -> u32 {
        self.values.get(key).copied().unwrap_or(1)
    }

    fn write_int(&mut self, key: &str, value: u32) {
        self.values.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_default_to_one() {
        let store = MemoryProgress::new();

        assert_eq!(store.read_int(CURRENT_LEVEL_KEY), 1);
        assert_eq!(store.read_int(HIGHEST_UNLOCKED_LEVEL_KEY), 1);
    }

    #[test]
    fn written_values_read_back() {
        let mut store = MemoryProgress::new();
        store.write_int(CURRENT_LEVEL_KEY, 5);

        assert_eq!(store.read_int(CURRENT_LEVEL_KEY), 5);
        assert_eq!(store.read_int(HIGHEST_UNLOCKED_LEVEL_KEY), 1);
    }

    #[test]
    fn with_values_seeds_both_keys() {
        let store = MemoryProgress::with_values(3, 6);

        assert_eq!(store.read_int(CURRENT_LEVEL_KEY), 3);
        assert_eq!(store.read_int(HIGHEST_UNLOCKED_LEVEL_KEY), 6);
    }
}
