//! Rate Limiting Infrastructure
//!
//! In-process cooldown table: one unlock timestamp per opaque key.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Cooldown configuration
#[derive(Debug, Clone)]
pub struct CooldownConfig {
    /// Whether cooldowns are enforced at all
    pub enabled: bool,
    /// Time a key stays locked after an accepted action
    pub window: Duration,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window: Duration::from_secs(1440 * 60),
        }
    }
}

impl CooldownConfig {
    pub fn from_minutes(enabled: bool, minutes: u64) -> Self {
        Self {
            enabled,
            window: Duration::from_secs(minutes.saturating_mul(60)),
        }
    }
}

/// Map of key to unlock time (Unix ms).
///
/// Entries are never removed; a stale entry simply stops matching once its
/// unlock time has passed.
#[derive(Debug, Default)]
pub struct CooldownTable {
    unlock_at: Mutex<HashMap<String, i64>>,
}

impl CooldownTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock `key` until `unlock_at_ms`, replacing any previous entry
    pub fn lock_until(&self, key: String, unlock_at_ms: i64) {
        self.unlock_at
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, unlock_at_ms);
    }

    /// True while `now_ms` is before the key's unlock time
    pub fn is_locked(&self, key: &str, now_ms: i64) -> bool {
        self.unlock_at
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .is_some_and(|&unlock_at| now_ms < unlock_at)
    }

    /// Stored keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .unlock_at
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_one_day() {
        let config = CooldownConfig::default();
        assert!(config.enabled);
        assert_eq!(config.window, Duration::from_secs(86_400));
        assert_eq!(CooldownConfig::from_minutes(false, 5).window, Duration::from_secs(300));
    }

    #[test]
    fn test_lock_boundary_is_inclusive_unlock() {
        let table = CooldownTable::new();
        table.lock_until("k".into(), 1_000);

        assert!(table.is_locked("k", 999));
        assert!(!table.is_locked("k", 1_000));
        assert!(!table.is_locked("other", 0));
    }

    #[test]
    fn test_lock_overwrites() {
        let table = CooldownTable::new();
        table.lock_until("k".into(), 1_000);
        table.lock_until("k".into(), 5_000);

        assert_eq!(table.keys(), vec!["k".to_string()]);
        assert!(table.is_locked("k", 4_999));
        assert!(!table.is_locked("k", 5_000));
    }

    #[test]
    fn test_huge_delay_saturates() {
        let config = CooldownConfig::from_minutes(true, u64::MAX);
        assert_eq!(config.window, Duration::from_secs(u64::MAX));
        assert!(config.window > CooldownConfig::default().window);
    }
}
