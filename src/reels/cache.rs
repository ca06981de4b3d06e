use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Serialized reel subset currently on display
pub const DISPLAYED_REELS_KEY: &str = "displayedReels";
/// Epoch milliseconds of the last selection
pub const REELS_TIMESTAMP_KEY: &str = "reelsTimestamp";

/// Session-scoped key/value store with optional per-entry TTL.
///
/// Stands in for browser session storage. Expired entries read as absent.
pub trait SessionCache: Send + Sync {
    fn get(&self, key: &str, now: DateTime<Utc>) -> Option<String>;

    fn set(&self, key: &str, value: String, ttl: Option<Duration>, now: DateTime<Utc>);

    fn clear(&self, key: &str);
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

/// In-process session cache
#[derive(Debug, Default)]
pub struct MemorySessionCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemorySessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionCache for MemorySessionCache {
    fn get(&self, key: &str, now: DateTime<Utc>) -> Option<String> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let expired = entries
            .get(key)?
            .expires_at
            .is_some_and(|expires_at| expires_at <= now);
        if expired {
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|entry| entry.value.clone())
    }

    fn set(&self, key: &str, value: String, ttl: Option<Duration>, now: DateTime<Utc>) {
        // A TTL too large for chrono just means "session lifetime"
        let expires_at = ttl
            .and_then(|ttl| chrono::Duration::from_std(ttl).ok())
            .and_then(|ttl| now.checked_add_signed(ttl));
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), Entry { value, expires_at });
    }

    fn clear(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}
