// --- File: crates/frontdesk_blog/src/likes.rs ---
use std::collections::HashMap;
use std::sync::RwLock;

/// Like counters per article slug. Process memory only; a restart resets them.
#[derive(Default)]
pub struct LikeStore {
    counts: RwLock<HashMap<String, u64>>,
}

impl LikeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slug: &str) -> u64 {
        let counts = self.counts.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        counts.get(slug).copied().unwrap_or(0)
    }

    /// Adds one like and returns the new count.
    pub fn increment(&self, slug: &str) -> u64 {
        let mut counts = self.counts.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        let count = counts.entry(slug.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    /// Removes one like and returns the new count, which never drops below 0.
    pub fn decrement(&self, slug: &str) -> u64 {
        let mut counts = self.counts.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        match counts.get_mut(slug) {
            Some(count) => {
                *count = count.saturating_sub(1);
                *count
            }
            None => 0,
        }
    }
}
