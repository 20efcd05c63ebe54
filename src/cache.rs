//! Device-wide content cache key.
//!
//! Clients cache catalog responses keyed on this value; any operation that
//! removes a content tree bumps it so stale listings are discarded.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

pub struct ContentCacheKey {
    key: AtomicI64,
}

impl ContentCacheKey {
    pub fn new() -> Self {
        Self {
            key: AtomicI64::new(unix_now()),
        }
    }

    pub fn get(&self) -> i64 {
        self.key.load(Ordering::Relaxed)
    }

    /// Bump the key. Monotonic even when called twice within the same second.
    pub fn update_cache_key(&self) -> i64 {
        let now = unix_now();
        let mut current = self.key.load(Ordering::Relaxed);
        loop {
            let next = now.max(current + 1);
            match self.key.compare_exchange_weak(
                current,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return next,
                Err(observed) => current = observed,
            }
        }
    }
}

impl Default for ContentCacheKey {
    fn default() -> Self {
        Self::new()
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_always_advances() {
        let cache_key = ContentCacheKey::new();
        let first = cache_key.get();
        let second = cache_key.update_cache_key();
        let third = cache_key.update_cache_key();
        assert!(second > first);
        assert!(third > second);
        assert_eq!(cache_key.get(), third);
    }
}
