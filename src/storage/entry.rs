//! Cache Entry
//!
//! Stored unit: a value plus its creation and expiration metadata.

use std::time::{Duration, Instant};

/// A stored value with its creation time and optional expiry
#[derive(Debug, Clone)]
pub struct Entry<V> {
    value: V,
    created_at: Instant,
    expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    /// Creates an entry expiring after `ttl`, or never when `ttl` is `None`.
    /// A `ttl` too large to represent as an instant also never expires.
    pub(crate) fn new(value: V, ttl: Option<Duration>) -> Self {
        let now = Instant::now();
        Self {
            value,
            created_at: now,
            expires_at: ttl.and_then(|d| now.checked_add(d)),
        }
    }

    /// Returns a reference to the stored value
    pub fn value(&self) -> &V {
        &self.value
    }

    /// When this entry was inserted or last overwritten
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Absolute expiry instant; `None` for permanent entries
    pub fn expires_at(&self) -> Option<Instant> {
        self.expires_at
    }

    /// Checks if this entry has expired
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Expiration judged against a caller-supplied instant, so a scan over
    /// many entries applies one consistent `now`
    #[inline]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.map(|t| now > t).unwrap_or(false)
    }
}
