use tokio::time::Instant;

/// A cached value together with the instant it stops being served.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    key: String,
    value: V,
    expires: Instant,
}

impl<V> CacheEntry<V> {
    pub fn new(key: impl Into<String>, value: V, expires: Instant) -> Self {
        Self {
            key: key.into(),
            value,
            expires,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn expires(&self) -> Instant {
        self.expires
    }

    /// An entry is live strictly before its expiration instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires
    }
}
