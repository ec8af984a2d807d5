//! Cache Configuration

use std::time::Duration;

/// Construction-time cache configuration, immutable thereafter
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL applied by `set` calls without an explicit one; zero means those
    /// entries never expire
    pub default_ttl: Duration,

    /// Period between background sweep passes; `None` or a zero duration
    /// disables the sweeper, leaving lazy expiration only
    pub sweep_interval: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::ZERO,
            sweep_interval: Some(Duration::from_secs(60)),
        }
    }
}

impl CacheConfig {
    /// Creates a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the TTL used when `set` is called without an explicit one
    ///
    /// `Duration::ZERO` makes such entries permanent.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Sets the period between background sweep passes
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = Some(interval);
        self
    }

    /// Disables background reclamation entirely
    ///
    /// Expired entries are then hidden from reads but stay in memory until
    /// overwritten, removed, or purged manually.
    pub fn without_sweeper(mut self) -> Self {
        self.sweep_interval = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.default_ttl, Duration::ZERO);
        assert_eq!(config.sweep_interval, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_builder_chaining() {
        let config = CacheConfig::new()
            .with_default_ttl(Duration::from_secs(300))
            .with_sweep_interval(Duration::from_secs(30));

        assert_eq!(config.default_ttl, Duration::from_secs(300));
        assert_eq!(config.sweep_interval, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_without_sweeper() {
        let config = CacheConfig::new()
            .with_sweep_interval(Duration::from_secs(30))
            .without_sweeper();

        assert_eq!(config.sweep_interval, None);
    }
}
