use std::time::Duration;

/// TTL applied when a link is created without a positive TTL (2 hours)
pub const DEFAULT_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// Interval between expiry sweeps (10 minutes)
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Configuration for the link registry and its expiry sweeper
///
/// # Example
///
/// ```rust
/// use magiclink_core::RegistryConfig;
/// use std::time::Duration;
///
/// let config = RegistryConfig::default()
///     .with_default_ttl(Duration::from_secs(30 * 60))
///     .with_sweep_interval(Duration::from_secs(60));
/// ```
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// TTL used when the caller supplies none, zero, or a negative value (default: 2 hours)
    pub default_ttl: Duration,
    /// Interval between sweeper passes (default: 10 minutes)
    pub sweep_interval: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_ttl: DEFAULT_TTL,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl RegistryConfig {
    /// Creates a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fallback TTL for new links
    ///
    /// A zero duration is ignored when the registry is built and the
    /// built-in two hour default is used instead, so that every link keeps
    /// `expires_at > created_at`.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Sets how often the sweeper evicts expired links
    ///
    /// A zero interval is replaced by [`DEFAULT_SWEEP_INTERVAL`] when the
    /// sweeper is built.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Sets the fallback TTL in whole minutes
    pub fn with_default_ttl_minutes(self, minutes: u64) -> Self {
        self.with_default_ttl(Duration::from_secs(minutes.saturating_mul(60)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();
        assert_eq!(config.default_ttl, Duration::from_secs(7200));
        assert_eq!(config.sweep_interval, Duration::from_secs(600));
    }

    #[test]
    fn test_builder_pattern_chaining() {
        let config = RegistryConfig::new()
            .with_default_ttl_minutes(15)
            .with_sweep_interval(Duration::from_secs(30));
        assert_eq!(config.default_ttl, Duration::from_secs(900));
        assert_eq!(config.sweep_interval, Duration::from_secs(30));
    }
}
