//! Server configuration from `MAGICLINK_*` environment variables

use magiclink_core::RegistryConfig;
use std::time::Duration;

/// Secret used when `MAGICLINK_ADMIN_SECRET` is not set
pub const FALLBACK_ADMIN_SECRET: &str = "change-me";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 50051;
const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 600;
const DEFAULT_TTL_MINUTES: u64 = 120;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub admin_secret: String,
    /// Prefix of the share URLs handed back on create, e.g. `https://preview.example.com`
    pub base_url: String,
    pub sweep_interval: Duration,
    pub default_ttl_minutes: u64,
}

impl ServerConfig {
    /// Reads configuration from the process environment
    ///
    /// Missing or unparseable values fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parsed = |key: &str, default: u64| -> u64 {
            lookup(key)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        };

        let port = lookup("MAGICLINK_PORT")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let default_ttl_minutes = match parsed("MAGICLINK_DEFAULT_TTL_MINUTES", 0) {
            0 => DEFAULT_TTL_MINUTES,
            minutes => minutes,
        };
        let sweep_interval_secs = match parsed("MAGICLINK_SWEEP_INTERVAL", 0) {
            0 => DEFAULT_SWEEP_INTERVAL_SECS,
            secs => secs,
        };

        Self {
            host: lookup("MAGICLINK_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            admin_secret: lookup("MAGICLINK_ADMIN_SECRET")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| FALLBACK_ADMIN_SECRET.to_string()),
            base_url: lookup("MAGICLINK_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            sweep_interval: Duration::from_secs(sweep_interval_secs),
            default_ttl_minutes,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether the hardcoded fallback secret is in use
    pub fn uses_fallback_secret(&self) -> bool {
        self.admin_secret == FALLBACK_ADMIN_SECRET
    }

    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig::default()
            .with_default_ttl_minutes(self.default_ttl_minutes)
            .with_sweep_interval(self.sweep_interval)
    }
}
