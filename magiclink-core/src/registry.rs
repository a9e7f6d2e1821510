use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::config::{RegistryConfig, DEFAULT_TTL};
use crate::error::LinkError;
use crate::link::{CreatedLink, LinkRecord, LinkView, UNNAMED_LABEL};

/// Upper bound on any TTL (~100 years) so deadline arithmetic cannot overflow
pub const MAX_TTL_MS: i64 = 100 * 365 * 24 * 60 * 60 * 1000;

struct RegistryInner {
    links: DashMap<String, LinkRecord>,
    clock: Arc<dyn Clock>,
    default_ttl_ms: i64,
}

/// Thread-safe in-memory registry of magic links
///
/// Uses `DashMap` so that per-token operations only lock the shard holding
/// that token. `lookup` and `revoke` hold the shard lock for their whole
/// check-and-mutate, which makes them atomic with respect to each other and
/// to a concurrent [`sweep`](Registry::sweep).
///
/// Cloning is cheap and every clone shares the same links. The registry does
/// not expire anything on its own; pair it with a [`Sweeper`](crate::Sweeper)
/// to bound memory from links nobody looks up again.
///
/// # Example
///
/// ```rust
/// use magiclink_core::{LinkError, Registry};
///
/// let registry = Registry::new();
/// let link = registry.create(Some("Acme"), Some(60_000));
///
/// let view = registry.lookup(&link.token).unwrap();
/// assert_eq!(view.access_count(), 1);
///
/// registry.revoke(&link.token).unwrap();
/// assert_eq!(registry.lookup(&link.token), Err(LinkError::NotFound));
/// ```
#[derive(Clone)]
pub struct Registry {
    inner: Arc<RegistryInner>,
}

impl Registry {
    /// Creates a registry with default configuration and the system clock
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Creates a registry with custom configuration and the system clock
    pub fn with_config(config: RegistryConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a registry that reads time from `clock`
    pub fn with_clock(config: RegistryConfig, clock: Arc<dyn Clock>) -> Self {
        let default_ttl_ms = match duration_to_millis(config.default_ttl) {
            0 => duration_to_millis(DEFAULT_TTL),
            ms => ms,
        };

        Self {
            inner: Arc::new(RegistryInner {
                links: DashMap::new(),
                clock,
                default_ttl_ms,
            }),
        }
    }

    /// Current time according to the registry's clock, in epoch milliseconds
    pub fn now_millis(&self) -> i64 {
        self.inner.clock.now_millis()
    }

    /// TTL applied when `create` receives no positive TTL, in milliseconds
    pub fn default_ttl_ms(&self) -> i64 {
        self.inner.default_ttl_ms
    }

    /// Issues a new link
    ///
    /// `ttl_ms` is used when positive; `None`, zero, or negative values fall
    /// back to the configured default. TTLs above [`MAX_TTL_MS`] are capped.
    /// A missing or blank label becomes `"Unnamed"`.
    ///
    /// Tokens are random UUID v4 strings. With 122 random bits, collisions are
    /// not checked for.
    pub fn create(&self, label: Option<&str>, ttl_ms: Option<i64>) -> CreatedLink {
        let label: Arc<str> = match label.map(str::trim) {
            Some(l) if !l.is_empty() => Arc::from(l),
            _ => Arc::from(UNNAMED_LABEL),
        };
        let ttl_ms = self.resolve_ttl(ttl_ms);

        let token = Uuid::new_v4().to_string();
        let created_at = self.now_millis();
        let expires_at = created_at.saturating_add(ttl_ms);

        self.inner.links.insert(
            token.clone(),
            LinkRecord::new(Arc::clone(&label), created_at, expires_at),
        );

        CreatedLink {
            token,
            label: label.to_string(),
            created_at,
            expires_at,
        }
    }

    fn resolve_ttl(&self, ttl_ms: Option<i64>) -> i64 {
        match ttl_ms {
            Some(ttl) if ttl > 0 => ttl.min(MAX_TTL_MS),
            _ => self.inner.default_ttl_ms,
        }
    }

    /// Resolves a token for a viewer
    ///
    /// On success the access count is incremented and a snapshot of the
    /// updated link is returned. An expired link is removed and reported as
    /// [`LinkError::Expired`]; the next lookup of it reports `NotFound`.
    pub fn lookup(&self, token: &str) -> Result<LinkView, LinkError> {
        let now = self.now_millis();
        let mut record = self
            .inner
            .links
            .get_mut(token)
            .ok_or(LinkError::NotFound)?;

        if record.is_expired_at(now) {
            // Release the shard lock before removing. remove_if re-checks the
            // predicate so a concurrent revoke or sweep cannot be double counted.
            drop(record);
            self.inner.links.remove_if(token, |_, r| r.is_expired_at(now));
            return Err(LinkError::Expired);
        }

        record.record_access();
        Ok(record.view(token, now))
    }

    /// Returns every link that is active at the registry's current time
    pub fn list_active(&self) -> Vec<LinkView> {
        self.list_active_at(self.now_millis())
    }

    /// Returns every link with `expires_at > now`, oldest first
    ///
    /// Expired links are skipped even if no sweep has removed them yet.
    /// Nothing is mutated.
    pub fn list_active_at(&self, now: i64) -> Vec<LinkView> {
        let mut links: Vec<LinkView> = self
            .inner
            .links
            .iter()
            .filter(|entry| !entry.value().is_expired_at(now))
            .map(|entry| entry.value().view(entry.key(), now))
            .collect();

        links.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.token().cmp(b.token()))
        });
        links
    }

    /// Removes a link whether or not it has expired
    ///
    /// Revoking the same token twice reports `NotFound` the second time.
    pub fn revoke(&self, token: &str) -> Result<(), LinkError> {
        self.inner
            .links
            .remove(token)
            .map(|_| ())
            .ok_or(LinkError::NotFound)
    }

    /// Removes every expired link, returning how many were removed
    pub fn sweep(&self) -> usize {
        self.sweep_at(self.now_millis())
    }

    /// Removes every link with `expires_at <= now`
    pub fn sweep_at(&self, now: i64) -> usize {
        let mut removed = 0;
        self.inner.links.retain(|_, record| {
            if record.is_expired_at(now) {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }

    /// Number of stored links, including expired ones not yet swept
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.links.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.links.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

fn duration_to_millis(d: Duration) -> i64 {
    i64::try_from(d.as_millis())
        .unwrap_or(MAX_TTL_MS)
        .min(MAX_TTL_MS)
}
