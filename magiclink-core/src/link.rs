use std::sync::Arc;

/// Label given to links created without one
pub const UNNAMED_LABEL: &str = "Unnamed";

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Rounds a millisecond duration to the nearest whole minute, halves rounding up
pub fn round_to_minutes(millis: i64) -> i64 {
    (millis.saturating_add(MILLIS_PER_MINUTE / 2)).div_euclid(MILLIS_PER_MINUTE)
}

/// A stored link, owned by the registry
#[derive(Debug, Clone)]
pub(crate) struct LinkRecord {
    label: Arc<str>,
    created_at: i64,
    expires_at: i64,
    access_count: u64,
}

impl LinkRecord {
    pub(crate) fn new(label: Arc<str>, created_at: i64, expires_at: i64) -> Self {
        Self {
            label,
            created_at,
            expires_at,
            access_count: 0,
        }
    }

    /// The one expiry predicate shared by lookup, listing and sweeping
    pub(crate) fn is_expired_at(&self, now: i64) -> bool {
        now >= self.expires_at
    }

    pub(crate) fn record_access(&mut self) {
        self.access_count = self.access_count.saturating_add(1);
    }

    pub(crate) fn view(&self, token: &str, now: i64) -> LinkView {
        LinkView {
            token: token.to_string(),
            label: Arc::clone(&self.label),
            created_at: self.created_at,
            expires_at: self.expires_at,
            access_count: self.access_count,
            remaining_ms: self.expires_at.saturating_sub(now),
        }
    }
}

/// Read-only snapshot of a link taken at a specific instant
///
/// Changes to the registry after the snapshot was taken are not reflected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkView {
    token: String,
    label: Arc<str>,
    created_at: i64,
    expires_at: i64,
    access_count: u64,
    remaining_ms: i64,
}

impl LinkView {
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Creation time in epoch milliseconds
    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// Deadline in epoch milliseconds
    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    /// Successful lookups so far, including the one that produced this view
    pub fn access_count(&self) -> u64 {
        self.access_count
    }

    /// `expires_at - now` at the time the snapshot was taken
    pub fn remaining_ms(&self) -> i64 {
        self.remaining_ms
    }

    /// Remaining time rounded to the nearest minute
    pub fn remaining_minutes(&self) -> i64 {
        round_to_minutes(self.remaining_ms)
    }
}

/// Result of creating a link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedLink {
    pub token: String,
    pub label: String,
    /// Epoch milliseconds
    pub created_at: i64,
    /// Epoch milliseconds
    pub expires_at: i64,
}

impl CreatedLink {
    /// The TTL that was actually applied, in milliseconds
    pub fn ttl_ms(&self) -> i64 {
        self.expires_at - self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_expiry_boundary() {
        let record = LinkRecord::new(Arc::from("x"), 0, 60_000);

        assert!(!record.is_expired_at(59_999));
        assert!(record.is_expired_at(60_000));
        assert!(record.is_expired_at(60_001));
    }

    #[test]
    fn test_view_is_a_snapshot() {
        let mut record = LinkRecord::new(Arc::from("Acme"), 1_000, 61_000);
        record.record_access();
        let view = record.view("tok", 31_000);

        record.record_access();

        assert_eq!(view.access_count(), 1);
        assert_eq!(view.label(), "Acme");
        assert_eq!(view.remaining_ms(), 30_000);
        assert_eq!(view.token(), "tok");
    }

    #[test]
    fn test_round_to_minutes() {
        assert_eq!(round_to_minutes(0), 0);
        assert_eq!(round_to_minutes(29_999), 0);
        assert_eq!(round_to_minutes(30_000), 1);
        assert_eq!(round_to_minutes(89_999), 1);
        assert_eq!(round_to_minutes(90_000), 2);
        assert_eq!(round_to_minutes(7_200_000), 120);
    }

    #[test]
    fn test_created_link_ttl() {
        let created = CreatedLink {
            token: "t".into(),
            label: UNNAMED_LABEL.into(),
            created_at: 10,
            expires_at: 60_010,
        };
        assert_eq!(created.ttl_ms(), 60_000);
    }
}
