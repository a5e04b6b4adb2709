//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A shortened URL link with metadata.
///
/// Represents the mapping between a short code and a destination URL.
/// A link with `expires_at` unset never expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub id: i64,
    pub code: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        code: String,
        long_url: String,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            code,
            long_url,
            created_at,
            expires_at,
        }
    }

    /// Returns true if the link can still be resolved at `now`.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|e| e > now)
    }

    /// Returns true if the link has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        !self.is_live_at(Utc::now())
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub code: String,
    pub long_url: String,
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn link_expiring_at(expires_at: Option<DateTime<Utc>>) -> Link {
        Link::new(
            1,
            "abc12345".to_string(),
            "https://example.com".to_string(),
            Utc::now(),
            expires_at,
        )
    }

    #[test]
    fn test_link_creation() {
        let now = Utc::now();
        let link = Link::new(
            1,
            "abc12345".to_string(),
            "https://example.com".to_string(),
            now,
            None,
        );

        assert_eq!(link.id, 1);
        assert_eq!(link.code, "abc12345");
        assert_eq!(link.long_url, "https://example.com");
        assert_eq!(link.created_at, now);
        assert!(!link.is_expired());
    }

    #[test]
    fn test_link_without_expiry_is_always_live() {
        let link = link_expiring_at(None);
        assert!(link.is_live_at(Utc::now() + Duration::days(3650)));
    }

    #[test]
    fn test_link_is_expired() {
        let link = link_expiring_at(Some(Utc::now() - Duration::seconds(1)));
        assert!(link.is_expired());
    }

    #[test]
    fn test_link_with_future_expiry_is_live() {
        let link = link_expiring_at(Some(Utc::now() + Duration::hours(1)));
        assert!(!link.is_expired());
    }

    #[test]
    fn test_link_expiring_exactly_now_is_not_live() {
        let now = Utc::now();
        let link = link_expiring_at(Some(now));
        assert!(!link.is_live_at(now));
    }
}
