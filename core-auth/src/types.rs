use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// OAuth 2.0 access token.
///
/// Holds the bearer value and, when known, the instant it stops being
/// accepted by the API.
///
/// # Security
///
/// Tokens should never be logged. The `Debug` implementation redacts the
/// bearer value.
///
/// # Examples
///
/// ```
/// use core_auth::AccessToken;
/// use chrono::{Duration, Utc};
///
/// let now = Utc::now();
/// let token = AccessToken::new("ya29.a0...", Some(now + Duration::hours(1)));
///
/// assert!(!token.is_expired_at(now));
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Create a token with an optional expiration instant
    pub fn new(value: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// Create a token from an `expires_in` lifetime relative to `issued_at`
    ///
    /// Returns `None` for a negative lifetime or one that overflows the
    /// calendar.
    pub fn from_expires_in(
        value: impl Into<String>,
        expires_in: i64,
        issued_at: DateTime<Utc>,
    ) -> Option<Self> {
        if expires_in < 0 {
            return None;
        }
        let expires_at = issued_at.checked_add_signed(Duration::try_seconds(expires_in)?)?;
        Some(Self::new(value, Some(expires_at)))
    }

    /// The bearer value sent in the `Authorization` header
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// A token is expired when its expiration is unknown or not after `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |expires_at| expires_at <= now)
    }

    /// Like [`is_expired_at`](Self::is_expired_at) but treats tokens expiring
    /// within `margin` as already expired.
    pub fn expires_within(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        self.is_expired_at(now + margin)
    }

    /// Time remaining until expiration, `None` if expired or unknown
    pub fn time_until_expiry(&self, now: DateTime<Utc>) -> Option<Duration> {
        match self.expires_at {
            Some(expires_at) if expires_at > now => Some(expires_at - now),
            _ => None,
        }
    }
}

// Custom Debug implementation to avoid logging tokens
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Client secret and refresh token of an `authorized_user` secret file.
#[derive(Clone, Deserialize)]
pub struct AuthorizedUserSecret {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    /// Token endpoint override carried by some secret files
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl fmt::Debug for AuthorizedUserSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizedUserSecret")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_expiry() {
        let now = Utc::now();

        let fresh = AccessToken::new("a", Some(now + Duration::minutes(10)));
        assert!(!fresh.is_expired_at(now));
        assert!(fresh.expires_within(now, Duration::minutes(15)));

        let stale = AccessToken::new("b", Some(now - Duration::seconds(1)));
        assert!(stale.is_expired_at(now));

        let boundary = AccessToken::new("c", Some(now));
        assert!(boundary.is_expired_at(now));
    }

    #[test]
    fn test_token_without_expiration_is_expired() {
        let token = AccessToken::new("opaque", None);
        assert!(token.is_expired_at(Utc::now()));
        assert!(token.time_until_expiry(Utc::now()).is_none());
    }

    #[test]
    fn test_from_expires_in() {
        let issued_at = Utc::now();
        let token = AccessToken::from_expires_in("ya29", 3600, issued_at).unwrap();

        assert_eq!(token.expires_at(), Some(issued_at + Duration::seconds(3600)));
        assert_eq!(
            token.time_until_expiry(issued_at),
            Some(Duration::seconds(3600))
        );
    }

    #[test]
    fn test_from_expires_in_rejects_out_of_range_lifetimes() {
        let issued_at = Utc::now();

        assert!(AccessToken::from_expires_in("ya29", -1, issued_at).is_none());
        assert!(AccessToken::from_expires_in("ya29", i64::MAX, issued_at).is_none());
        // Representable as a duration but past the last representable instant
        assert!(AccessToken::from_expires_in("ya29", i64::MAX / 1_000 - 1, issued_at).is_none());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let token = AccessToken::new("ya29.very-secret", None);
        let rendered = format!("{:?}", token);
        assert!(!rendered.contains("very-secret"));
        assert!(rendered.contains("[REDACTED]"));

        let secret: AuthorizedUserSecret = serde_json::from_str(
            r#"{"client_id":"cid","client_secret":"shh","refresh_token":"1//rt"}"#,
        )
        .unwrap();
        let rendered = format!("{:?}", secret);
        assert!(rendered.contains("cid"));
        assert!(!rendered.contains("shh"));
        assert!(!rendered.contains("1//rt"));
    }
}
