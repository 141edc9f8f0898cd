use chrono::{DateTime, Duration, Utc};

use crate::error::ProxyError;

/// Seconds shaved off the declared lifetime so a token is never sent in its
/// final minutes.
pub const EXPIRY_SAFETY_MARGIN_SECS: i64 = 300;

/// Bearer token handed to callers.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix, safe for logs.
    pub fn redacted(&self) -> String {
        let prefix: String = self.0.chars().take(8).collect();
        format!("{}...", prefix)
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AccessToken").field(&self.redacted()).finish()
    }
}

/// The cached credential. Replaced wholesale on every successful refresh.
#[derive(Debug, Clone)]
pub struct TokenState {
    pub access_token: AccessToken,
    pub expires_at: DateTime<Utc>,
}

impl TokenState {
    /// `expires_at = issued_at + lifetime - 300s`. Lifetimes of 300s or less
    /// produce a state that is already expired. A lifetime whose expiry does
    /// not fit in a timestamp is rejected as a malformed token response.
    pub fn issued(
        access_token: AccessToken,
        issued_at: DateTime<Utc>,
        expires_in: i64,
    ) -> Result<Self, ProxyError> {
        let expires_at = expires_in
            .checked_sub(EXPIRY_SAFETY_MARGIN_SECS)
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
            .ok_or_else(|| ProxyError::UpstreamAuth {
                status: None,
                message: format!(
                    "token response parsing failed: expires_in {} is out of range",
                    expires_in
                ),
                body: String::new(),
            })?;

        Ok(Self {
            access_token,
            expires_at,
        })
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_expiry_subtracts_margin() {
        let issued = Utc.with_ymd_and_hms(2025, 9, 12, 12, 0, 0).unwrap();
        let state = TokenState::issued(AccessToken::new("abc"), issued, 3600).unwrap();
        assert_eq!(state.expires_at, issued + Duration::seconds(3300));
        assert!(state.is_valid_at(issued + Duration::seconds(3299)));
        assert!(!state.is_valid_at(issued + Duration::seconds(3300)));
    }

    #[test]
    fn test_short_lifetime_is_born_expired() {
        let issued = Utc.with_ymd_and_hms(2025, 9, 12, 12, 0, 0).unwrap();
        let state = TokenState::issued(AccessToken::new("abc"), issued, 300).unwrap();
        assert!(!state.is_valid_at(issued));
    }

    #[test]
    fn test_out_of_range_lifetime_is_rejected() {
        let issued = Utc.with_ymd_and_hms(2025, 9, 12, 12, 0, 0).unwrap();
        for expires_in in [10_000_000_000_000, i64::MAX, i64::MIN] {
            let err = TokenState::issued(AccessToken::new("abc"), issued, expires_in).unwrap_err();
            assert!(matches!(err, ProxyError::UpstreamAuth { status: None, .. }));
            assert!(err.to_string().contains("token response parsing failed"));
        }
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let token = AccessToken::new("supersecretvalue123");
        let rendered = format!("{:?}", token);
        assert!(!rendered.contains("supersecretvalue123"));
        assert!(rendered.contains("supersec"));
    }
}
