//! Password reset tokens.

use chrono::{DateTime, Utc};

use autoparts_core::{ResetTokenId, UserId};

/// A password reset token row.
#[derive(Debug, Clone)]
pub struct PasswordResetToken {
    pub id: ResetTokenId,
    pub token: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

impl PasswordResetToken {
    /// A token is usable until `expires_at` (exclusive) and only once.
    #[must_use]
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        !self.used && now < self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn token(used: bool, expires_at: DateTime<Utc>) -> PasswordResetToken {
        PasswordResetToken {
            id: ResetTokenId::new(1),
            token: "ab".repeat(32),
            user_id: UserId::new(1),
            expires_at,
            used,
            created_at: expires_at - Duration::hours(1),
        }
    }

    #[test]
    fn test_fresh_token_is_usable() {
        let now = Utc::now();
        assert!(token(false, now + Duration::minutes(30)).is_usable_at(now));
    }

    #[test]
    fn test_used_token_is_not_usable() {
        let now = Utc::now();
        assert!(!token(true, now + Duration::minutes(30)).is_usable_at(now));
    }

    #[test]
    fn test_token_expires_at_boundary() {
        let now = Utc::now();
        assert!(!token(false, now).is_usable_at(now));
        assert!(!token(false, now - Duration::seconds(1)).is_usable_at(now));
    }
}
