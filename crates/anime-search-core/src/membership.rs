//! Channel membership gate
//!
//! Only members and administrators of the gating channel may use the bot.
//! Lookups that fail are treated as "not a member" so that a platform outage
//! never opens the bot to everyone.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Errors returned by the messaging platform during a membership lookup
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Error during network communication
    #[error("Network error: {0}")]
    Network(String),
    /// Error returned by the platform API
    #[error("API error: {0}")]
    Api(String),
    /// Rate limit exceeded, optionally with a wait time
    #[error("Rate limit exceeded (retry after: {retry_after_secs:?}s)")]
    RateLimit {
        /// Retry-After duration in seconds, if provided by the platform
        retry_after_secs: Option<u64>,
    },
    /// The configured channel does not exist or the bot cannot see it
    #[error("Invalid channel: {0}")]
    InvalidChannel(String),
}

/// A user's relationship to the gating channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipStatus {
    /// Regular channel member
    Member,
    /// Channel administrator
    Administrator,
    /// Anything else (owner, restricted, left, banned), with the raw status name
    Other(String),
}

impl MembershipStatus {
    /// Returns true if this status grants access to the bot
    #[must_use]
    pub const fn grants_access(&self) -> bool {
        matches!(self, Self::Member | Self::Administrator)
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Member => f.write_str("member"),
            Self::Administrator => f.write_str("administrator"),
            Self::Other(status) => f.write_str(status),
        }
    }
}

/// Why a user was turned away
#[derive(Debug)]
pub enum BlockReason {
    /// The lookup succeeded but the status does not grant access
    NotMember(MembershipStatus),
    /// The lookup itself failed
    LookupFailed(PlatformError),
}

/// Outcome of the membership gate
#[derive(Debug)]
pub enum Access {
    /// User may proceed to the resolver
    Allowed,
    /// User must join the channel first
    Blocked(BlockReason),
}

impl Access {
    /// Returns true if the user may proceed
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Source of channel membership information
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipProvider: Send + Sync {
    /// Look up the membership status of `user_id` in `channel_id`
    async fn check_membership(
        &self,
        channel_id: &str,
        user_id: i64,
    ) -> Result<MembershipStatus, PlatformError>;
}

/// Applies the access policy on top of a [`MembershipProvider`]
#[derive(Clone)]
pub struct MembershipGate {
    provider: Arc<dyn MembershipProvider>,
    channel_id: String,
}

impl MembershipGate {
    /// Create a gate for the given channel
    #[must_use]
    pub fn new(provider: Arc<dyn MembershipProvider>, channel_id: impl Into<String>) -> Self {
        Self {
            provider,
            channel_id: channel_id.into(),
        }
    }

    /// The channel users must belong to
    #[must_use]
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// Classify a user as allowed or blocked
    ///
    /// Lookup errors are logged and resolve to [`Access::Blocked`].
    pub async fn check(&self, user_id: i64) -> Access {
        match self
            .provider
            .check_membership(&self.channel_id, user_id)
            .await
        {
            Ok(status) if status.grants_access() => {
                debug!("User {user_id} is {status} of {}", self.channel_id);
                Access::Allowed
            }
            Ok(status) => {
                info!(
                    "User {user_id} is not a member of {} (status: {status})",
                    self.channel_id
                );
                Access::Blocked(BlockReason::NotMember(status))
            }
            Err(e) => {
                error!("Error checking channel membership for user {user_id}: {e}");
                Access::Blocked(BlockReason::LookupFailed(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    fn gate_with(mock: MockMembershipProvider) -> MembershipGate {
        MembershipGate::new(Arc::new(mock), "@silymoona")
    }

    #[tokio::test]
    async fn test_member_is_allowed() {
        let mut mock = MockMembershipProvider::new();
        mock.expect_check_membership()
            .with(eq("@silymoona"), eq(42))
            .times(1)
            .returning(|_, _| Ok(MembershipStatus::Member));

        assert!(gate_with(mock).check(42).await.is_allowed());
    }

    #[tokio::test]
    async fn test_administrator_is_allowed() {
        let mut mock = MockMembershipProvider::new();
        mock.expect_check_membership()
            .returning(|_, _| Ok(MembershipStatus::Administrator));

        assert!(gate_with(mock).check(7).await.is_allowed());
    }

    #[tokio::test]
    async fn test_other_statuses_are_blocked() {
        for raw in ["owner", "left", "kicked", "restricted"] {
            let mut mock = MockMembershipProvider::new();
            mock.expect_check_membership()
                .returning(move |_, _| Ok(MembershipStatus::Other(raw.to_string())));

            let access = gate_with(mock).check(1).await;
            assert!(
                matches!(access, Access::Blocked(BlockReason::NotMember(MembershipStatus::Other(ref s))) if s == raw),
                "status {raw} should be blocked"
            );
        }
    }

    #[tokio::test]
    async fn test_lookup_error_fails_closed() {
        let mut mock = MockMembershipProvider::new();
        mock.expect_check_membership()
            .returning(|_, _| Err(PlatformError::Network("connection reset".to_string())));

        let access = gate_with(mock).check(1).await;
        assert!(matches!(
            access,
            Access::Blocked(BlockReason::LookupFailed(PlatformError::Network(_)))
        ));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(MembershipStatus::Member.to_string(), "member");
        assert_eq!(MembershipStatus::Administrator.to_string(), "administrator");
        assert_eq!(MembershipStatus::Other("left".into()).to_string(), "left");
    }
}
