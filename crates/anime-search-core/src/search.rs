//! Request pipeline: membership gate, resolver, formatter.
//!
//! The resolver only runs once the gate allowed the user.

use crate::dataset::Dataset;
use crate::membership::{Access, MembershipGate};
use crate::reply::{format_anime, format_title_list, AnimeReply};
use crate::resolver::{resolve, Resolution};
use std::sync::Arc;
use tracing::info;

/// What to send back for one inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Details of the matched anime
    Anime(AnimeReply),
    /// Numeric query outside the dataset
    InvalidSelection,
    /// No title matched
    NotFound,
    /// User has to join the channel first
    JoinChannel,
}

/// Anime lookup service shared by all handlers
#[derive(Clone)]
pub struct AnimeSearch {
    dataset: Arc<Dataset>,
    gate: MembershipGate,
}

impl AnimeSearch {
    /// Create the service over a loaded dataset
    #[must_use]
    pub const fn new(dataset: Arc<Dataset>, gate: MembershipGate) -> Self {
        Self { dataset, gate }
    }

    /// The dataset being served
    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// The gate in front of every lookup
    #[must_use]
    pub const fn gate(&self) -> &MembershipGate {
        &self.gate
    }

    /// Answer a free-text query from `user_id`
    pub async fn handle_query(&self, user_id: i64, query: &str) -> Reply {
        if let Access::Blocked(_) = self.gate.check(user_id).await {
            return Reply::JoinChannel;
        }

        match resolve(&self.dataset, query) {
            Resolution::Found { record, position } => {
                info!("User {user_id} query {query:?} matched #{position} {:?}", record.title);
                Reply::Anime(format_anime(record))
            }
            Resolution::InvalidSelection(n) => {
                info!("User {user_id} selected out-of-range entry {n}");
                Reply::InvalidSelection
            }
            Resolution::NotFound => {
                info!("User {user_id} query {query:?} matched nothing");
                Reply::NotFound
            }
        }
    }

    /// Numbered title list, split into messages of at most `max_len` chars
    ///
    /// # Errors
    ///
    /// Returns [`Reply::JoinChannel`] if the user may not use the bot.
    pub async fn list_titles(&self, user_id: i64, max_len: usize) -> Result<Vec<String>, Reply> {
        if self.gate.check(user_id).await.is_allowed() {
            Ok(format_title_list(&self.dataset, max_len))
        } else {
            Err(Reply::JoinChannel)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::membership::{MembershipStatus, MockMembershipProvider, PlatformError};
    use crate::reply::MESSAGE_LIMIT;

    const DATA: &str = r#"[
        {"title": "Naruto", "image": "https://img.example/naruto.jpg"},
        {"title": "Bleach"}
    ]"#;

    fn service(mock: MockMembershipProvider) -> Result<AnimeSearch, crate::dataset::LoadError> {
        let dataset = Arc::new(Dataset::from_json_str(DATA)?);
        Ok(AnimeSearch::new(
            dataset,
            MembershipGate::new(Arc::new(mock), "@silymoona"),
        ))
    }

    fn member() -> MockMembershipProvider {
        let mut mock = MockMembershipProvider::new();
        mock.expect_check_membership()
            .returning(|_, _| Ok(MembershipStatus::Member));
        mock
    }

    #[tokio::test]
    async fn test_member_gets_anime() -> Result<(), crate::dataset::LoadError> {
        let search = service(member())?;
        let reply = search.handle_query(1, "naru").await;
        assert!(
            matches!(reply, Reply::Anime(ref a) if a.caption.contains("Naruto")),
            "unexpected reply: {reply:?}"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_member_outcomes() -> Result<(), crate::dataset::LoadError> {
        let search = service(member())?;
        assert_eq!(search.handle_query(1, "9999").await, Reply::InvalidSelection);
        assert_eq!(search.handle_query(1, "Zzzznotreal").await, Reply::NotFound);
        Ok(())
    }

    #[tokio::test]
    async fn test_blocked_user_never_reaches_resolver() -> Result<(), crate::dataset::LoadError> {
        let mut mock = MockMembershipProvider::new();
        mock.expect_check_membership()
            .times(1)
            .returning(|_, _| Ok(MembershipStatus::Other("left".to_string())));
        let search = service(mock)?;

        // "1" would resolve for a member
        assert_eq!(search.handle_query(1, "1").await, Reply::JoinChannel);
        Ok(())
    }

    #[tokio::test]
    async fn test_lookup_failure_sends_join_prompt() -> Result<(), crate::dataset::LoadError> {
        let mut mock = MockMembershipProvider::new();
        mock.expect_check_membership()
            .returning(|_, _| Err(PlatformError::RateLimit { retry_after_secs: Some(3) }));
        let search = service(mock)?;

        assert_eq!(search.handle_query(1, "Naruto").await, Reply::JoinChannel);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_titles_is_gated() -> Result<(), crate::dataset::LoadError> {
        let mut mock = MockMembershipProvider::new();
        mock.expect_check_membership()
            .returning(|_, _| Ok(MembershipStatus::Other("kicked".to_string())));
        let search = service(mock)?;

        assert_eq!(
            search.list_titles(1, MESSAGE_LIMIT).await,
            Err(Reply::JoinChannel)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_list_titles_for_member() -> Result<(), crate::dataset::LoadError> {
        let search = service(member())?;
        let parts = search.list_titles(1, MESSAGE_LIMIT).await;
        assert!(parts.is_ok_and(|p| p.len() == 1 && p[0].contains("2. Bleach")));
        Ok(())
    }
}
