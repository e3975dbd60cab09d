//! Reaction service: emoji reactions on chat messages.

use crate::types::{Actor, EngagementError, EngagementResult};
use rally_database::{ChatMessage, MessageRepository, ReactionRepository};
use sqlx::SqlitePool;
use tracing::debug;

/// Longest accepted emoji, in bytes. Covers ZWJ sequences and skin tones.
pub const MAX_EMOJI_BYTES: usize = 32;

/// Service for adding reactions to messages
#[derive(Clone)]
pub struct ReactionService {
    messages: MessageRepository,
    reactions: ReactionRepository,
}

impl ReactionService {
    /// Create a new reaction service instance
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            messages: MessageRepository::new(pool.clone()),
            reactions: ReactionRepository::new(pool),
        }
    }

    /// React to a message with `emoji`.
    ///
    /// Reacting twice with the same emoji is a no-op. Reactions with
    /// different emoji are independent of each other. Returns the message
    /// with its current reaction map.
    pub async fn add_reaction(
        &self,
        message_id: &str,
        emoji: &str,
        actor: &Actor,
    ) -> EngagementResult<ChatMessage> {
        validate_emoji(emoji)?;

        let message = self
            .messages
            .find_by_public_id(message_id)
            .await?
            .ok_or_else(|| EngagementError::message_not_found(message_id))?;

        let added = self
            .reactions
            .add(message.id, emoji, &actor.user_id, &actor.display_name)
            .await?;

        if !added {
            debug!(message_id, emoji, user_id = %actor.user_id, "reaction already present");
        }

        self.messages
            .find_by_public_id(message_id)
            .await?
            .ok_or_else(|| EngagementError::message_not_found(message_id))
    }
}

fn validate_emoji(emoji: &str) -> EngagementResult<()> {
    if emoji.trim().is_empty() {
        return Err(EngagementError::validation("Emoji cannot be empty"));
    }

    if emoji.len() > MAX_EMOJI_BYTES {
        return Err(EngagementError::validation(format!(
            "Emoji too long (max {MAX_EMOJI_BYTES} bytes)"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MessageService;
    use rally_database::test_support::{create_test_pool, sample_event_request};
    use rally_database::EventRepository;

    struct Fixture {
        reactions: ReactionService,
        message: ChatMessage,
        _temp_dir: tempfile::TempDir,
    }

    async fn setup() -> Fixture {
        let (pool, temp_dir) = create_test_pool().await;
        let event = EventRepository::new(pool.clone())
            .create("organizer", &sample_event_request(None))
            .await
            .unwrap();
        let message = MessageService::new(pool.clone())
            .post_message(&event.public_id, &Actor::new("bob", "Bob"), "Hello")
            .await
            .unwrap();

        Fixture {
            reactions: ReactionService::new(pool),
            message,
            _temp_dir: temp_dir,
        }
    }

    #[tokio::test]
    async fn reacting_twice_with_same_emoji_is_idempotent() {
        let fixture = setup().await;
        let alice = Actor::new("alice", "Alice");

        fixture.reactions.add_reaction(&fixture.message.public_id, "👍", &alice).await.unwrap();
        let updated = fixture
            .reactions
            .add_reaction(&fixture.message.public_id, "👍", &alice)
            .await
            .unwrap();

        assert_eq!(updated.reactors("👍"), ["Alice".to_string()]);
    }

    #[tokio::test]
    async fn reactions_are_tracked_per_emoji() {
        let fixture = setup().await;
        let alice = Actor::new("alice", "Alice");

        fixture.reactions.add_reaction(&fixture.message.public_id, "👍", &alice).await.unwrap();
        let updated = fixture
            .reactions
            .add_reaction(&fixture.message.public_id, "🎉", &alice)
            .await
            .unwrap();

        assert_eq!(updated.reactions.len(), 2);
        assert_eq!(updated.reactors("👍"), ["Alice".to_string()]);
        assert_eq!(updated.reactors("🎉"), ["Alice".to_string()]);
    }

    #[tokio::test]
    async fn users_sharing_a_display_name_are_both_recorded() {
        let fixture = setup().await;

        fixture
            .reactions
            .add_reaction(&fixture.message.public_id, "😀", &Actor::new("alex-1", "Alex"))
            .await
            .unwrap();
        let updated = fixture
            .reactions
            .add_reaction(&fixture.message.public_id, "😀", &Actor::new("alex-2", "Alex"))
            .await
            .unwrap();

        assert_eq!(updated.reactors("😀"), ["Alex".to_string(), "Alex".to_string()]);
    }

    #[tokio::test]
    async fn reacting_to_unknown_message_is_not_found() {
        let fixture = setup().await;

        let err = fixture
            .reactions
            .add_reaction("missing", "👍", &Actor::new("alice", "Alice"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngagementError::MessageNotFound { .. }));
    }

    #[tokio::test]
    async fn invalid_emoji_is_rejected() {
        let fixture = setup().await;
        let alice = Actor::new("alice", "Alice");
        let too_long = "x".repeat(MAX_EMOJI_BYTES + 1);

        for emoji in ["", "  ", too_long.as_str()] {
            let err = fixture
                .reactions
                .add_reaction(&fixture.message.public_id, emoji, &alice)
                .await
                .unwrap_err();
            assert!(matches!(err, EngagementError::Validation { .. }));
        }
    }

    #[tokio::test]
    async fn concurrent_reactions_are_not_lost() {
        let fixture = setup().await;
        let message_id = fixture.message.public_id.clone();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let service = fixture.reactions.clone();
                let message_id = message_id.clone();
                tokio::spawn(async move {
                    let actor = Actor::new(format!("user-{i}"), format!("User {i}"));
                    service.add_reaction(&message_id, "🔥", &actor).await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let final_message = fixture
            .reactions
            .add_reaction(&message_id, "🔥", &Actor::new("user-0", "User 0"))
            .await
            .unwrap();
        assert_eq!(final_message.reactors("🔥").len(), 8);
    }
}
