//! Message service: the per-event chat history.

use crate::types::{Actor, EngagementError, EngagementResult};
use rally_database::{ChatMessage, CreateMessageRequest, EventRepository, MessageRepository};
use sqlx::SqlitePool;
use tracing::debug;

/// Longest accepted message body, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 10_000;

/// Service for posting and listing chatroom messages
#[derive(Clone)]
pub struct MessageService {
    events: EventRepository,
    messages: MessageRepository,
}

impl MessageService {
    /// Create a new message service instance
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            events: EventRepository::new(pool.clone()),
            messages: MessageRepository::new(pool),
        }
    }

    /// Append a message to an event's chatroom.
    ///
    /// The body is stored exactly as sent; it only has to contain something
    /// other than whitespace.
    pub async fn post_message(
        &self,
        event_id: &str,
        actor: &Actor,
        text: &str,
    ) -> EngagementResult<ChatMessage> {
        validate_message_text(text)?;
        self.ensure_event(event_id).await?;

        let message = self
            .messages
            .create(&CreateMessageRequest {
                event_id: event_id.to_string(),
                sender_id: actor.user_id.clone(),
                sender_name: actor.display_name.clone(),
                content: text.to_string(),
            })
            .await?;

        Ok(message)
    }

    /// All messages of an event, oldest first
    pub async fn list_messages(&self, event_id: &str) -> EngagementResult<Vec<ChatMessage>> {
        self.ensure_event(event_id).await?;
        let messages = self.messages.list_by_event(event_id).await?;
        debug!(event_id, count = messages.len(), "listed messages");
        Ok(messages)
    }

    /// Messages posted after `cursor_message_id`, for polling clients
    pub async fn list_messages_after(
        &self,
        event_id: &str,
        cursor_message_id: &str,
    ) -> EngagementResult<Vec<ChatMessage>> {
        self.ensure_event(event_id).await?;

        let cursor = self
            .messages
            .find_by_public_id(cursor_message_id)
            .await?
            .filter(|message| message.event_id == event_id)
            .ok_or_else(|| EngagementError::message_not_found(cursor_message_id))?;

        Ok(self.messages.list_after(event_id, &cursor).await?)
    }

    async fn ensure_event(&self, event_id: &str) -> EngagementResult<()> {
        if self.events.exists(event_id).await? {
            Ok(())
        } else {
            Err(EngagementError::event_not_found(event_id))
        }
    }
}

fn validate_message_text(text: &str) -> EngagementResult<()> {
    if text.trim().is_empty() {
        return Err(EngagementError::validation("Message cannot be empty"));
    }

    if text.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(EngagementError::validation(format!(
            "Message too long (max {MAX_MESSAGE_LENGTH} characters)"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rally_database::test_support::{create_test_pool, sample_event_request};

    async fn setup() -> (MessageService, String, tempfile::TempDir) {
        let (pool, temp_dir) = create_test_pool().await;
        let event = EventRepository::new(pool.clone())
            .create("organizer", &sample_event_request(None))
            .await
            .unwrap();
        (MessageService::new(pool), event.public_id, temp_dir)
    }

    fn bob() -> Actor {
        Actor::new("user-bob", "Bob")
    }

    #[tokio::test]
    async fn post_message_captures_sender_and_starts_without_reactions() {
        let (service, event_id, _temp_dir) = setup().await;

        let message = service.post_message(&event_id, &bob(), "Hello").await.unwrap();

        assert_eq!(message.sender_id, "user-bob");
        assert_eq!(message.sender_name, "Bob");
        assert_eq!(message.content, "Hello");
        assert!(message.reactions.is_empty());
    }

    #[tokio::test]
    async fn post_message_keeps_surrounding_whitespace() {
        let (service, event_id, _temp_dir) = setup().await;

        let message = service.post_message(&event_id, &bob(), "  spaced  ").await.unwrap();
        assert_eq!(message.content, "  spaced  ");
    }

    #[tokio::test]
    async fn post_message_rejects_blank_text() {
        let (service, event_id, _temp_dir) = setup().await;

        for text in ["", "   ", "\n\t"] {
            let err = service.post_message(&event_id, &bob(), text).await.unwrap_err();
            assert!(matches!(err, EngagementError::Validation { .. }), "{text:?}");
        }
        assert!(service.list_messages(&event_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn post_message_enforces_length_limit_in_characters() {
        let (service, event_id, _temp_dir) = setup().await;

        let at_limit = "é".repeat(MAX_MESSAGE_LENGTH);
        assert!(service.post_message(&event_id, &bob(), &at_limit).await.is_ok());

        let over_limit = "a".repeat(MAX_MESSAGE_LENGTH + 1);
        let err = service.post_message(&event_id, &bob(), &over_limit).await.unwrap_err();
        assert!(matches!(err, EngagementError::Validation { .. }));
    }

    #[tokio::test]
    async fn post_message_to_unknown_event_is_not_found() {
        let (service, _event_id, _temp_dir) = setup().await;

        let err = service.post_message("missing", &bob(), "Hello").await.unwrap_err();
        assert!(matches!(err, EngagementError::EventNotFound { .. }));
    }

    #[tokio::test]
    async fn list_messages_preserves_posting_order() {
        let (service, event_id, _temp_dir) = setup().await;

        let texts: Vec<String> = (0..20).map(|i| format!("message {i}")).collect();
        for text in &texts {
            service.post_message(&event_id, &bob(), text).await.unwrap();
        }

        let listed = service.list_messages(&event_id).await.unwrap();
        let contents: Vec<String> = listed.iter().map(|m| m.content.clone()).collect();
        assert_eq!(contents, texts);
        assert!(listed.windows(2).all(|pair| pair[0].created_at <= pair[1].created_at));
    }

    #[tokio::test]
    async fn list_messages_after_returns_only_newer_messages() {
        let (service, event_id, _temp_dir) = setup().await;

        let first = service.post_message(&event_id, &bob(), "one").await.unwrap();
        let second = service.post_message(&event_id, &bob(), "two").await.unwrap();
        service.post_message(&event_id, &bob(), "three").await.unwrap();

        let after_first = service.list_messages_after(&event_id, &first.public_id).await.unwrap();
        let contents: Vec<&str> = after_first.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["two", "three"]);

        let after_second = service.list_messages_after(&event_id, &second.public_id).await.unwrap();
        assert_eq!(after_second.len(), 1);
    }

    #[tokio::test]
    async fn list_messages_after_unknown_cursor_is_not_found() {
        let (service, event_id, _temp_dir) = setup().await;

        let err = service.list_messages_after(&event_id, "nope").await.unwrap_err();
        assert!(matches!(err, EngagementError::MessageNotFound { .. }));
    }
}
