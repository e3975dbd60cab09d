//! Summary service: AI digests of an event chatroom.

use crate::providers::SummaryProvider;
use crate::types::{EngagementError, EngagementResult};
use rally_database::{ChatMessage, MessageRepository};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{info, warn};

/// Returned when the chatroom has nothing to summarize.
pub const NO_MESSAGES_SUMMARY: &str = "There are no messages to summarize.";

/// Returned whenever a summary could not be produced.
pub const SUMMARY_FALLBACK: &str = "Could not generate a summary.";

const PROMPT_PREFIX: &str = "Summarize the following chat messages:\n";

/// Service that summarizes chat history through a [`SummaryProvider`]
#[derive(Clone)]
pub struct SummaryService {
    messages: MessageRepository,
    provider: Arc<dyn SummaryProvider>,
}

impl SummaryService {
    /// Create a new summary service instance
    pub fn new(pool: SqlitePool, provider: Arc<dyn SummaryProvider>) -> Self {
        Self {
            messages: MessageRepository::new(pool),
            provider,
        }
    }

    /// Summarize an event's chatroom.
    ///
    /// Never fails: an empty chatroom yields [`NO_MESSAGES_SUMMARY`] without
    /// contacting the provider, and every error yields [`SUMMARY_FALLBACK`].
    pub async fn summarize(&self, event_id: &str) -> String {
        match self.try_summarize(event_id).await {
            Ok(summary) => summary,
            Err(err) => {
                warn!(event_id, provider = self.provider.name(), error = %err, "chat summary failed");
                SUMMARY_FALLBACK.to_string()
            }
        }
    }

    async fn try_summarize(&self, event_id: &str) -> EngagementResult<String> {
        let messages = self.messages.list_by_event(event_id).await?;
        if messages.is_empty() {
            return Ok(NO_MESSAGES_SUMMARY.to_string());
        }

        let prompt = build_prompt(&messages);
        let summary = self
            .provider
            .complete(&prompt)
            .await
            .map_err(|err| EngagementError::upstream(err.to_string()))?;

        info!(event_id, messages = messages.len(), "generated chat summary");
        Ok(summary)
    }
}

/// The prompt sent to the provider: a fixed instruction line followed by
/// one message body per line, oldest first.
pub fn build_prompt(messages: &[ChatMessage]) -> String {
    let bodies: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
    format!("{PROMPT_PREFIX}{}", bodies.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::UpstreamError;
    use crate::services::MessageService;
    use crate::types::Actor;
    use async_trait::async_trait;
    use rally_database::test_support::{create_test_pool, sample_event_request};
    use rally_database::EventRepository;
    use std::sync::Mutex;

    /// Records prompts and answers with a canned result.
    struct RecordingProvider {
        reply: Result<String, ()>,
        prompts: Mutex<Vec<String>>,
    }

    impl RecordingProvider {
        fn replying(reply: Result<&str, ()>) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.map(str::to_string),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SummaryProvider for RecordingProvider {
        fn name(&self) -> &str {
            "recording"
        }

        async fn complete(&self, prompt: &str) -> Result<String, UpstreamError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply
                .clone()
                .map_err(|_| UpstreamError::InvalidResponse("boom".to_string()))
        }
    }

    async fn setup(
        provider: Arc<RecordingProvider>,
    ) -> (SummaryService, MessageService, String, tempfile::TempDir) {
        let (pool, temp_dir) = create_test_pool().await;
        let event = EventRepository::new(pool.clone())
            .create("organizer", &sample_event_request(None))
            .await
            .unwrap();
        (
            SummaryService::new(pool.clone(), provider),
            MessageService::new(pool),
            event.public_id,
            temp_dir,
        )
    }

    #[tokio::test]
    async fn empty_chatroom_does_not_call_provider() {
        let provider = RecordingProvider::replying(Ok("unused"));
        let (service, _messages, event_id, _temp_dir) = setup(provider.clone()).await;

        assert_eq!(service.summarize(&event_id).await, NO_MESSAGES_SUMMARY);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn summary_prompt_lists_messages_in_order() {
        let provider = RecordingProvider::replying(Ok("They said hi."));
        let (service, messages, event_id, _temp_dir) = setup(provider.clone()).await;
        let bob = Actor::new("bob", "Bob");

        messages.post_message(&event_id, &bob, "Hello").await.unwrap();
        messages.post_message(&event_id, &bob, "How are you?").await.unwrap();

        assert_eq!(service.summarize(&event_id).await, "They said hi.");
        let prompts = provider.prompts.lock().unwrap().clone();
        assert_eq!(
            prompts,
            vec!["Summarize the following chat messages:\nHello\nHow are you?".to_string()]
        );
    }

    #[tokio::test]
    async fn provider_failure_yields_fallback() {
        let provider = RecordingProvider::replying(Err(()));
        let (service, messages, event_id, _temp_dir) = setup(provider.clone()).await;

        messages
            .post_message(&event_id, &Actor::new("bob", "Bob"), "Hello")
            .await
            .unwrap();

        assert_eq!(service.summarize(&event_id).await, SUMMARY_FALLBACK);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn store_failure_yields_fallback() {
        let provider = RecordingProvider::replying(Ok("unused"));
        let (pool, _temp_dir) = create_test_pool().await;
        let service = SummaryService::new(pool.clone(), provider.clone());
        pool.close().await;

        assert_eq!(service.summarize("any").await, SUMMARY_FALLBACK);
        assert_eq!(provider.calls(), 0);
    }
}
