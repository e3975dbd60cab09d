//! Chat message entity definitions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Emoji → display names of the users who reacted with it, in reaction order.
pub type ReactionMap = BTreeMap<String, Vec<String>>;

/// A message posted to an event chatroom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Database primary key, also the insertion-order tiebreaker
    pub id: i64,
    pub public_id: String,
    pub event_id: String,
    pub sender_id: String,
    /// Display name captured when the message was posted
    pub sender_name: String,
    pub content: String,
    pub created_at: String,
    pub reactions: ReactionMap,
}

/// Request for persisting a new message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMessageRequest {
    pub event_id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub content: String,
}

impl ChatMessage {
    /// Names that reacted with `emoji`, empty when nobody did.
    pub fn reactors(&self, emoji: &str) -> &[String] {
        self.reactions.get(emoji).map(Vec::as_slice).unwrap_or(&[])
    }
}
