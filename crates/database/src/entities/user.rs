//! User entity definitions

use serde::{Deserialize, Serialize};

/// Directory entry for a user who can chat and receive event announcements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub public_id: String,
    pub display_name: String,
    pub email: String,
    /// Free-text interest tags, compared verbatim against event tags
    pub interests: Vec<String>,
    pub created_at: String,
}

/// Request for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Identifier issued by the authentication service; generated when absent
    pub public_id: Option<String>,
    pub display_name: String,
    pub email: String,
    #[serde(default)]
    pub interests: Vec<String>,
}

impl User {
    /// Whether the user lists `tag` among their interests (exact match).
    pub fn is_interested_in(&self, tag: &str) -> bool {
        self.interests.iter().any(|interest| interest == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interest_lookup_is_case_sensitive() {
        let user = User {
            id: 1,
            public_id: "u1".to_string(),
            display_name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            interests: vec!["AI".to_string()],
            created_at: String::new(),
        };

        assert!(user.is_interested_in("AI"));
        assert!(!user.is_interested_in("ai"));
    }
}
