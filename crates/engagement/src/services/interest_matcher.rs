//! Selects the users who should hear about a new event.

use crate::types::{EngagementError, EngagementResult};
use rally_database::{Event, User};
use std::collections::HashSet;

/// Users sharing at least one interest tag with `event`.
///
/// Tags are compared verbatim (case-sensitive). The result keeps the order
/// of `users` and lists each user once no matter how many tags overlap.
/// An event without a tag list cannot be matched and is a validation error;
/// an empty tag list simply matches nobody.
pub fn match_interested_users(event: &Event, users: &[User]) -> EngagementResult<Vec<User>> {
    let tags = event.tags.as_ref().ok_or_else(|| {
        EngagementError::validation(format!("Event {} has no interest tags", event.public_id))
    })?;

    let tags: HashSet<&str> = tags.iter().map(String::as_str).collect();

    Ok(users
        .iter()
        .filter(|user| user.interests.iter().any(|interest| tags.contains(interest.as_str())))
        .cloned()
        .collect())
}
