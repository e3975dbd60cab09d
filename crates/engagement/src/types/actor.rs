//! Identity of the user performing an operation.

use serde::{Deserialize, Serialize};

/// The authenticated caller.
///
/// `user_id` is the stable identifier used for ownership and reaction
/// de-duplication; `display_name` is only shown to other users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: String,
    pub display_name: String,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
        }
    }
}
