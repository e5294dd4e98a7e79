use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::id::ObjectId;

/// Account record owned by the user subsystem; only read here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: ObjectId,
    pub username: String,
    pub full_name: String,
    pub avatar: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Public projection attached to comments and liked videos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ObjectId,
    pub full_name: String,
    pub username: String,
    pub avatar: Option<String>,
}

impl From<&User> for Profile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            full_name: user.full_name.clone(),
            username: user.username.clone(),
            avatar: user.avatar.clone(),
        }
    }
}
