use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::id::ObjectId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tweet {
    pub id: ObjectId,
    pub content: String,
    pub owner: ObjectId,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewTweet {
    pub owner: ObjectId,
    pub content: String,
}
