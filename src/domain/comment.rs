use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use time::OffsetDateTime;

use crate::domain::id::ObjectId;
use crate::domain::user::Profile;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: ObjectId,
    pub content: String,
    pub video: ObjectId,
    pub owner: ObjectId,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Comment {
    /// Feed order: oldest first, id breaks ties between equal timestamps.
    pub fn feed_order(a: &Comment, b: &Comment) -> Ordering {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    }
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub video: ObjectId,
    pub owner: ObjectId,
    pub content: String,
}

/// A comment as seen by one viewer in a video's comment feed.
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub commenter: Option<Profile>,
    pub likes_count: u64,
    pub is_liked: bool,
}
