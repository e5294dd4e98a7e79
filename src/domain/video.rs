use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::id::ObjectId;
use crate::domain::user::Profile;

/// Video record owned by the upload subsystem; only read here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: ObjectId,
    pub title: String,
    pub thumbnail: Option<String>,
    pub owner: ObjectId,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct LikedVideo {
    pub id: ObjectId,
    pub title: String,
    pub thumbnail: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub owner: Profile,
}

impl LikedVideo {
    pub fn new(video: &Video, owner: Profile) -> Self {
        Self {
            id: video.id.clone(),
            title: video.title.clone(),
            thumbnail: video.thumbnail.clone(),
            created_at: video.created_at,
            owner,
        }
    }
}
