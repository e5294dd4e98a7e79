use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

use crate::domain::id::ObjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Video,
    Comment,
    Tweet,
}

impl TargetKind {
    pub fn from_name(value: &str) -> Option<Self> {
        match value {
            "video" => Some(Self::Video),
            "comment" => Some(Self::Comment),
            "tweet" => Some(Self::Tweet),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Comment => "comment",
            Self::Tweet => "tweet",
        }
    }

    /// Reference column holding this kind of target in the `likes` table.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Video => "video_id",
            Self::Comment => "comment_id",
            Self::Tweet => "tweet_id",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LikeTarget {
    pub kind: TargetKind,
    pub id: ObjectId,
}

impl LikeTarget {
    pub fn new(kind: TargetKind, id: ObjectId) -> Self {
        Self { kind, id }
    }

    pub fn video(id: ObjectId) -> Self {
        Self::new(TargetKind::Video, id)
    }

    pub fn comment(id: ObjectId) -> Self {
        Self::new(TargetKind::Comment, id)
    }

    pub fn tweet(id: ObjectId) -> Self {
        Self::new(TargetKind::Tweet, id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    pub id: ObjectId,
    pub liked_by: ObjectId,
    pub target: LikeTarget,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Resulting state of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeState {
    Liked,
    Unliked,
}

impl LikeState {
    pub fn is_liked(&self) -> bool {
        matches!(self, Self::Liked)
    }
}
