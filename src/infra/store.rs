use std::sync::Arc;

use thiserror::Error;

use crate::domain::comment::{Comment, NewComment};
use crate::domain::id::ObjectId;
use crate::domain::like::{Like, LikeState, LikeTarget};
use crate::domain::page::PageRequest;
use crate::domain::tweet::{NewTweet, Tweet};
use crate::domain::user::Profile;
use crate::domain::video::LikedVideo;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A write referenced a record that does not exist.
    #[error("{0} not found")]
    MissingReference(&'static str),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub type SharedStore = Arc<dyn Store>;

/// Persistence for the records this service owns, plus the reads it needs
/// from the user and video tables.
#[axum::async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> StoreResult<()>;

    async fn video_exists(&self, video_id: &ObjectId) -> StoreResult<bool>;

    async fn insert_comment(&self, comment: NewComment) -> StoreResult<Option<Comment>>;

    async fn find_comment(&self, comment_id: &ObjectId) -> StoreResult<Option<Comment>>;

    async fn update_comment_content(
        &self,
        comment_id: &ObjectId,
        content: &str,
    ) -> StoreResult<Option<Comment>>;

    /// Removes the comment and every like that references it.
    async fn delete_comment(&self, comment_id: &ObjectId) -> StoreResult<bool>;

    /// One page of a video's comments in feed order, with the total count of
    /// comments on the video.
    async fn comments_for_video(
        &self,
        video_id: &ObjectId,
        page: PageRequest,
    ) -> StoreResult<(Vec<Comment>, u64)>;

    async fn profiles(&self, user_ids: &[ObjectId]) -> StoreResult<Vec<Profile>>;

    async fn likes_on_comments(&self, comment_ids: &[ObjectId]) -> StoreResult<Vec<Like>>;

    /// Flips the like of `user_id` on `target`. Atomic per (user, target):
    /// concurrent toggles never leave more than one like behind.
    async fn toggle_like(&self, target: &LikeTarget, user_id: &ObjectId)
        -> StoreResult<LikeState>;

    /// Videos liked by `user_id`, most recently liked first.
    async fn liked_videos(&self, user_id: &ObjectId) -> StoreResult<Vec<LikedVideo>>;

    async fn insert_tweet(&self, tweet: NewTweet) -> StoreResult<Option<Tweet>>;

    async fn find_tweet(&self, tweet_id: &ObjectId) -> StoreResult<Option<Tweet>>;

    async fn update_tweet_content(
        &self,
        tweet_id: &ObjectId,
        content: &str,
    ) -> StoreResult<Option<Tweet>>;

    /// Removes the tweet and every like that references it.
    async fn delete_tweet(&self, tweet_id: &ObjectId) -> StoreResult<bool>;

    /// One page of a user's tweets, newest first, with the user's total.
    async fn tweets_by_owner(
        &self,
        owner_id: &ObjectId,
        page: PageRequest,
    ) -> StoreResult<(Vec<Tweet>, u64)>;
}
