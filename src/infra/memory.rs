use std::collections::{HashMap, HashSet};

use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::domain::comment::{Comment, NewComment};
use crate::domain::id::ObjectId;
use crate::domain::like::{Like, LikeState, LikeTarget, TargetKind};
use crate::domain::page::PageRequest;
use crate::domain::tweet::{NewTweet, Tweet};
use crate::domain::user::{Profile, User};
use crate::domain::video::{LikedVideo, Video};
use crate::infra::store::{Store, StoreError, StoreResult};

#[derive(Default)]
struct Tables {
    users: HashMap<ObjectId, User>,
    videos: HashMap<ObjectId, Video>,
    comments: HashMap<ObjectId, Comment>,
    tweets: HashMap<ObjectId, Tweet>,
    likes: Vec<Like>,
}

impl Tables {
    fn target_exists(&self, target: &LikeTarget) -> bool {
        match target.kind {
            TargetKind::Video => self.videos.contains_key(&target.id),
            TargetKind::Comment => self.comments.contains_key(&target.id),
            TargetKind::Tweet => self.tweets.contains_key(&target.id),
        }
    }

    fn drop_likes_on(&mut self, target: &LikeTarget) {
        self.likes.retain(|like| &like.target != target);
    }
}

/// Process-local store with the same referential rules as the PostgreSQL
/// schema. Every operation takes the table lock once, so toggles are atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user: User) {
        self.tables.write().await.users.insert(user.id.clone(), user);
    }

    pub async fn insert_video(&self, video: Video) {
        self.tables.write().await.videos.insert(video.id.clone(), video);
    }

    pub async fn remove_user(&self, user_id: &ObjectId) {
        self.tables.write().await.users.remove(user_id);
    }

    /// Current likes on `target`, for inspection.
    pub async fn likes_on(&self, target: &LikeTarget) -> Vec<Like> {
        self.tables
            .read()
            .await
            .likes
            .iter()
            .filter(|like| &like.target == target)
            .cloned()
            .collect()
    }

    pub async fn comment_count(&self) -> usize {
        self.tables.read().await.comments.len()
    }

    pub async fn tweet_count(&self) -> usize {
        self.tables.read().await.tweets.len()
    }
}

#[axum::async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn video_exists(&self, video_id: &ObjectId) -> StoreResult<bool> {
        Ok(self.tables.read().await.videos.contains_key(video_id))
    }

    async fn insert_comment(&self, comment: NewComment) -> StoreResult<Option<Comment>> {
        let mut tables = self.tables.write().await;
        if !tables.videos.contains_key(&comment.video) {
            return Err(StoreError::MissingReference("video"));
        }
        if !tables.users.contains_key(&comment.owner) {
            return Err(StoreError::MissingReference("user"));
        }

        let now = OffsetDateTime::now_utc();
        let created = Comment {
            id: ObjectId::generate(),
            content: comment.content,
            video: comment.video,
            owner: comment.owner,
            created_at: now,
            updated_at: now,
        };
        tables.comments.insert(created.id.clone(), created.clone());
        Ok(Some(created))
    }

    async fn find_comment(&self, comment_id: &ObjectId) -> StoreResult<Option<Comment>> {
        Ok(self.tables.read().await.comments.get(comment_id).cloned())
    }

    async fn update_comment_content(
        &self,
        comment_id: &ObjectId,
        content: &str,
    ) -> StoreResult<Option<Comment>> {
        let mut tables = self.tables.write().await;
        let updated = tables.comments.get_mut(comment_id).map(|comment| {
            comment.content = content.to_owned();
            comment.updated_at = OffsetDateTime::now_utc();
            comment.clone()
        });
        Ok(updated)
    }

    async fn delete_comment(&self, comment_id: &ObjectId) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.comments.remove(comment_id).is_none() {
            return Ok(false);
        }
        tables.drop_likes_on(&LikeTarget::comment(comment_id.clone()));
        Ok(true)
    }

    async fn comments_for_video(
        &self,
        video_id: &ObjectId,
        page: PageRequest,
    ) -> StoreResult<(Vec<Comment>, u64)> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|comment| &comment.video == video_id)
            .cloned()
            .collect();
        comments.sort_by(Comment::feed_order);

        let total = comments.len() as u64;
        Ok((page.window(comments), total))
    }

    async fn profiles(&self, user_ids: &[ObjectId]) -> StoreResult<Vec<Profile>> {
        let tables = self.tables.read().await;
        let wanted: HashSet<&ObjectId> = user_ids.iter().collect();
        Ok(wanted
            .into_iter()
            .filter_map(|id| tables.users.get(id))
            .map(Profile::from)
            .collect())
    }

    async fn likes_on_comments(&self, comment_ids: &[ObjectId]) -> StoreResult<Vec<Like>> {
        let tables = self.tables.read().await;
        let wanted: HashSet<&ObjectId> = comment_ids.iter().collect();
        Ok(tables
            .likes
            .iter()
            .filter(|like| {
                like.target.kind == TargetKind::Comment && wanted.contains(&like.target.id)
            })
            .cloned()
            .collect())
    }

    async fn toggle_like(
        &self,
        target: &LikeTarget,
        user_id: &ObjectId,
    ) -> StoreResult<LikeState> {
        let mut tables = self.tables.write().await;

        let existing = tables
            .likes
            .iter()
            .position(|like| &like.liked_by == user_id && &like.target == target);
        if let Some(index) = existing {
            tables.likes.swap_remove(index);
            return Ok(LikeState::Unliked);
        }

        if !tables.users.contains_key(user_id) {
            return Err(StoreError::MissingReference("user"));
        }
        if !tables.target_exists(target) {
            return Err(StoreError::MissingReference(target.kind.as_str()));
        }

        tables.likes.push(Like {
            id: ObjectId::generate(),
            liked_by: user_id.clone(),
            target: target.clone(),
            created_at: OffsetDateTime::now_utc(),
        });
        Ok(LikeState::Liked)
    }

    async fn liked_videos(&self, user_id: &ObjectId) -> StoreResult<Vec<LikedVideo>> {
        let tables = self.tables.read().await;
        let mut liked: Vec<&Like> = tables
            .likes
            .iter()
            .filter(|like| &like.liked_by == user_id && like.target.kind == TargetKind::Video)
            .collect();
        liked.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(liked
            .into_iter()
            .filter_map(|like| {
                let video = tables.videos.get(&like.target.id)?;
                let owner = tables.users.get(&video.owner)?;
                Some(LikedVideo::new(video, Profile::from(owner)))
            })
            .collect())
    }

    async fn insert_tweet(&self, tweet: NewTweet) -> StoreResult<Option<Tweet>> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&tweet.owner) {
            return Err(StoreError::MissingReference("user"));
        }

        let now = OffsetDateTime::now_utc();
        let created = Tweet {
            id: ObjectId::generate(),
            content: tweet.content,
            owner: tweet.owner,
            created_at: now,
            updated_at: now,
        };
        tables.tweets.insert(created.id.clone(), created.clone());
        Ok(Some(created))
    }

    async fn find_tweet(&self, tweet_id: &ObjectId) -> StoreResult<Option<Tweet>> {
        Ok(self.tables.read().await.tweets.get(tweet_id).cloned())
    }

    async fn update_tweet_content(
        &self,
        tweet_id: &ObjectId,
        content: &str,
    ) -> StoreResult<Option<Tweet>> {
        let mut tables = self.tables.write().await;
        let updated = tables.tweets.get_mut(tweet_id).map(|tweet| {
            tweet.content = content.to_owned();
            tweet.updated_at = OffsetDateTime::now_utc();
            tweet.clone()
        });
        Ok(updated)
    }

    async fn delete_tweet(&self, tweet_id: &ObjectId) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.tweets.remove(tweet_id).is_none() {
            return Ok(false);
        }
        tables.drop_likes_on(&LikeTarget::tweet(tweet_id.clone()));
        Ok(true)
    }

    async fn tweets_by_owner(
        &self,
        owner_id: &ObjectId,
        page: PageRequest,
    ) -> StoreResult<(Vec<Tweet>, u64)> {
        let tables = self.tables.read().await;
        let mut tweets: Vec<Tweet> = tables
            .tweets
            .values()
            .filter(|tweet| &tweet.owner == owner_id)
            .cloned()
            .collect();
        tweets.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = tweets.len() as u64;
        Ok((page.window(tweets), total))
    }
}
