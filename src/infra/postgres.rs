use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::domain::comment::{Comment, NewComment};
use crate::domain::id::ObjectId;
use crate::domain::like::{Like, LikeState, LikeTarget};
use crate::domain::page::PageRequest;
use crate::domain::tweet::{NewTweet, Tweet};
use crate::domain::user::Profile;
use crate::domain::video::LikedVideo;
use crate::infra::db::Db;
use crate::infra::store::{Store, StoreError, StoreResult};

const FOREIGN_KEY_VIOLATION: &str = "23503";

const COMMENT_COLUMNS: &str = "id, content, video_id, owner_id, created_at, updated_at";
const TWEET_COLUMNS: &str = "id, content, owner_id, created_at, updated_at";

#[derive(Clone)]
pub struct PgStore {
    db: Db,
}

impl PgStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[axum::async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(self.db.pool()).await?;
        Ok(())
    }

    async fn video_exists(&self, video_id: &ObjectId) -> StoreResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM videos WHERE id = $1)")
            .bind(video_id)
            .fetch_one(self.db.pool())
            .await?;
        Ok(exists)
    }

    async fn insert_comment(&self, comment: NewComment) -> StoreResult<Option<Comment>> {
        let sql = format!(
            "INSERT INTO comments (id, content, video_id, owner_id) VALUES ($1, $2, $3, $4) \
             RETURNING {}",
            COMMENT_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(ObjectId::generate())
            .bind(comment.content)
            .bind(comment.video)
            .bind(comment.owner)
            .fetch_optional(self.db.pool())
            .await
            .map_err(map_write_error)?;

        Ok(row.as_ref().map(comment_from_row))
    }

    async fn find_comment(&self, comment_id: &ObjectId) -> StoreResult<Option<Comment>> {
        let sql = format!("SELECT {} FROM comments WHERE id = $1", COMMENT_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(comment_id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.as_ref().map(comment_from_row))
    }

    async fn update_comment_content(
        &self,
        comment_id: &ObjectId,
        content: &str,
    ) -> StoreResult<Option<Comment>> {
        let sql = format!(
            "UPDATE comments SET content = $2, updated_at = now() WHERE id = $1 RETURNING {}",
            COMMENT_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(comment_id)
            .bind(content)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.as_ref().map(comment_from_row))
    }

    async fn delete_comment(&self, comment_id: &ObjectId) -> StoreResult<bool> {
        // likes go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn comments_for_video(
        &self,
        video_id: &ObjectId,
        page: PageRequest,
    ) -> StoreResult<(Vec<Comment>, u64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE video_id = $1")
            .bind(video_id)
            .fetch_one(self.db.pool())
            .await?;

        let sql = format!(
            "SELECT {} FROM comments \
             WHERE video_id = $1 \
             ORDER BY created_at ASC, id ASC \
             LIMIT $2 OFFSET $3",
            COMMENT_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(video_id)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(self.db.pool())
            .await?;

        let comments = rows.iter().map(comment_from_row).collect();
        Ok((comments, total.max(0) as u64))
    }

    async fn profiles(&self, user_ids: &[ObjectId]) -> StoreResult<Vec<Profile>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(
            "SELECT id, full_name, username, avatar FROM users WHERE id = ANY($1)",
        )
        .bind(to_text_array(user_ids))
        .fetch_all(self.db.pool())
        .await?;

        let mut profiles = Vec::with_capacity(rows.len());
        for row in rows {
            profiles.push(Profile {
                id: row.get("id"),
                full_name: row.get("full_name"),
                username: row.get("username"),
                avatar: row.get("avatar"),
            });
        }

        Ok(profiles)
    }

    async fn likes_on_comments(&self, comment_ids: &[ObjectId]) -> StoreResult<Vec<Like>> {
        if comment_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(
            "SELECT id, liked_by, video_id, comment_id, tweet_id, created_at \
             FROM likes WHERE comment_id = ANY($1)",
        )
        .bind(to_text_array(comment_ids))
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(like_from_row).collect()
    }

    async fn toggle_like(
        &self,
        target: &LikeTarget,
        user_id: &ObjectId,
    ) -> StoreResult<LikeState> {
        let mut tx = self.db.pool().begin().await?;

        // Serializes toggles on the same (user, target) until commit.
        let lock_key = format!("like:{}:{}:{}", user_id, target.kind, target.id);
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&lock_key)
            .execute(&mut *tx)
            .await?;

        let column = target.kind.column();
        let delete_sql = format!("DELETE FROM likes WHERE liked_by = $1 AND {} = $2", column);
        let deleted = sqlx::query(&delete_sql)
            .bind(user_id)
            .bind(&target.id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() > 0 {
            tx.commit().await?;
            return Ok(LikeState::Unliked);
        }

        let insert_sql = format!(
            "INSERT INTO likes (id, liked_by, {}) VALUES ($1, $2, $3) ON CONFLICT DO NOTHING",
            column
        );
        sqlx::query(&insert_sql)
            .bind(ObjectId::generate())
            .bind(user_id)
            .bind(&target.id)
            .execute(&mut *tx)
            .await
            .map_err(map_write_error)?;

        tx.commit().await?;
        Ok(LikeState::Liked)
    }

    async fn liked_videos(&self, user_id: &ObjectId) -> StoreResult<Vec<LikedVideo>> {
        let rows = sqlx::query(
            "SELECT v.id, v.title, v.thumbnail, v.created_at, \
                    u.id AS owner_id, u.full_name AS owner_full_name, \
                    u.username AS owner_username, u.avatar AS owner_avatar \
             FROM likes l \
             JOIN videos v ON v.id = l.video_id \
             JOIN users u ON u.id = v.owner_id \
             WHERE l.liked_by = $1 AND l.video_id IS NOT NULL \
             ORDER BY l.created_at DESC, l.id DESC",
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        let mut videos = Vec::with_capacity(rows.len());
        for row in rows {
            videos.push(LikedVideo {
                id: row.get("id"),
                title: row.get("title"),
                thumbnail: row.get("thumbnail"),
                created_at: row.get("created_at"),
                owner: Profile {
                    id: row.get("owner_id"),
                    full_name: row.get("owner_full_name"),
                    username: row.get("owner_username"),
                    avatar: row.get("owner_avatar"),
                },
            });
        }

        Ok(videos)
    }

    async fn insert_tweet(&self, tweet: NewTweet) -> StoreResult<Option<Tweet>> {
        let sql = format!(
            "INSERT INTO tweets (id, content, owner_id) VALUES ($1, $2, $3) RETURNING {}",
            TWEET_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(ObjectId::generate())
            .bind(tweet.content)
            .bind(tweet.owner)
            .fetch_optional(self.db.pool())
            .await
            .map_err(map_write_error)?;

        Ok(row.as_ref().map(tweet_from_row))
    }

    async fn find_tweet(&self, tweet_id: &ObjectId) -> StoreResult<Option<Tweet>> {
        let sql = format!("SELECT {} FROM tweets WHERE id = $1", TWEET_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(tweet_id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.as_ref().map(tweet_from_row))
    }

    async fn update_tweet_content(
        &self,
        tweet_id: &ObjectId,
        content: &str,
    ) -> StoreResult<Option<Tweet>> {
        let sql = format!(
            "UPDATE tweets SET content = $2, updated_at = now() WHERE id = $1 RETURNING {}",
            TWEET_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(tweet_id)
            .bind(content)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.as_ref().map(tweet_from_row))
    }

    async fn delete_tweet(&self, tweet_id: &ObjectId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM tweets WHERE id = $1")
            .bind(tweet_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn tweets_by_owner(
        &self,
        owner_id: &ObjectId,
        page: PageRequest,
    ) -> StoreResult<(Vec<Tweet>, u64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tweets WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(self.db.pool())
            .await?;

        let sql = format!(
            "SELECT {} FROM tweets \
             WHERE owner_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3",
            TWEET_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(owner_id)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(self.db.pool())
            .await?;

        let tweets = rows.iter().map(tweet_from_row).collect();
        Ok((tweets, total.max(0) as u64))
    }
}

fn comment_from_row(row: &PgRow) -> Comment {
    Comment {
        id: row.get("id"),
        content: row.get("content"),
        video: row.get("video_id"),
        owner: row.get("owner_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn tweet_from_row(row: &PgRow) -> Tweet {
    Tweet {
        id: row.get("id"),
        content: row.get("content"),
        owner: row.get("owner_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn like_from_row(row: &PgRow) -> StoreResult<Like> {
    let video: Option<ObjectId> = row.get("video_id");
    let comment: Option<ObjectId> = row.get("comment_id");
    let tweet: Option<ObjectId> = row.get("tweet_id");

    let target = match (video, comment, tweet) {
        (Some(id), None, None) => LikeTarget::video(id),
        (None, Some(id), None) => LikeTarget::comment(id),
        (None, None, Some(id)) => LikeTarget::tweet(id),
        _ => {
            return Err(StoreError::Database(sqlx::Error::Decode(
                "like row must reference exactly one target".into(),
            )))
        }
    };

    Ok(Like {
        id: row.get("id"),
        liked_by: row.get("liked_by"),
        target,
        created_at: row.get("created_at"),
    })
}

fn to_text_array(ids: &[ObjectId]) -> Vec<String> {
    ids.iter().map(|id| id.as_str().to_owned()).collect()
}

fn map_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
            let missing = match db_err.constraint() {
                Some("likes_video_id_fkey") | Some("comments_video_id_fkey") => "video",
                Some("likes_comment_id_fkey") => "comment",
                Some("likes_tweet_id_fkey") => "tweet",
                _ => "user",
            };
            return StoreError::MissingReference(missing);
        }
    }
    StoreError::Database(err)
}
