use tracing::debug;

use crate::app::error::{ServiceError, ServiceResult};
use crate::app::feed::CommentFeedQuery;
use crate::app::guard::{ensure_owner, parse_id, require_content};
use crate::domain::comment::{Comment, CommentView, NewComment};
use crate::domain::id::ObjectId;
use crate::domain::page::{Page, PageRequest};
use crate::infra::store::SharedStore;

#[derive(Clone)]
pub struct CommentService {
    store: SharedStore,
}

impl CommentService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn add_comment(
        &self,
        video_id: &str,
        content: &str,
        caller: &ObjectId,
    ) -> ServiceResult<Comment> {
        let video_id = parse_id(video_id, "video")?;
        let content = require_content(content, "comment")?;

        if !self.store.video_exists(&video_id).await? {
            return Err(ServiceError::validation("video does not exist"));
        }

        let comment = self
            .store
            .insert_comment(NewComment {
                video: video_id,
                owner: caller.clone(),
                content,
            })
            .await?
            .ok_or_else(|| ServiceError::internal("failed to add comment"))?;

        debug!(comment_id = %comment.id, video_id = %comment.video, owner_id = %caller, "comment added");
        Ok(comment)
    }

    pub async fn update_comment(
        &self,
        comment_id: &str,
        content: &str,
        caller: &ObjectId,
    ) -> ServiceResult<Comment> {
        let comment_id = parse_id(comment_id, "comment")?;
        let content = require_content(content, "comment")?;

        let existing = self
            .store
            .find_comment(&comment_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("comment not found"))?;
        ensure_owner(
            &existing.owner,
            Some(caller),
            "you do not have permission to edit this comment",
        )?;

        let updated = self
            .store
            .update_comment_content(&comment_id, &content)
            .await?
            .ok_or_else(|| ServiceError::not_found("comment not found"))?;

        debug!(comment_id = %updated.id, "comment updated");
        Ok(updated)
    }

    pub async fn delete_comment(&self, comment_id: &str, caller: &ObjectId) -> ServiceResult<()> {
        let comment_id = parse_id(comment_id, "comment")?;

        let existing = self
            .store
            .find_comment(&comment_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("comment not found"))?;
        ensure_owner(
            &existing.owner,
            Some(caller),
            "you do not have permission to delete this comment",
        )?;

        if !self.store.delete_comment(&comment_id).await? {
            return Err(ServiceError::not_found("comment not found"));
        }

        debug!(comment_id = %comment_id, "comment deleted");
        Ok(())
    }

    /// Paginated comment feed of a video with per-viewer like flags. An
    /// absent viewer sees every `is_liked` as false.
    pub async fn get_video_comments(
        &self,
        video_id: &str,
        viewer: Option<&ObjectId>,
        page: PageRequest,
    ) -> ServiceResult<Page<CommentView>> {
        let video_id = parse_id(video_id, "video")?;

        let feed = CommentFeedQuery::new(&video_id)
            .viewer(viewer)
            .page(page)
            .run(self.store.as_ref())
            .await?;
        Ok(feed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use time::OffsetDateTime;

    use super::*;
    use crate::domain::user::User;
    use crate::domain::video::Video;
    use crate::http::AppError;
    use crate::infra::memory::MemoryStore;
    use crate::infra::store::testing::NoRecordStore;

    async fn seed(store: &MemoryStore) -> (ObjectId, ObjectId) {
        let user_id = ObjectId::generate();
        let video_id = ObjectId::generate();
        store
            .insert_user(User {
                id: user_id.clone(),
                username: "ana".into(),
                full_name: "Ana".into(),
                avatar: None,
                created_at: OffsetDateTime::now_utc(),
            })
            .await;
        store
            .insert_video(Video {
                id: video_id.clone(),
                title: "clip".into(),
                thumbnail: None,
                owner: user_id.clone(),
                created_at: OffsetDateTime::now_utc(),
            })
            .await;
        (user_id, video_id)
    }

    async fn seeded() -> (Arc<MemoryStore>, ObjectId, ObjectId) {
        let store = Arc::new(MemoryStore::new());
        let (user_id, video_id) = seed(&store).await;
        (store, user_id, video_id)
    }

    #[tokio::test]
    async fn long_comment_is_stored_as_submitted() {
        let (store, user_id, video_id) = seeded().await;
        let service = CommentService::new(store.clone());
        let content = format!("  {}\n", "a".repeat(1001));

        let created = service
            .add_comment(video_id.as_str(), &content, &user_id)
            .await
            .unwrap();
        assert_eq!(created.content, content);
        assert_eq!(created.owner, user_id);
        assert_eq!(created.video, video_id);
        assert_eq!(store.comment_count().await, 1);
    }

    #[tokio::test]
    async fn missing_created_record_is_internal_error() {
        let store = Arc::new(NoRecordStore::default());
        let (user_id, video_id) = seed(&store.inner).await;
        let service = CommentService::new(store.clone());

        let err = service
            .add_comment(video_id.as_str(), "hello", &user_id)
            .await
            .unwrap_err();
        assert!(matches!(&err, ServiceError::Internal(message) if message == "failed to add comment"));
        assert_eq!(AppError::from(err).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn rejected_input_never_reaches_the_store() {
        let (store, user_id, video_id) = seeded().await;
        let service = CommentService::new(store.clone());

        let err = service
            .add_comment(video_id.as_str(), "  ", &user_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err = service
            .add_comment(ObjectId::generate().as_str(), "hi", &user_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(message) if message == "video does not exist"));

        assert_eq!(store.comment_count().await, 0);
    }

    #[tokio::test]
    async fn update_changes_only_content() {
        let (store, user_id, video_id) = seeded().await;
        let service = CommentService::new(store.clone());

        let created = service
            .add_comment(video_id.as_str(), "before", &user_id)
            .await
            .unwrap();
        let updated = service
            .update_comment(created.id.as_str(), " after ", &user_id)
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.content, " after ");
        assert_eq!(updated.owner, created.owner);
        assert_eq!(updated.video, created.video);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn forbidden_delete_keeps_the_comment() {
        let (store, user_id, video_id) = seeded().await;
        let service = CommentService::new(store.clone());
        let created = service
            .add_comment(video_id.as_str(), "mine", &user_id)
            .await
            .unwrap();

        let err = service
            .delete_comment(created.id.as_str(), &ObjectId::generate())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
        assert_eq!(store.comment_count().await, 1);

        service
            .delete_comment(created.id.as_str(), &user_id)
            .await
            .unwrap();
        assert_eq!(store.comment_count().await, 0);
    }
}
