use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::app::comments::CommentService;
use crate::app::guard::parse_target_kind;
use crate::app::likes::LikeService;
use crate::app::tweets::TweetService;
use crate::domain::comment::{Comment, CommentView};
use crate::domain::page::{Page, PageRequest};
use crate::domain::tweet::Tweet;
use crate::domain::video::LikedVideo;
use crate::http::{AppError, AuthUser};
use crate::AppState;

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
}

/// Raw query values; coercion happens in `PageRequest::from_query` so that
/// malformed numbers fall back to defaults instead of rejecting the request.
#[derive(Deserialize)]
pub struct PaginationQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PaginationQuery {
    fn to_request(&self, max_limit: u32) -> PageRequest {
        PageRequest::from_query(self.page.as_deref(), self.limit.as_deref(), max_limit)
    }
}

#[derive(Deserialize)]
pub struct ContentRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Serialize)]
pub struct ToggleResponse {
    pub liked: bool,
}

pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = match state.store.ping().await {
        Ok(()) => "ok",
        Err(err) => {
            tracing::warn!(error = ?err, "store ping failed");
            "degraded"
        }
    };

    Json(HealthResponse { status })
}

pub async fn add_comment(
    State(state): State<AppState>,
    AuthUser { user_id }: AuthUser,
    Path(video_id): Path<String>,
    Json(payload): Json<ContentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let service = CommentService::new(state.store.clone());
    let comment = service
        .add_comment(&video_id, &payload.content, &user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn list_video_comments(
    State(state): State<AppState>,
    viewer: Option<AuthUser>,
    Path(video_id): Path<String>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<Page<CommentView>>, AppError> {
    let service = CommentService::new(state.store.clone());
    let viewer = viewer.map(|auth| auth.user_id);
    let page = service
        .get_video_comments(&video_id, viewer.as_ref(), query.to_request(state.max_page_limit))
        .await?;
    Ok(Json(page))
}

pub async fn update_comment(
    State(state): State<AppState>,
    AuthUser { user_id }: AuthUser,
    Path(comment_id): Path<String>,
    Json(payload): Json<ContentRequest>,
) -> Result<Json<Comment>, AppError> {
    let service = CommentService::new(state.store.clone());
    let comment = service
        .update_comment(&comment_id, &payload.content, &user_id)
        .await?;
    Ok(Json(comment))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    AuthUser { user_id }: AuthUser,
    Path(comment_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let service = CommentService::new(state.store.clone());
    service.delete_comment(&comment_id, &user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_like(
    State(state): State<AppState>,
    AuthUser { user_id }: AuthUser,
    Path((kind, target_id)): Path<(String, String)>,
) -> Result<Json<ToggleResponse>, AppError> {
    let kind = parse_target_kind(&kind)?;
    let service = LikeService::new(state.store.clone());
    let outcome = service.toggle_like(kind, &target_id, &user_id).await?;
    Ok(Json(ToggleResponse {
        liked: outcome.is_liked(),
    }))
}

pub async fn list_liked_videos(
    State(state): State<AppState>,
    AuthUser { user_id }: AuthUser,
) -> Result<Json<Vec<LikedVideo>>, AppError> {
    let service = LikeService::new(state.store.clone());
    let videos = service.liked_videos(&user_id).await?;
    Ok(Json(videos))
}

pub async fn create_tweet(
    State(state): State<AppState>,
    AuthUser { user_id }: AuthUser,
    Json(payload): Json<ContentRequest>,
) -> Result<(StatusCode, Json<Tweet>), AppError> {
    let service = TweetService::new(state.store.clone());
    let tweet = service.create_tweet(&payload.content, &user_id).await?;
    Ok((StatusCode::CREATED, Json(tweet)))
}

pub async fn update_tweet(
    State(state): State<AppState>,
    AuthUser { user_id }: AuthUser,
    Path(tweet_id): Path<String>,
    Json(payload): Json<ContentRequest>,
) -> Result<Json<Tweet>, AppError> {
    let service = TweetService::new(state.store.clone());
    let tweet = service
        .update_tweet(&tweet_id, &payload.content, &user_id)
        .await?;
    Ok(Json(tweet))
}

pub async fn delete_tweet(
    State(state): State<AppState>,
    AuthUser { user_id }: AuthUser,
    Path(tweet_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let service = TweetService::new(state.store.clone());
    service.delete_tweet(&tweet_id, &user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_user_tweets(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<Page<Tweet>>, AppError> {
    let service = TweetService::new(state.store.clone());
    let page = service
        .list_user_tweets(&user_id, query.to_request(state.max_page_limit))
        .await?;
    Ok(Json(page))
}
