use axum::{routing::get, routing::patch, routing::post, Router};

use crate::http::handlers;
use crate::AppState;

pub fn health() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health))
}

pub fn comments() -> Router<AppState> {
    Router::new()
        .route(
            "/videos/:video_id/comments",
            post(handlers::add_comment).get(handlers::list_video_comments),
        )
        .route(
            "/comments/:comment_id",
            patch(handlers::update_comment).delete(handlers::delete_comment),
        )
}

pub fn likes() -> Router<AppState> {
    Router::new()
        .route("/likes/:kind/:target_id/toggle", post(handlers::toggle_like))
        .route("/likes/videos", get(handlers::list_liked_videos))
}

pub fn tweets() -> Router<AppState> {
    Router::new()
        .route("/tweets", post(handlers::create_tweet))
        .route(
            "/tweets/:tweet_id",
            patch(handlers::update_tweet).delete(handlers::delete_tweet),
        )
        .route("/users/:user_id/tweets", get(handlers::list_user_tweets))
}
