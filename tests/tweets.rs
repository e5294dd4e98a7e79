//! Tweet Tests
//!
//! Covers creating, editing, deleting and listing tweets.

mod common;

use axum::http::StatusCode;
use common::app;
use murmur::domain::id::ObjectId;
use serde_json::json;

// ===========================================================================
// Creation
// ===========================================================================

#[tokio::test]
async fn create_tweet_valid() {
    let app = app().await;
    let user = app.create_user("tweet_create").await;

    let resp = app
        .post_json("/tweets", json!({ "content": " hello world " }), Some(&user.access_token))
        .await;

    assert_eq!(resp.status, StatusCode::CREATED);
    let body = resp.json();
    assert!(body["id"].is_string());
    assert_eq!(body["content"], " hello world ");
    assert_eq!(body["owner"].as_str().unwrap(), user.id.as_str());
    assert!(body["created_at"].is_string());
    assert!(body["updated_at"].is_string());
}

#[tokio::test]
async fn create_tweet_validation() {
    let app = app().await;
    let user = app.create_user("tweet_invalid").await;

    let empty = app
        .post_json("/tweets", json!({ "content": "" }), Some(&user.access_token))
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
    assert_eq!(empty.error_message(), "tweet content is required");

    let blank = app
        .post_json("/tweets", json!({ "content": " \n " }), Some(&user.access_token))
        .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
    assert_eq!(blank.error_message(), "tweet content is required");

    let listed = app
        .get(&format!("/users/{}/tweets", user.id), None)
        .await
        .json();
    assert_eq!(listed["total_count"], 0);
}

#[tokio::test]
async fn create_tweet_requires_auth() {
    let app = app().await;
    let resp = app
        .post_json("/tweets", json!({ "content": "anonymous" }), None)
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

// ===========================================================================
// Editing and deleting
// ===========================================================================

#[tokio::test]
async fn update_tweet_by_owner_and_intruder() {
    let app = app().await;
    let owner = app.create_user("tweet_edit_owner").await;
    let intruder = app.create_user("tweet_edit_intruder").await;
    let tweet_id = app.create_tweet(&owner, "draft").await;

    let denied = app
        .patch_json(
            &format!("/tweets/{}", tweet_id),
            json!({ "content": "hijacked" }),
            Some(&intruder.access_token),
        )
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    assert_eq!(denied.error_message(), "you do not have permission to edit this tweet");

    let resp = app
        .patch_json(
            &format!("/tweets/{}", tweet_id),
            json!({ "content": "final" }),
            Some(&owner.access_token),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["content"], "final");
    assert_eq!(resp.json()["id"].as_str().unwrap(), tweet_id);
}

#[tokio::test]
async fn delete_tweet_rules() {
    let app = app().await;
    let owner = app.create_user("tweet_delete_owner").await;
    let intruder = app.create_user("tweet_delete_intruder").await;
    let tweet_id = app.create_tweet(&owner, "ephemeral").await;
    let path = format!("/tweets/{}", tweet_id);

    let denied = app.delete(&path, Some(&intruder.access_token)).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    assert_eq!(denied.error_message(), "you do not have permission to delete this tweet");

    let deleted = app.delete(&path, Some(&owner.access_token)).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let missing = app.delete(&path, Some(&owner.access_token)).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.error_message(), "tweet not found");
}

#[tokio::test]
async fn tweet_routes_reject_malformed_ids() {
    let app = app().await;
    let user = app.create_user("tweet_badid").await;

    let resp = app
        .patch_json("/tweets/12345", json!({ "content": "x" }), Some(&user.access_token))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_message(), "invalid or missing tweet ID");

    let resp = app.get("/users/nobody/tweets", None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_message(), "invalid or missing user ID");
}

// ===========================================================================
// Listing
// ===========================================================================

#[tokio::test]
async fn list_user_tweets_newest_first() {
    let app = app().await;
    let author = app.create_user("tweet_list").await;
    let other = app.create_user("tweet_list_other").await;

    for n in 0..3 {
        app.create_tweet(&author, &format!("tweet {}", n)).await;
    }
    app.create_tweet(&other, "not mine").await;

    let resp = app
        .get(&format!("/users/{}/tweets?limit=2", author.id), None)
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["content"], "tweet 2");
    assert_eq!(items[1]["content"], "tweet 1");
    assert_eq!(body["total_count"], 3);
    assert_eq!(body["total_pages"], 2);

    let page_two = app
        .get(&format!("/users/{}/tweets?limit=2&page=2", author.id), None)
        .await
        .json();
    assert_eq!(page_two["items"][0]["content"], "tweet 0");
    assert_eq!(page_two["has_next_page"], false);
}

#[tokio::test]
async fn list_tweets_of_unknown_user_is_empty() {
    let app = app().await;
    let resp = app
        .get(&format!("/users/{}/tweets", ObjectId::generate()), None)
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.json()["items"].as_array().unwrap().is_empty());
}

// ===========================================================================
// Health
// ===========================================================================

#[tokio::test]
async fn health_reports_ok() {
    let app = app().await;
    let resp = app.get("/health", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["status"], "ok");
}
