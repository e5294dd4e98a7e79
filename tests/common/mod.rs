#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pasetors::claims::Claims;
use pasetors::keys::SymmetricKey;
use pasetors::{local, version4::V4};
use serde_json::Value;
use time::OffsetDateTime;
use tokio::sync::OnceCell;
use tower::ServiceExt;

use murmur::app::identity::{TOKEN_AUDIENCE, TOKEN_ISSUER};
use murmur::domain::id::ObjectId;
use murmur::domain::user::User;
use murmur::domain::video::Video;
use murmur::infra::memory::MemoryStore;
use murmur::AppState;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

// "0123456789abcdef0123456789abcdef" (test-only key)
const TEST_PASETO_ACCESS_KEY: [u8; 32] = *b"0123456789abcdef0123456789abcdef";
pub const TEST_MAX_PAGE_LIMIT: u32 = 100;

// ---------------------------------------------------------------------------
// TestApp: shared, lazily initialized once per test binary
// ---------------------------------------------------------------------------

pub struct TestApp {
    router: Router,
    pub store: Arc<MemoryStore>,
    pub state: AppState,
}

pub struct TestResponse {
    pub status: StatusCode,
    body_bytes: bytes::Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body_bytes).unwrap_or(Value::Null)
    }

    pub fn error_message(&self) -> String {
        self.json()["error"].as_str().unwrap_or("").to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.body_bytes.is_empty()
    }
}

pub struct TestUser {
    pub id: ObjectId,
    pub username: String,
    pub access_token: String,
}

static TEST_APP: OnceCell<TestApp> = OnceCell::const_new();

/// Get (or lazily create) the shared TestApp instance.
pub async fn app() -> &'static TestApp {
    TEST_APP
        .get_or_init(|| async { TestApp::setup().await })
        .await
}

impl TestApp {
    async fn setup() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState {
            store: store.clone(),
            paseto_access_key: TEST_PASETO_ACCESS_KEY,
            max_page_limit: TEST_MAX_PAGE_LIMIT,
        };
        let router = murmur::http::router(state.clone());

        TestApp {
            router,
            store,
            state,
        }
    }

    // ------------------------------------------------------------------
    // Low-level request helper
    // ------------------------------------------------------------------
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header("host", "localhost");

        for &(key, value) in headers {
            builder = builder.header(key, value);
        }

        let request = if let Some(body) = body {
            builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap()
        } else {
            builder.body(Body::empty()).unwrap()
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot failed");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to collect body")
            .to_bytes();

        TestResponse { status, body_bytes }
    }

    // ------------------------------------------------------------------
    // Convenience HTTP helpers
    // ------------------------------------------------------------------
    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        let mut headers = vec![];
        let auth;
        if let Some(t) = token {
            auth = format!("Bearer {}", t);
            headers.push(("Authorization", auth.as_str()));
        }
        self.request(Method::GET, path, None, &headers).await
    }

    pub async fn post_json(&self, path: &str, body: Value, token: Option<&str>) -> TestResponse {
        let mut headers = vec![];
        let auth;
        if let Some(t) = token {
            auth = format!("Bearer {}", t);
            headers.push(("Authorization", auth.as_str()));
        }
        self.request(Method::POST, path, Some(body), &headers).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>) -> TestResponse {
        let mut headers = vec![];
        let auth;
        if let Some(t) = token {
            auth = format!("Bearer {}", t);
            headers.push(("Authorization", auth.as_str()));
        }
        self.request(Method::POST, path, None, &headers).await
    }

    pub async fn patch_json(&self, path: &str, body: Value, token: Option<&str>) -> TestResponse {
        let mut headers = vec![];
        let auth;
        if let Some(t) = token {
            auth = format!("Bearer {}", t);
            headers.push(("Authorization", auth.as_str()));
        }
        self.request(Method::PATCH, path, Some(body), &headers)
            .await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> TestResponse {
        let mut headers = vec![];
        let auth;
        if let Some(t) = token {
            auth = format!("Bearer {}", t);
            headers.push(("Authorization", auth.as_str()));
        }
        self.request(Method::DELETE, path, None, &headers).await
    }

    // ------------------------------------------------------------------
    // Test data helpers
    // ------------------------------------------------------------------

    /// Insert a user directly into the store and mint an access token for it.
    pub async fn create_user(&self, suffix: &str) -> TestUser {
        let id = ObjectId::generate();
        let username = format!("testuser_{}", suffix);

        self.store
            .insert_user(User {
                id: id.clone(),
                username: username.clone(),
                full_name: format!("Test User {}", suffix),
                avatar: None,
                created_at: OffsetDateTime::now_utc(),
            })
            .await;

        let access_token = mint_token(&id, "access");
        TestUser {
            id,
            username,
            access_token,
        }
    }

    /// Insert a video owned by `owner` directly into the store.
    pub async fn create_video(&self, owner: &TestUser, title: &str) -> ObjectId {
        let id = ObjectId::generate();
        self.store
            .insert_video(Video {
                id: id.clone(),
                title: title.to_string(),
                thumbnail: Some(format!("https://cdn.example.com/{}.jpg", id)),
                owner: owner.id.clone(),
                created_at: OffsetDateTime::now_utc(),
            })
            .await;
        id
    }

    /// Post a comment through the API and return its id.
    pub async fn create_comment(&self, user: &TestUser, video_id: &ObjectId, content: &str) -> String {
        let resp = self
            .post_json(
                &format!("/videos/{}/comments", video_id),
                serde_json::json!({ "content": content }),
                Some(&user.access_token),
            )
            .await;
        assert_eq!(resp.status, StatusCode::CREATED, "create comment failed: {}", resp.error_message());
        resp.json()["id"].as_str().unwrap().to_string()
    }

    /// Post a tweet through the API and return its id.
    pub async fn create_tweet(&self, user: &TestUser, content: &str) -> String {
        let resp = self
            .post_json(
                "/tweets",
                serde_json::json!({ "content": content }),
                Some(&user.access_token),
            )
            .await;
        assert_eq!(resp.status, StatusCode::CREATED, "create tweet failed: {}", resp.error_message());
        resp.json()["id"].as_str().unwrap().to_string()
    }
}

/// Mint a token the way the account service does, with a caller-chosen `typ`.
pub fn mint_token(user_id: &ObjectId, typ: &str) -> String {
    let key = SymmetricKey::<V4>::from(&TEST_PASETO_ACCESS_KEY).unwrap();
    let mut claims = Claims::new().unwrap();
    claims.issuer(TOKEN_ISSUER).unwrap();
    claims.audience(TOKEN_AUDIENCE).unwrap();
    claims.subject(user_id.as_str()).unwrap();
    claims.add_additional("typ", typ).unwrap();
    local::encrypt(&key, &claims, None, None).unwrap()
}
