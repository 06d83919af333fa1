//! Test helpers for Web API integration tests.
//!
//! Builds the full router over an in-memory database, a temporary image
//! directory and a mailer that records instead of sending.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::header::COOKIE;
use axum_test::{TestRequest, TestServer};
use netlink::config::Config;
use netlink::db::UserRepository;
use netlink::mail::{Mailer, OutgoingMail};
use netlink::media::LocalImageStore;
use netlink::web::middleware::RateLimitState;
use netlink::web::{create_router, AppState};
use netlink::{Database, NetlinkError};
use serde_json::{json, Value};
use tempfile::TempDir;

/// Base path of the API.
pub const API: &str = "/api/v1";

/// A 1x1 PNG as a data URI.
pub const PNG_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// Mailer that keeps every message in memory.
///
/// After [`RecordingMailer::fail_sends`] every send is counted as an attempt
/// and rejected like an unreachable SMTP relay.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
    failing: AtomicBool,
    failed: AtomicUsize,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fail_sends(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Number of sends rejected since `fail_sends`.
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> netlink::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            self.failed.fetch_add(1, Ordering::SeqCst);
            return Err(NetlinkError::Mail(format!(
                "connection refused sending to {}",
                mail.to_email
            )));
        }
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

/// A signed-up user with its session token.
pub struct TestUser {
    pub id: i64,
    pub username: String,
    pub token: String,
}

/// Running application under test.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub mailer: Arc<RecordingMailer>,
    pub images_dir: TempDir,
}

/// Create a test configuration.
pub fn test_config(auth_rate_limit: u32) -> Config {
    let mut config = Config::default();
    config.auth.jwt_secret = "test-secret-key-for-testing-only".to_string();
    config.server.client_url = "http://localhost:5173".to_string();
    config.images.public_base_url = "http://localhost:5000/images".to_string();
    config.web.auth_rate_limit = auth_rate_limit;
    config
}

impl TestApp {
    /// Create a test app with a generous auth rate limit.
    pub async fn new() -> Self {
        Self::with_config(test_config(1000)).await
    }

    /// Create a test app from a configuration.
    pub async fn with_config(config: Config) -> Self {
        let db = Database::open_in_memory()
            .await
            .expect("Failed to create test database");
        let images_dir = TempDir::new().expect("Failed to create image dir");
        let images = LocalImageStore::new(
            images_dir.path(),
            &config.images.public_base_url,
            config.images.max_size_mb,
        )
        .expect("Failed to create image store");
        let mailer = Arc::new(RecordingMailer::default());

        let state = Arc::new(
            AppState::new(&config, db, Arc::new(images), mailer.clone())
                .expect("Failed to create app state"),
        );
        let rate_limit = Arc::new(
            RateLimitState::new(config.web.auth_rate_limit).with_trust_proxy(config.web.trust_proxy),
        );
        let router = create_router(state.clone(), rate_limit, &config, images_dir.path());
        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            state,
            mailer,
            images_dir,
        }
    }

    /// Sign up a user named after `username` with password `secret1`.
    pub async fn signup(&self, username: &str) -> TestUser {
        let response = self
            .server
            .post(&format!("{API}/auth/signup"))
            .json(&json!({
                "name": format!("{username} tester"),
                "username": username,
                "email": format!("{username}@example.com"),
                "password": "secret1"
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);

        let body: Value = response.json();
        TestUser {
            id: body["data"]["id"].as_i64().expect("user id"),
            username: username.to_string(),
            token: response.cookie("token").value().to_string(),
        }
    }

    /// Connect two users directly in the database.
    pub async fn connect(&self, a: &TestUser, b: &TestUser) {
        UserRepository::new(self.state.db.pool())
            .connect(a.id, b.id)
            .await
            .expect("Failed to connect users");
    }

    pub fn get(&self, user: &TestUser, path: &str) -> TestRequest {
        authed(self.server.get(&format!("{API}{path}")), user)
    }

    pub fn post(&self, user: &TestUser, path: &str) -> TestRequest {
        authed(self.server.post(&format!("{API}{path}")), user)
    }

    pub fn patch(&self, user: &TestUser, path: &str) -> TestRequest {
        authed(self.server.patch(&format!("{API}{path}")), user)
    }

    pub fn delete(&self, user: &TestUser, path: &str) -> TestRequest {
        authed(self.server.delete(&format!("{API}{path}")), user)
    }

    /// Create a post as `user` and return its id.
    pub async fn create_post(&self, user: &TestUser, content: &str) -> i64 {
        let response = self
            .post(user, "/posts/create")
            .json(&json!({ "content": content }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Value>()["data"]["id"]
            .as_i64()
            .expect("post id")
    }

    /// Notifications of `user` as JSON.
    pub async fn notifications(&self, user: &TestUser) -> Vec<Value> {
        let response = self.get(user, "/notifications").await;
        response.assert_status_ok();
        response.json::<Value>()["data"]
            .as_array()
            .cloned()
            .unwrap_or_default()
    }

    /// Wait for detached email tasks to run.
    pub async fn settle(&self) {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }
}

fn authed(request: TestRequest, user: &TestUser) -> TestRequest {
    request.add_header(COOKIE, format!("token={}", user.token))
}
