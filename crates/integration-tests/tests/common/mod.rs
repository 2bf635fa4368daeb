//! Shared harness: a full router over tempdir-backed JSON stores, real
//! JWT/argon2 adapters, and mock game-database ports.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use api_adapters::metrics::Metrics;
use api_adapters::{build_router, AppState, RouterOptions};
use auth_adapters::{Argon2Hasher, JwtTokenService};
use chrono::{Duration as ChronoDuration, Utc};
use domains::models::SessionClaims;
use domains::ports::{
    CharacterReader, GameAccountRepo, MockCharacterReader, MockGameAccountRepo, TokenService,
    UserStore,
};
use services::{
    AdminGate, AdminRoster, AuthService, EventsService, FixedWindowLimiter, ForumService,
    ProfileService, RankingService,
};
use storage_adapters::{FileEventStore, FileForumStore, FileUserStore, LocalPortraits};

pub const TEST_SECRET: &[u8] = b"integration-test-secret";
pub const ADMIN_EMAIL: &str = "root@example.com";

pub struct Harness {
    pub router: Router,
    pub dir: tempfile::TempDir,
    pub tokens: Arc<JwtTokenService>,
}

pub struct HarnessOptions {
    pub accounts: MockGameAccountRepo,
    pub characters: MockCharacterReader,
    pub login_max: u32,
    pub signup_max: u32,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            accounts: MockGameAccountRepo::new(),
            characters: MockCharacterReader::new(),
            // Generous budgets so only the rate-limit tests trip them.
            login_max: 1000,
            signup_max: 1000,
        }
    }
}

pub async fn harness(opts: HarnessOptions) -> Harness {
    let dir = tempfile::tempdir().expect("tempdir");
    let uploads = dir.path().join("uploads/characters");
    std::fs::create_dir_all(&uploads).expect("uploads dir");

    let users: Arc<dyn UserStore> = Arc::new(FileUserStore::new(dir.path().join("users.json")));
    let forum = ForumService::new(Arc::new(FileForumStore::new(dir.path().join("forum.json"))));
    forum.ensure_policy_thread().await.expect("policy seed");

    let accounts: Arc<dyn GameAccountRepo> = Arc::new(opts.accounts);
    let characters: Arc<dyn CharacterReader> = Arc::new(opts.characters);
    let portraits = Arc::new(LocalPortraits::new(&uploads, "/api/uploads/characters"));
    let tokens = Arc::new(JwtTokenService::new(TEST_SECRET));
    let roster = AdminRoster::from_csv(ADMIN_EMAIL);
    let gate = AdminGate::new(roster.clone(), users.clone());

    let state = AppState {
        auth: AuthService::new(
            users.clone(),
            accounts.clone(),
            Arc::new(Argon2Hasher),
            tokens.clone(),
            roster.clone(),
        ),
        profile: ProfileService::new(users, accounts, tokens.clone(), roster, gate.clone()),
        forum,
        events: EventsService::new(
            Arc::new(FileEventStore::new(dir.path().join("events.json"))),
            gate,
        ),
        ranking: RankingService::new(characters, portraits),
        tokens: tokens.clone(),
        login_limiter: Arc::new(FixedWindowLimiter::new(
            "login",
            opts.login_max,
            Duration::from_secs(15 * 60),
        )),
        signup_limiter: Arc::new(FixedWindowLimiter::new(
            "signup",
            opts.signup_max,
            Duration::from_secs(60 * 60),
        )),
        metrics: Metrics::new(),
    };

    let router = build_router(
        state,
        RouterOptions {
            cors_origin: "*".into(),
            uploads_dir: dir.path().join("uploads"),
            verbose_errors: true,
        },
    );

    Harness { router, dir, tokens }
}

impl Harness {
    /// Signs a token directly, for tests that need an arbitrary identity.
    pub fn token_for(&self, sub: &str, name: &str, email: Option<&str>, admin: bool) -> String {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: sub.into(),
            name: name.into(),
            nickname: None,
            email: email.map(String::from),
            admin,
            iat: now.timestamp(),
            exp: (now + ChronoDuration::days(7)).timestamp(),
        };
        self.tokens.issue(&claims).expect("token")
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.request_from("10.0.0.1".parse().unwrap(), method, uri, token, body)
            .await
    }

    pub async fn request_from(
        &self,
        addr: IpAddr,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-forwarded-for", addr.to_string());
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }
}

/// Canonical signup payload; tweak fields per test.
pub fn signup_payload(email: &str, nickname: &str) -> Value {
    serde_json::json!({
        "email": email,
        "password": "stormwind-keep",
        "nickname": nickname,
        "firstName": "Anduin",
        "lastName": "Wrynn",
    })
}
