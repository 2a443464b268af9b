#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use folio_core::roles::ROLE_ADMIN;
use folio_core::store::MemoryContentStore;
use folio_publish::PublishConfig;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use folio_api::auth::jwt::{generate_access_token, JwtConfig};
use folio_api::auth::password::hash_password;
use folio_api::config::{AdminCredentials, ServerConfig};
use folio_api::router::build_app_router;
use folio_api::state::AppState;

pub const ADMIN_EMAIL: &str = "admin@studio.test";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery-staple";

/// Page seeded into every test site: hero and services are managed regions.
pub const INDEX_HTML: &str = "<!doctype html>\n<html>\n<body>\n\
<!-- cms:hero:start --><h1>placeholder</h1><!-- cms:hero:end -->\n\
<p class=\"static\">hand-written</p>\n\
<!-- cms:services:start --><!-- cms:services:end -->\n\
</body>\n</html>\n";

/// Argon2 is slow in debug builds; hash the admin password once per binary.
fn admin_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(ADMIN_PASSWORD).expect("hashing should succeed"))
        .clone()
}

/// Build a test `ServerConfig` with safe defaults publishing into `site_root`.
pub fn test_config(site_root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
        admin: AdminCredentials {
            email: ADMIN_EMAIL.to_string(),
            password_hash: Some(admin_hash()),
        },
        database_url: None,
        publish: PublishConfig::new(site_root, vec!["index.html".to_string()]),
    }
}

/// A running application over an in-memory store and a temp site directory.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryContentStore>,
    pub config: ServerConfig,
    pub site: TempDir,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    pub fn page_path(&self) -> std::path::PathBuf {
        self.site.path().join("index.html")
    }

    pub fn page(&self) -> String {
        std::fs::read_to_string(self.page_path()).expect("page should be readable")
    }

    pub fn admin_token(&self) -> String {
        token_for(&self.config, ROLE_ADMIN)
    }

    /// Valid token for a non-admin role.
    pub fn viewer_token(&self) -> String {
        token_for(&self.config, "viewer")
    }
}

pub fn token_for(config: &ServerConfig, role: &str) -> String {
    generate_access_token(ADMIN_EMAIL, role, &config.jwt).expect("token generation should succeed")
}

/// Build the full application with the production middleware stack.
pub fn build_test_app() -> TestApp {
    build_test_app_with(|_| {})
}

/// Like [`build_test_app`], letting the caller adjust the config first.
pub fn build_test_app_with(adjust: impl FnOnce(&mut ServerConfig)) -> TestApp {
    let site = tempfile::tempdir().expect("tempdir should be created");
    std::fs::write(site.path().join("index.html"), INDEX_HTML).expect("page should be written");

    let mut config = test_config(site.path());
    adjust(&mut config);

    let store = Arc::new(MemoryContentStore::new());
    let state = AppState::new(store.clone(), config.clone());
    let router = build_app_router(state, &config);

    TestApp {
        router,
        store,
        config,
        site,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    app.oneshot(request).await.expect("request should complete")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}
