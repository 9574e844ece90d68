use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use mossai::auth::{AdminList, SESSION_COOKIE, SessionCodec, SessionIdentity};
use mossai::config::{AppConfig, DiscordConfig, ServerConfig, WebhookConfig};
use mossai::server::{AppState, create_router};
use mossai::store::{SqliteStore, Store};

pub const ADMIN_ID: &str = "111";
const SESSION_SECRET: &str = "test-session-secret";

pub struct TestApp {
    pub temp_dir: TempDir,
    pub store: Arc<SqliteStore>,
    sessions: SessionCodec,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// An app with Discord login configured against an unreachable API.
    pub fn with_oauth() -> Self {
        Self::with_config(AppConfig {
            discord: Some(DiscordConfig {
                client_id: "client-id".to_string(),
                client_secret: "client-secret".to_string(),
                redirect_uri: "http://localhost:8080/auth/discord/callback".to_string(),
                scopes: vec!["identify".to_string()],
                api_base: "http://127.0.0.1:1/api".to_string(),
            }),
            ..AppConfig::default()
        })
    }

    /// An app whose admin webhook points at a closed port.
    pub fn with_webhook() -> Self {
        Self::with_config(AppConfig {
            webhook: WebhookConfig {
                url: Some("http://127.0.0.1:1/hook".to_string()),
                ..WebhookConfig::default()
            },
            ..AppConfig::default()
        })
    }

    fn with_config(app: AppConfig) -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        for (name, body) in [
            ("index.html", "<h1>leaderboard</h1>"),
            ("list.html", "<h1>submit</h1>"),
            ("server.html", "<h1>server</h1>"),
            ("admin_requests.html", "<h1>moderation</h1>"),
        ] {
            std::fs::write(temp_dir.path().join(name), body).expect("write page");
        }

        let store = Arc::new(SqliteStore::new(temp_dir.path().join("test.db")).expect("open db"));
        store.initialize().expect("initialize db");

        let app = AppConfig {
            session_secret: SESSION_SECRET.to_string(),
            admins: AdminList::parse(ADMIN_ID),
            ..app
        };
        let server = ServerConfig {
            static_dir: temp_dir.path().to_path_buf(),
            trust_proxy: true,
            ..ServerConfig::default()
        };

        let state = AppState::new(store.clone(), &app, &server).expect("build state");

        Self {
            temp_dir,
            store,
            sessions: SessionCodec::new(SESSION_SECRET),
            router: create_router(Arc::new(state)),
        }
    }

    /// `Cookie` header value carrying a valid session for `discord_id`.
    pub fn session_cookie(&self, discord_id: &str) -> String {
        let identity = SessionIdentity {
            discord_id: discord_id.to_string(),
            username: format!("user-{discord_id}"),
            avatar_url: None,
            expires_at: None,
        };
        let token = self.sessions.encode(&identity).expect("encode session");
        format!("{SESSION_COOKIE}={token}")
    }

    pub fn admin_cookie(&self) -> String {
        self.session_cookie(ADMIN_ID)
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::get(uri);
        if let Some(cookie) = cookie {
            builder = builder.header("cookie", cookie);
        }
        self.send(builder.body(Body::empty()).expect("build request"))
            .await
    }

    pub async fn post(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::post(uri);
        if let Some(cookie) = cookie {
            builder = builder.header("cookie", cookie);
        }
        self.send(builder.body(Body::empty()).expect("build request"))
            .await
    }

    pub async fn post_form(
        &self,
        uri: &str,
        form: &str,
        forwarded_for: Option<&str>,
    ) -> Response<Body> {
        let mut builder =
            Request::post(uri).header("content-type", "application/x-www-form-urlencoded");
        if let Some(ip) = forwarded_for {
            builder = builder.header("x-forwarded-for", ip);
        }
        self.send(builder.body(Body::from(form.to_string())).expect("build request"))
            .await
    }

    pub async fn post_json(&self, uri: &str, cookie: &str, body: &Value) -> Response<Body> {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .header("cookie", cookie)
            .body(Body::from(body.to_string()))
            .expect("build request");
        self.send(request).await
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json body")
}
