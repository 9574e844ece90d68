use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{
    Router,
    routing::{get, get_service},
};
use tower_http::services::ServeDir;

use super::admin::admin_router;
use super::auth::auth_router;
use super::pages::{self, INDEX_PAGE, LIST_PAGE, SERVER_PAGE};
use super::public::{self, public_router};
use crate::auth::{AdminList, DiscordOAuth, SessionCodec};
use crate::captcha::CaptchaVerifier;
use crate::config::{AppConfig, ServerConfig};
use crate::error::{Error, Result};
use crate::moderation::Moderation;
use crate::notify::Notifier;
use crate::store::Store;

const OUTBOUND_TIMEOUT: Duration = Duration::from_secs(10);

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub sessions: SessionCodec,
    pub admins: AdminList,
    /// `None` when Discord login is not configured.
    pub oauth: Option<DiscordOAuth>,
    pub captcha: CaptchaVerifier,
    pub notifier: Notifier,
    pub cookie_secure: bool,
    pub trust_proxy: bool,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, app: &AppConfig, server: &ServerConfig) -> Result<Self> {
        // OAuth endpoints must not follow redirects.
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(OUTBOUND_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        let oauth = app
            .discord
            .as_ref()
            .map(|discord| DiscordOAuth::new(discord, http.clone()))
            .transpose()?;

        Ok(Self {
            store,
            sessions: SessionCodec::new(app.session_secret.as_bytes()),
            admins: app.admins.clone(),
            oauth,
            captcha: CaptchaVerifier::new(app.turnstile_secret.clone(), http.clone()),
            notifier: Notifier::new(&app.webhook, &app.base_url, http),
            cookie_secure: app.cookie_secure,
            trust_proxy: server.trust_proxy,
            static_dir: server.static_dir.clone(),
        })
    }

    pub fn moderation(&self) -> Moderation<'_> {
        Moderation::new(self.store.as_ref(), &self.notifier, &self.captcha)
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let static_dir = state.static_dir.clone();

    Router::new()
        .route("/health", get(health))
        // Pages
        .route("/", get_service(pages::page(&static_dir, INDEX_PAGE)))
        .route(
            "/list",
            get_service(pages::page(&static_dir, LIST_PAGE)).post(public::submit),
        )
        .route("/servers/{id}", get_service(pages::page(&static_dir, SERVER_PAGE)))
        .route("/admin/requests", get(pages::admin_page))
        .nest_service("/static", ServeDir::new(&static_dir))
        .merge(public_router())
        .merge(auth_router())
        .merge(admin_router())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
