use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mossai::config::{AppConfig, ServerConfig};
use mossai::server::{AppState, create_router};
use mossai::store::{SqliteStore, Store};
use mossai::types::RequestFields;

#[derive(Parser)]
#[command(name = "mossai")]
#[command(about = "A private server directory with voting and moderated listings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long, env = "MOSSAI_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, short, env = "MOSSAI_PORT", default_value = "8080")]
        port: u16,

        /// SQLite database file
        #[arg(long, env = "MOSSAI_DB", default_value = "./mossai.db")]
        db: PathBuf,

        /// Directory with the HTML pages and static assets
        #[arg(long, env = "MOSSAI_STATIC_DIR", default_value = "./public")]
        static_dir: PathBuf,

        /// Take client addresses from X-Forwarded-For
        #[arg(long, env = "MOSSAI_TRUST_PROXY")]
        trust_proxy: bool,
    },

    /// Insert a demo server for local development
    Seed {
        /// SQLite database file
        #[arg(long, env = "MOSSAI_DB", default_value = "./mossai.db")]
        db: PathBuf,
    },
}

fn open_store(db: &Path) -> anyhow::Result<SqliteStore> {
    let store = SqliteStore::new(db)?;
    store.initialize()?;
    Ok(store)
}

fn run_seed(db: PathBuf) -> anyhow::Result<()> {
    let store = open_store(&db)?;

    let fields = RequestFields {
        server_name: "M1PPosu".to_string(),
        url: Some("https://m1pposu.dev".to_string()),
        description: Some(
            "a osu! Server where we rank the unrankable! From HUGE Map Packs to Farm Maps, \
             everything is rankable here, giving everyone and everything a chance to excel the \
             rankings! With Vanilla, Relax and Autopilot leaderboards, you can never get bored!"
                .to_string(),
        ),
        tags: Some("relax, autopilot, farm".to_string()),
        logo_url: Some("/static/m1pplogo.png".to_string()),
        owner_name: "M1PP Team".to_string(),
        owner_discord: "123456789012345678".to_string(),
    };

    let now = Utc::now();
    let request_id = store.create_request(&fields, now)?;
    let approval = store.approve_request(request_id, now)?;

    println!(
        "Seeded server {} with id {}",
        fields.server_name, approval.server_id
    );
    Ok(())
}

async fn run_serve(config: ServerConfig) -> anyhow::Result<()> {
    let app_config = AppConfig::from_env();

    let store = open_store(&config.db_path)?;
    info!("Database ready at {}", config.db_path.display());

    let state = AppState::new(Arc::new(store), &app_config, &config)?;

    if state.sessions.is_insecure() {
        warn!("SESSION_SECRET is not set; sessions are signed with the development secret");
    }
    if state.admins.is_empty() {
        warn!("MOSS_ADMIN_IDS is empty; nobody can moderate");
    } else {
        info!("{} moderator(s) configured", state.admins.len());
    }
    if state.oauth.is_none() {
        warn!("Discord OAuth is not configured; login is disabled");
    }
    if !state.captcha.is_enabled() {
        info!("TURNSTILE_SECRET is not set; captcha checks are skipped");
    }

    let app = create_router(Arc::new(state));
    let addr = config.socket_addr()?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("mossai=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            db,
            static_dir,
            trust_proxy,
        } => {
            run_serve(ServerConfig {
                host,
                port,
                db_path: db,
                static_dir,
                trust_proxy,
            })
            .await?;
        }
        Commands::Seed { db } => run_seed(db)?,
    }

    Ok(())
}
