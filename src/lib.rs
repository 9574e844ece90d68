//! # mossai
//!
//! Backend for a private game server directory: a public leaderboard with
//! voting, a moderated submission queue, and Discord-based admin login.
//!
//! ## Library Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mossai::config::{AppConfig, ServerConfig};
//! use mossai::server::{AppState, create_router};
//! use mossai::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new("./mossai.db").unwrap();
//! store.initialize().unwrap();
//!
//! let state = AppState::new(
//!     Arc::new(store),
//!     &AppConfig::from_env(),
//!     &ServerConfig::default(),
//! )
//! .unwrap();
//! let router = create_router(Arc::new(state));
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Builds the `mossai` binary. Disable with `default-features = false`.

pub mod auth;
pub mod captcha;
pub mod config;
pub mod error;
pub mod moderation;
pub mod notify;
pub mod server;
pub mod store;
pub mod types;
