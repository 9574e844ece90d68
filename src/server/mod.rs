mod admin;
mod auth;
mod client_ip;
pub mod dto;
mod pages;
mod public;
pub mod response;
mod router;

pub use admin::admin_router;
pub use auth::{OAUTH_STATE_COOKIE, auth_router};
pub use client_ip::ClientIp;
pub use public::public_router;
pub use router::{AppState, create_router};
