mod admin;
mod middleware;
pub mod oauth;
mod session;

pub use admin::AdminList;
pub use middleware::{AuthError, MaybeSession, RequireAdmin, SESSION_COOKIE};
pub use oauth::DiscordOAuth;
pub use session::{DEV_SESSION_SECRET, SESSION_TTL_DAYS, SessionCodec, SessionError, SessionIdentity};
