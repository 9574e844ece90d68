mod models;
mod status;

pub use models::*;
pub use status::{ModerationAction, RequestStatus, ServerStatus};
