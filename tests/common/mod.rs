mod test_app;

pub use test_app::{ADMIN_ID, TestApp, body_json};
