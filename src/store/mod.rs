mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // Request queue operations
    fn create_request(&self, fields: &RequestFields, created_at: DateTime<Utc>) -> Result<i64>;
    fn get_request(&self, id: i64) -> Result<Option<ServerRequest>>;
    fn list_pending_requests(&self) -> Result<Vec<ServerRequest>>;
    /// Replaces the fields of a pending request. Fails with
    /// `NotFoundOrNotPending` when the row is missing or already processed.
    fn update_pending_request(&self, id: i64, fields: &RequestFields) -> Result<()>;

    /// Inserts the server and its owner and marks the request approved, all
    /// in one transaction.
    fn approve_request(&self, id: i64, now: DateTime<Utc>) -> Result<Approval>;
    /// Marks a pending request rejected and returns it as it was before.
    fn reject_request(&self, id: i64) -> Result<ServerRequest>;

    // Server operations
    fn list_servers(&self) -> Result<Vec<ServerListing>>;
    fn get_server(&self, id: i64) -> Result<Option<ServerListing>>;
    fn delete_server(&self, id: i64) -> Result<bool>;

    // Vote operations
    /// Accepts a vote unless the same ip voted for the server after `cooldown_start`.
    fn record_vote(&self, vote: &Vote, cooldown_start: DateTime<Utc>) -> Result<()>;
}
