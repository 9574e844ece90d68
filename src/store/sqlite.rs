use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

const REQUEST_COLUMNS: &str = "id, server_name, url, description, tags, logo_url, owner_name, owner_discord, status, created_at";

const LISTING_SELECT: &str = "SELECT s.id, s.server_name, s.url, s.description, s.tags, s.logo_url,
            s.status, s.online, s.registered, s.votes, s.added, u.username
     FROM servers s
     JOIN users u ON u.id = (SELECT MIN(o.id) FROM users o WHERE o.server_id = s.id)";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Raw connection access for tests that seed or inspect rows directly.
    #[cfg(test)]
    pub(crate) fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn()
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

/// Fixed-width UTC timestamps, so that text order matches time order.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Trims optional text and collapses blanks to NULL.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl ToSql for RequestStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for RequestStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        RequestStatus::parse(s)
            .ok_or_else(|| FromSqlError::Other(format!("unknown request status '{s}'").into()))
    }
}

impl ToSql for ServerStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ServerStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Ok(ServerStatus::parse_lenient(value.as_str()?))
    }
}

fn request_from_row(row: &Row<'_>) -> rusqlite::Result<ServerRequest> {
    Ok(ServerRequest {
        id: row.get(0)?,
        server_name: row.get(1)?,
        url: row.get(2)?,
        description: row.get(3)?,
        tags: row.get(4)?,
        logo_url: row.get(5)?,
        owner_name: row.get(6)?,
        owner_discord: row.get(7)?,
        status: row.get(8)?,
        created_at: parse_datetime(&row.get::<_, String>(9)?),
    })
}

fn listing_from_row(row: &Row<'_>) -> rusqlite::Result<ServerListing> {
    Ok(ServerListing {
        server: Server {
            id: row.get(0)?,
            server_name: row.get(1)?,
            url: row.get(2)?,
            description: row.get(3)?,
            tags: row.get(4)?,
            logo_url: row.get(5)?,
            status: row.get(6)?,
            online: row.get(7)?,
            registered: row.get(8)?,
            votes: row.get(9)?,
            added: parse_datetime(&row.get::<_, String>(10)?),
        },
        owner: row.get(11)?,
    })
}

fn pending_request(conn: &Connection, id: i64) -> Result<Option<ServerRequest>> {
    conn.query_row(
        &format!("SELECT {REQUEST_COLUMNS} FROM server_requests WHERE id = ?1 AND status = ?2"),
        params![id, RequestStatus::Pending],
        request_from_row,
    )
    .optional()
    .map_err(Error::from)
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // Request queue operations

    fn create_request(&self, fields: &RequestFields, created_at: DateTime<Utc>) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO server_requests
                (server_name, url, description, tags, logo_url, owner_name, owner_discord, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                fields.server_name,
                non_empty(&fields.url),
                non_empty(&fields.description),
                non_empty(&fields.tags),
                non_empty(&fields.logo_url),
                fields.owner_name,
                fields.owner_discord,
                RequestStatus::Pending,
                format_datetime(&created_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get_request(&self, id: i64) -> Result<Option<ServerRequest>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {REQUEST_COLUMNS} FROM server_requests WHERE id = ?1"),
            params![id],
            request_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_pending_requests(&self) -> Result<Vec<ServerRequest>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {REQUEST_COLUMNS} FROM server_requests
             WHERE status = ?1 ORDER BY created_at DESC, id DESC"
        ))?;

        let rows = stmt.query_map(params![RequestStatus::Pending], request_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_pending_request(&self, id: i64, fields: &RequestFields) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let status: Option<RequestStatus> = tx
            .query_row(
                "SELECT status FROM server_requests WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        let next = status
            .ok_or(Error::NotFoundOrNotPending)?
            .apply(ModerationAction::Edit)?;

        let rows = tx.execute(
            "UPDATE server_requests
             SET server_name = ?1, url = ?2, description = ?3, tags = ?4, logo_url = ?5,
                 owner_name = ?6, owner_discord = ?7, status = ?8
             WHERE id = ?9 AND status = ?10",
            params![
                fields.server_name,
                non_empty(&fields.url),
                non_empty(&fields.description),
                non_empty(&fields.tags),
                non_empty(&fields.logo_url),
                fields.owner_name,
                fields.owner_discord,
                next,
                id,
                RequestStatus::Pending,
            ],
        )?;
        if rows == 0 {
            return Err(Error::NotFoundOrNotPending);
        }

        tx.commit()?;
        Ok(())
    }

    fn approve_request(&self, id: i64, now: DateTime<Utc>) -> Result<Approval> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let request = pending_request(&tx, id)?.ok_or(Error::NotFoundOrAlreadyProcessed)?;
        let next = request.status.apply(ModerationAction::Approve)?;

        tx.execute(
            "INSERT INTO servers (server_name, url, description, tags, logo_url, status, votes, added)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7)",
            params![
                request.server_name,
                request.url,
                request.description,
                request.tags,
                request.logo_url,
                ServerStatus::Unknown,
                format_datetime(&now),
            ],
        )?;
        let server_id = tx.last_insert_rowid();

        tx.execute(
            "INSERT INTO users (username, discord_id, server_id) VALUES (?1, ?2, ?3)",
            params![request.owner_name, request.owner_discord, server_id],
        )?;
        let owner = Owner {
            id: tx.last_insert_rowid(),
            username: request.owner_name.clone(),
            discord_id: request.owner_discord.clone(),
            server_id: Some(server_id),
        };

        let rows = tx.execute(
            "UPDATE server_requests SET status = ?1 WHERE id = ?2 AND status = ?3",
            params![next, id, RequestStatus::Pending],
        )?;
        if rows == 0 {
            // Dropping the transaction rolls back the server and owner rows.
            return Err(Error::NotFoundOrAlreadyProcessed);
        }

        tx.commit()?;

        Ok(Approval {
            request,
            server_id,
            owner,
        })
    }

    fn reject_request(&self, id: i64) -> Result<ServerRequest> {
        let conn = self.conn();

        let request = pending_request(&conn, id)?.ok_or(Error::NotFoundOrAlreadyProcessed)?;
        let next = request.status.apply(ModerationAction::Reject)?;

        let rows = conn.execute(
            "UPDATE server_requests SET status = ?1 WHERE id = ?2 AND status = ?3",
            params![next, id, RequestStatus::Pending],
        )?;
        if rows == 0 {
            return Err(Error::NotFoundOrAlreadyProcessed);
        }

        Ok(request)
    }

    // Server operations

    fn list_servers(&self) -> Result<Vec<ServerListing>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "{LISTING_SELECT} ORDER BY s.votes DESC, s.added DESC, s.id DESC"
        ))?;

        let rows = stmt.query_map([], listing_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn get_server(&self, id: i64) -> Result<Option<ServerListing>> {
        let conn = self.conn();
        conn.query_row(
            &format!("{LISTING_SELECT} WHERE s.id = ?1"),
            params![id],
            listing_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn delete_server(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM servers WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Vote operations

    fn record_vote(&self, vote: &Vote, cooldown_start: DateTime<Utc>) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let recent: Option<String> = tx
            .query_row(
                "SELECT last_vote FROM votes
                 WHERE server_id = ?1 AND ip = ?2 AND last_vote > ?3
                 ORDER BY last_vote DESC LIMIT 1",
                params![vote.server_id, vote.ip, format_datetime(&cooldown_start)],
                |row| row.get(0),
            )
            .optional()?;
        if recent.is_some() {
            return Err(Error::TooSoon);
        }

        let rows = tx.execute(
            "UPDATE servers SET votes = votes + 1 WHERE id = ?1",
            params![vote.server_id],
        )?;
        if rows == 0 {
            return Err(Error::NotFound);
        }

        tx.execute(
            "INSERT INTO votes (server_id, ip, user_name, last_vote) VALUES (?1, ?2, ?3, ?4)",
            params![
                vote.server_id,
                vote.ip,
                vote.user_name,
                format_datetime(&vote.last_vote),
            ],
        )?;

        tx.commit()?;
        Ok(())
    }
}
