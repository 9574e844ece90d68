pub const SCHEMA: &str = r#"
-- Listed servers; rows are only created by approving a request
CREATE TABLE IF NOT EXISTS servers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    server_name TEXT NOT NULL,
    url TEXT,
    description TEXT,
    tags TEXT,                                   -- comma-separated free text
    logo_url TEXT,

    -- Observed by external tooling, never set here beyond the defaults
    status TEXT NOT NULL DEFAULT 'unknown',
    online INTEGER NOT NULL DEFAULT 0,
    registered INTEGER NOT NULL DEFAULT 0,

    votes INTEGER NOT NULL DEFAULT 0 CHECK (votes >= 0),
    added TEXT NOT NULL
);

-- Server owners. server_id is not a foreign key: removing a server leaves
-- its owner rows behind.
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL,
    discord_id TEXT NOT NULL,
    server_id INTEGER
);

-- Append-only vote log, one row per accepted vote
CREATE TABLE IF NOT EXISTS votes (
    server_id INTEGER NOT NULL,
    ip TEXT NOT NULL,
    user_name TEXT NOT NULL,
    last_vote TEXT NOT NULL
);

-- Moderation queue
CREATE TABLE IF NOT EXISTS server_requests (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    server_name TEXT NOT NULL,
    url TEXT,
    description TEXT,
    tags TEXT,
    logo_url TEXT,
    owner_name TEXT NOT NULL,
    owner_discord TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending'
        CHECK (status IN ('pending', 'approved', 'rejected')),
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_users_server ON users(server_id);
CREATE INDEX IF NOT EXISTS idx_votes_server_ip ON votes(server_id, ip, last_vote);
CREATE INDEX IF NOT EXISTS idx_requests_status ON server_requests(status, created_at);
"#;
