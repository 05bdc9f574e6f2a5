use rusqlite::Connection;
use tracing::info;

use crate::error::Result;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (creators, messages, confessions)");
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS creators (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                display_name    TEXT NOT NULL,
                slug            TEXT NOT NULL UNIQUE,
                passcode        TEXT NOT NULL,
                created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%S', 'now') || '.000000000Z')
            );

            CREATE TABLE IF NOT EXISTS messages (
                id                  INTEGER PRIMARY KEY AUTOINCREMENT,
                creator_id          INTEGER NOT NULL REFERENCES creators(id),
                type                TEXT NOT NULL,
                vibe                TEXT,
                content             TEXT,
                bouquet_id          TEXT,
                note                TEXT,
                sender_device       TEXT,
                sender_location     TEXT,
                sender_timestamp    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%S', 'now') || '.000000000Z'),
                is_read             INTEGER NOT NULL DEFAULT 0,
                is_archived         INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_messages_creator
                ON messages(creator_id, sender_timestamp);

            CREATE TABLE IF NOT EXISTS confessions (
                id              TEXT PRIMARY KEY,
                sender_name     TEXT NOT NULL,
                intent_option   TEXT NOT NULL,
                message         TEXT NOT NULL,
                response        TEXT,
                created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%S', 'now') || '.000000000Z')
            );

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
