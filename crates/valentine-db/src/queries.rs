use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, ffi, params};
use tracing::{debug, info, warn};

use crate::error::{Result, StorageError};
use crate::ids::MAX_ID_ATTEMPTS;
use crate::models::{Confession, Creator, InsertConfession, InsertCreator, InsertMessage, Message};
use crate::sqlite::SqliteStorage;
use crate::storage::Storage;

const CREATOR_COLUMNS: &str = "id, display_name, slug, passcode, created_at";
const MESSAGE_COLUMNS: &str = "id, creator_id, type, vibe, content, bouquet_id, note, \
     sender_device, sender_location, sender_timestamp, is_read, is_archived";
const CONFESSION_COLUMNS: &str = "id, sender_name, intent_option, message, response, created_at";

impl Storage for SqliteStorage {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn close(&self) -> Result<()> {
        SqliteStorage::close(self)
    }

    // -- Creators --

    fn create_creator(&self, input: &InsertCreator) -> Result<Creator> {
        let created_at = Utc::now();

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO creators (display_name, slug, passcode, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![input.display_name, input.slug, input.passcode, to_sql_time(&created_at)],
            )
            .map_err(|e| {
                if is_constraint(&e, ffi::SQLITE_CONSTRAINT_UNIQUE) {
                    warn!("Slug '{}' already taken", input.slug);
                    StorageError::Conflict { field: "slug", value: input.slug.clone() }
                } else {
                    e.into()
                }
            })?;

            let creator = Creator {
                id: conn.last_insert_rowid(),
                display_name: input.display_name.clone(),
                slug: input.slug.clone(),
                passcode: input.passcode.clone(),
                created_at,
            };
            info!("Created creator {} ({})", creator.id, creator.slug);
            Ok(creator)
        })
    }

    fn get_creator_by_slug(&self, slug: &str) -> Result<Option<Creator>> {
        debug!("Looking up creator by slug '{}'", slug);
        self.with_conn(|conn| {
            let sql = format!("SELECT {CREATOR_COLUMNS} FROM creators WHERE slug = ?1");
            query_creator(conn, &sql, params![slug])
        })
    }

    fn get_creator_by_id(&self, id: i64) -> Result<Option<Creator>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {CREATOR_COLUMNS} FROM creators WHERE id = ?1");
            query_creator(conn, &sql, params![id])
        })
    }

    // -- Messages --

    fn create_message(&self, input: &InsertMessage) -> Result<Message> {
        let sent_at = Utc::now();

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (creator_id, type, vibe, content, bouquet_id, note,
                    sender_device, sender_location, sender_timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    input.creator_id,
                    input.kind,
                    input.vibe,
                    input.content,
                    input.bouquet_id,
                    input.note,
                    input.sender_device,
                    input.sender_location,
                    to_sql_time(&sent_at),
                ],
            )
            .map_err(|e| {
                if is_constraint(&e, ffi::SQLITE_CONSTRAINT_FOREIGNKEY) {
                    StorageError::UnknownCreator(input.creator_id)
                } else {
                    e.into()
                }
            })?;

            let message = Message {
                id: conn.last_insert_rowid(),
                creator_id: input.creator_id,
                kind: input.kind.clone(),
                vibe: input.vibe.clone(),
                content: input.content.clone(),
                bouquet_id: input.bouquet_id.clone(),
                note: input.note.clone(),
                sender_device: input.sender_device.clone(),
                sender_location: input.sender_location.clone(),
                sender_timestamp: sent_at,
                is_read: false,
                is_archived: false,
            };
            info!("Delivered {} {} to creator {}", message.kind, message.id, message.creator_id);
            Ok(message)
        })
    }

    fn get_messages_for_creator(&self, creator_id: i64) -> Result<Vec<Message>> {
        self.with_conn(|conn| query_messages(conn, creator_id))
    }

    fn update_message_flags(
        &self,
        creator_id: i64,
        message_id: i64,
        read: Option<bool>,
        archived: Option<bool>,
    ) -> Result<Option<Message>> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE messages
                 SET is_read = COALESCE(?3, is_read), is_archived = COALESCE(?4, is_archived)
                 WHERE id = ?1 AND creator_id = ?2",
                params![message_id, creator_id, read, archived],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            query_message(conn, message_id)
        })
    }

    // -- Confessions --

    fn create_confession(&self, input: &InsertConfession) -> Result<Confession> {
        let created_at = Utc::now();

        self.with_conn(|conn| {
            for _ in 0..MAX_ID_ATTEMPTS {
                let id = (self.next_id)();
                let inserted = conn.execute(
                    "INSERT INTO confessions (id, sender_name, intent_option, message, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![id, input.sender_name, input.intent_option, input.message, to_sql_time(&created_at)],
                );

                match inserted {
                    Ok(_) => {
                        info!("Created confession {}", id);
                        return Ok(Confession::new(id, input, created_at));
                    }
                    Err(e) if is_constraint(&e, ffi::SQLITE_CONSTRAINT_PRIMARYKEY) => {
                        warn!("Confession id {} collided, drawing another", id);
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Err(StorageError::IdSpaceExhausted)
        })
    }

    fn get_confession(&self, id: &str) -> Result<Option<Confession>> {
        debug!("Looking up confession {}", id);
        self.with_conn(|conn| query_confession(conn, id))
    }

    fn update_confession_status(&self, id: &str, response: &str) -> Result<Option<Confession>> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE confessions SET response = ?2 WHERE id = ?1",
                params![id, response],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            info!("Confession {} answered '{}'", id, response);
            query_confession(conn, id)
        })
    }
}

// Row types: timestamps stay as text until decoded outside the rusqlite closure.

struct CreatorRow {
    id: i64,
    display_name: String,
    slug: String,
    passcode: String,
    created_at: String,
}

impl CreatorRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            display_name: row.get(1)?,
            slug: row.get(2)?,
            passcode: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    fn decode(self) -> Result<Creator> {
        Ok(Creator {
            created_at: from_sql_time(&self.created_at)?,
            id: self.id,
            display_name: self.display_name,
            slug: self.slug,
            passcode: self.passcode,
        })
    }
}

struct MessageRow {
    id: i64,
    creator_id: i64,
    kind: String,
    vibe: Option<String>,
    content: Option<String>,
    bouquet_id: Option<String>,
    note: Option<String>,
    sender_device: Option<String>,
    sender_location: Option<String>,
    sender_timestamp: String,
    is_read: bool,
    is_archived: bool,
}

impl MessageRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            creator_id: row.get(1)?,
            kind: row.get(2)?,
            vibe: row.get(3)?,
            content: row.get(4)?,
            bouquet_id: row.get(5)?,
            note: row.get(6)?,
            sender_device: row.get(7)?,
            sender_location: row.get(8)?,
            sender_timestamp: row.get(9)?,
            is_read: row.get(10)?,
            is_archived: row.get(11)?,
        })
    }

    fn decode(self) -> Result<Message> {
        Ok(Message {
            sender_timestamp: from_sql_time(&self.sender_timestamp)?,
            id: self.id,
            creator_id: self.creator_id,
            kind: self.kind,
            vibe: self.vibe,
            content: self.content,
            bouquet_id: self.bouquet_id,
            note: self.note,
            sender_device: self.sender_device,
            sender_location: self.sender_location,
            is_read: self.is_read,
            is_archived: self.is_archived,
        })
    }
}

struct ConfessionRow {
    id: String,
    sender_name: String,
    intent_option: String,
    message: String,
    response: Option<String>,
    created_at: String,
}

impl ConfessionRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            sender_name: row.get(1)?,
            intent_option: row.get(2)?,
            message: row.get(3)?,
            response: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    fn decode(self) -> Result<Confession> {
        Ok(Confession {
            created_at: from_sql_time(&self.created_at)?,
            id: self.id,
            sender_name: self.sender_name,
            intent_option: self.intent_option,
            message: self.message,
            response: self.response,
        })
    }
}

fn query_creator(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> Result<Option<Creator>> {
    let mut stmt = conn.prepare(sql)?;
    let row = stmt.query_row(params, CreatorRow::from_row).optional()?;
    row.map(CreatorRow::decode).transpose()
}

fn query_message(conn: &Connection, id: i64) -> Result<Option<Message>> {
    let mut stmt = conn.prepare(&format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ?1"))?;
    let row = stmt.query_row([id], MessageRow::from_row).optional()?;
    row.map(MessageRow::decode).transpose()
}

fn query_messages(conn: &Connection, creator_id: i64) -> Result<Vec<Message>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {MESSAGE_COLUMNS} FROM messages
         WHERE creator_id = ?1
         ORDER BY sender_timestamp DESC, id DESC"
    ))?;

    let rows = stmt
        .query_map([creator_id], MessageRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter().map(MessageRow::decode).collect()
}

fn query_confession(conn: &Connection, id: &str) -> Result<Option<Confession>> {
    let mut stmt = conn.prepare(&format!("SELECT {CONFESSION_COLUMNS} FROM confessions WHERE id = ?1"))?;
    let row = stmt.query_row([id], ConfessionRow::from_row).optional()?;
    row.map(ConfessionRow::decode).transpose()
}

fn is_constraint(err: &rusqlite::Error, extended_code: std::ffi::c_int) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation && e.extended_code == extended_code
    )
}

/// Fixed-width RFC 3339 so that text order in SQLite is time order.
/// Column defaults in the schema produce the same width.
fn to_sql_time(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn from_sql_time(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::Corrupt(format!("timestamp '{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sql_time_is_lexicographically_ordered() {
        let early = DateTime::parse_from_rfc3339("2026-02-14T09:00:00.5Z").unwrap().with_timezone(&Utc);
        let late = DateTime::parse_from_rfc3339("2026-02-14T10:00:00Z").unwrap().with_timezone(&Utc);
        assert!(to_sql_time(&early) < to_sql_time(&late));
        assert_eq!(from_sql_time(&to_sql_time(&early)).unwrap(), early);
    }

    #[test]
    fn column_defaults_decode_and_sort_with_written_timestamps() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let (sarah, sent) = sarah_with_messages(&storage, 1);

        let raw: String = storage
            .with_conn(|conn| {
                conn.execute("INSERT INTO messages (creator_id, type) VALUES (?1, 'bouquet')", [sarah])?;
                Ok(conn.query_row(
                    "SELECT sender_timestamp FROM messages WHERE id = ?1",
                    [conn.last_insert_rowid()],
                    |r| r.get(0),
                )?)
            })
            .unwrap();
        assert_eq!(raw.len(), to_sql_time(&sent[0].sender_timestamp).len(), "{raw}");

        // Defaults have whole-second precision, so the default row can only
        // sort first if its second is later than the written one.
        let inbox = storage.get_messages_for_creator(sarah).unwrap();
        assert_eq!(inbox.len(), 2);
        assert!(inbox[0].sender_timestamp >= inbox[1].sender_timestamp);
        assert_eq!(from_sql_time(&raw).unwrap().timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn undecodable_timestamp_is_corrupt() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let (sarah, _) = sarah_with_messages(&storage, 1);
        storage
            .with_conn(|conn| {
                conn.execute("UPDATE messages SET sender_timestamp = 'yesterday'", [])?;
                Ok(())
            })
            .unwrap();

        let err = storage.get_messages_for_creator(sarah).unwrap_err();
        assert!(matches!(err, StorageError::Corrupt(_)), "{err:?}");
        assert!(matches!(from_sql_time("2026-02-14 09:30:00"), Err(StorageError::Corrupt(_))));
    }

    fn sarah_with_messages(storage: &SqliteStorage, count: usize) -> (i64, Vec<Message>) {
        let sarah = storage
            .create_creator(&InsertCreator {
                display_name: "Sarah".into(),
                slug: "sarah".into(),
                passcode: "roses".into(),
            })
            .unwrap();
        let messages = (0..count)
            .map(|i| {
                storage
                    .create_message(&InsertMessage {
                        creator_id: sarah.id,
                        kind: "confession".into(),
                        content: Some(format!("note {i}")),
                        ..Default::default()
                    })
                    .unwrap()
            })
            .collect();
        (sarah.id, messages)
    }

    #[test]
    fn inbox_orders_by_timestamp_not_id() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let (sarah, sent) = sarah_with_messages(&storage, 2);
        let (newer, older) = (&sent[0], &sent[1]);
        assert!(older.id > newer.id);

        let backdated = newer.sender_timestamp - chrono::Duration::hours(1);
        storage
            .with_conn(|conn| {
                conn.execute(
                    "UPDATE messages SET sender_timestamp = ?2 WHERE id = ?1",
                    params![older.id, to_sql_time(&backdated)],
                )?;
                Ok(())
            })
            .unwrap();

        let inbox = storage.get_messages_for_creator(sarah).unwrap();
        let ids: Vec<i64> = inbox.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
        assert_eq!(inbox[1].sender_timestamp, backdated);
    }

    #[test]
    fn forced_id_collisions_exhaust_attempts() {
        let storage = SqliteStorage::open_in_memory()
            .unwrap()
            .with_id_generator(|| "samesame".to_string());
        let input = InsertConfession {
            sender_name: "Kit".into(),
            intent_option: "Playing games together".into(),
            message: "Mario Kart rematch?".into(),
        };

        let first = storage.create_confession(&input).unwrap();
        assert_eq!(first.id, "samesame");

        let err = storage.create_confession(&input).unwrap_err();
        assert!(matches!(err, StorageError::IdSpaceExhausted), "{err:?}");
    }
}
