//! Durable session store with write-through search index
//!
//! All multi-row mutations (content row + FTS row, session-create +
//! event-insert) run inside a single transaction so readers never observe a
//! content row without its index row or vice versa. Writers contend via
//! SQLite's file lock; `write_txn` retries a bounded number of times on
//! DatabaseBusy/DatabaseLocked before surfacing `StoreBusy`.

mod schema;

use rusqlite::{params, Connection, OptionalExtension, Transaction};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

use crate::error::{Result, VaultError};

pub use schema::SCHEMA;

const BUSY_MAX_RETRIES: u32 = 5;

pub struct Store {
    conn: Connection,
}

/// Fields seeding a session row on first reference.
#[derive(Debug, Clone, Default)]
pub struct SessionSeed {
    pub session_id: String,
    pub project_path: Option<String>,
    pub project_name: Option<String>,
    pub started_at: Option<String>,
}

/// One hook event, ready to append.
#[derive(Debug, Clone, Default)]
pub struct NewEvent {
    pub session_id: String,
    pub event_type: String,
    pub tool_name: Option<String>,
    pub tool_input: Option<String>,
    pub tool_response: Option<String>,
    pub prompt: Option<String>,
    pub cwd: Option<String>,
    pub transcript_path: Option<String>,
    pub timestamp: String,
    /// SessionEnd stamps ended_at in the same transaction
    pub ends_session: bool,
}

/// One transcript line, ready to append.
#[derive(Debug, Clone)]
pub struct NewTranscriptEntry {
    pub line_number: i64,
    pub entry_type: Option<String>,
    pub role: Option<String>,
    pub content: Option<String>,
    pub raw_json: String,
    pub timestamp: Option<String>,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| VaultError::StoreUnavailable(format!("{}: {}", parent.display(), e)))?;
        }

        let conn = Connection::open(path)
            .map_err(|e| VaultError::StoreUnavailable(format!("{}: {}", path.display(), e)))?;

        // Short busy timeout: the hook path runs inside the host's critical
        // path and must fail fast rather than hang on a locked store.
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 500;",
        )?;

        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(SCHEMA)
            .map_err(|e| VaultError::StoreCorrupt(e.to_string()))?;
        Ok(())
    }

    /// Read-only access for the integrity checker and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Run `f` inside a transaction, retrying on lock contention with linear
    /// backoff. The transaction either commits whole or leaves no trace.
    fn write_txn<T>(&mut self, mut f: impl FnMut(&Transaction) -> Result<T>) -> Result<T> {
        let mut attempts = 0;
        loop {
            let result = match self.conn.transaction() {
                Ok(tx) => f(&tx).and_then(|value| {
                    tx.commit()?;
                    Ok(value)
                }),
                Err(e) => Err(e.into()),
            };

            match result {
                Ok(value) => return Ok(value),
                Err(e) if e.is_busy() => {
                    attempts += 1;
                    if attempts > BUSY_MAX_RETRIES {
                        return Err(VaultError::StoreBusy { attempts });
                    }
                    std::thread::sleep(Duration::from_millis(u64::from(attempts) * 25));
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn ensure_session_tx(tx: &Transaction, seed: &SessionSeed) -> Result<()> {
        tx.execute(
            "INSERT OR IGNORE INTO sessions (session_id, project_path, project_name, started_at)
             VALUES (?, ?, ?, ?)",
            params![
                seed.session_id,
                seed.project_path,
                seed.project_name,
                seed.started_at,
            ],
        )?;
        Ok(())
    }

    // ============================================
    // WRITES (content + index, atomically)
    // ============================================

    /// Append one hook event. Creates the session row on first reference and
    /// writes the events_fts row in the same transaction.
    pub fn insert_event(&mut self, seed: &SessionSeed, event: &NewEvent) -> Result<i64> {
        self.write_txn(|tx| {
            Self::ensure_session_tx(tx, seed)?;

            if event.ends_session {
                tx.execute(
                    "UPDATE sessions SET ended_at = ? WHERE session_id = ?",
                    params![event.timestamp, event.session_id],
                )?;
            }

            tx.execute(
                "INSERT INTO events (session_id, event_type, tool_name, tool_input,
                                     tool_response, prompt, cwd, transcript_path, timestamp)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    event.session_id,
                    event.event_type,
                    event.tool_name,
                    event.tool_input,
                    event.tool_response,
                    event.prompt,
                    event.cwd,
                    event.transcript_path,
                    event.timestamp,
                ],
            )?;
            let event_id = tx.last_insert_rowid();

            tx.execute(
                "INSERT INTO events_fts (rowid, tool_name, tool_input, tool_response, prompt)
                 VALUES (?, ?, ?, ?, ?)",
                params![
                    event_id,
                    event.tool_name,
                    event.tool_input,
                    event.tool_response,
                    event.prompt,
                ],
            )?;

            Ok(event_id)
        })
    }

    /// Append a batch of transcript lines for one session in one transaction.
    /// Lines already recorded (same line_number) are ignored, which makes
    /// re-sync idempotent regardless of what the caller re-reads.
    /// Returns the number of rows actually added.
    pub fn insert_transcript_entries(
        &mut self,
        seed: &SessionSeed,
        entries: &[NewTranscriptEntry],
    ) -> Result<usize> {
        self.write_txn(|tx| {
            Self::ensure_session_tx(tx, seed)?;

            let mut added = 0;
            let mut insert = tx.prepare_cached(
                "INSERT OR IGNORE INTO transcript_entries
                     (session_id, line_number, entry_type, role, content, raw_json, timestamp)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )?;
            let mut index = tx.prepare_cached(
                "INSERT INTO transcript_fts (rowid, content) VALUES (?, ?)",
            )?;

            for entry in entries {
                let changed = insert.execute(params![
                    seed.session_id,
                    entry.line_number,
                    entry.entry_type,
                    entry.role,
                    entry.content,
                    entry.raw_json,
                    entry.timestamp,
                ])?;
                if changed > 0 {
                    index.execute(params![tx.last_insert_rowid(), entry.content])?;
                    added += 1;
                }
            }

            Ok(added)
        })
    }

    /// Fill in project fields the hooks never supplied, e.g. for a session
    /// recovered from disk before its transcript was read. Existing values win.
    pub fn backfill_session_project(&mut self, seed: &SessionSeed) -> Result<()> {
        if seed.project_path.is_none() && seed.project_name.is_none() {
            return Ok(());
        }
        self.write_txn(|tx| {
            tx.execute(
                "UPDATE sessions
                 SET project_path = COALESCE(project_path, ?2),
                     project_name = COALESCE(project_name, ?3)
                 WHERE session_id = ?1",
                params![seed.session_id, seed.project_path, seed.project_name],
            )?;
            Ok(())
        })
    }

    /// Seed a session row (used by orphan recovery). Returns true if a row
    /// was created, false if the session already existed.
    pub fn create_session_if_missing(&mut self, seed: &SessionSeed) -> Result<bool> {
        self.write_txn(|tx| {
            let changed = tx.execute(
                "INSERT OR IGNORE INTO sessions (session_id, project_path, project_name, started_at)
                 VALUES (?, ?, ?, ?)",
                params![
                    seed.session_id,
                    seed.project_path,
                    seed.project_name,
                    seed.started_at,
                ],
            )?;
            Ok(changed > 0)
        })
    }

    /// Attach a user-assigned name to a session (accepts an id prefix).
    /// Returns the full session id.
    pub fn rename_session(&mut self, id_prefix: &str, custom_name: &str) -> Result<String> {
        let session_id = self.require_session_id(id_prefix)?;
        self.write_txn(|tx| {
            tx.execute(
                "UPDATE sessions SET custom_name = ? WHERE session_id = ?",
                params![custom_name, session_id],
            )?;
            Ok(())
        })?;
        Ok(session_id)
    }

    /// Delete a session and everything under it: events, transcript entries,
    /// and their index rows, in one transaction. External-content FTS tables
    /// are told about each removed row via the special 'delete' insert.
    pub fn delete_session(&mut self, id_prefix: &str) -> Result<String> {
        let session_id = self.require_session_id(id_prefix)?;
        self.write_txn(|tx| {
            tx.execute(
                "INSERT INTO events_fts (events_fts, rowid, tool_name, tool_input, tool_response, prompt)
                 SELECT 'delete', id, tool_name, tool_input, tool_response, prompt
                 FROM events WHERE session_id = ?",
                params![session_id],
            )?;
            tx.execute(
                "INSERT INTO transcript_fts (transcript_fts, rowid, content)
                 SELECT 'delete', id, content
                 FROM transcript_entries WHERE session_id = ?",
                params![session_id],
            )?;
            tx.execute("DELETE FROM events WHERE session_id = ?", params![session_id])?;
            tx.execute(
                "DELETE FROM transcript_entries WHERE session_id = ?",
                params![session_id],
            )?;
            tx.execute("DELETE FROM sessions WHERE session_id = ?", params![session_id])?;
            Ok(())
        })?;
        Ok(session_id)
    }

    // ============================================
    // LOOKUPS
    // ============================================

    /// Resolve a full session id from an exact id or unique-enough prefix.
    pub fn resolve_session_id(&self, id_prefix: &str) -> Result<Option<String>> {
        let row = self
            .conn
            .query_row(
                "SELECT session_id FROM sessions
                 WHERE session_id = ?1 OR session_id LIKE ?2
                 ORDER BY CASE WHEN session_id = ?1 THEN 0 ELSE 1 END
                 LIMIT 1",
                params![id_prefix, format!("{}%", id_prefix)],
                |row| row.get(0),
            )
            .optional()?;
        Ok(row)
    }

    /// Like `resolve_session_id`, but a miss is an error.
    pub fn require_session_id(&self, id_prefix: &str) -> Result<String> {
        self.resolve_session_id(id_prefix)?
            .ok_or_else(|| VaultError::SessionNotFound(id_prefix.to_string()))
    }

    /// Highest already-synced line number for a session (0 if none). This is
    /// the sync cursor; it is derived rather than stored so it cannot drift
    /// from the rows that actually exist.
    pub fn last_synced_line(&self, session_id: &str) -> Result<i64> {
        let max: Option<i64> = self.conn.query_row(
            "SELECT MAX(line_number) FROM transcript_entries WHERE session_id = ?",
            params![session_id],
            |row| row.get(0),
        )?;
        Ok(max.unwrap_or(0))
    }

    /// Latest transcript path recorded by a hook event for this session.
    pub fn transcript_path_for(&self, session_id: &str) -> Result<Option<String>> {
        let path = self
            .conn
            .query_row(
                "SELECT transcript_path FROM events
                 WHERE session_id = ? AND transcript_path IS NOT NULL
                 ORDER BY id DESC LIMIT 1",
                params![session_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(path)
    }

    // ============================================
    // QUERIES
    // ============================================

    /// All known session ids, optionally narrowed by project name substring.
    pub fn session_ids(&self, project_filter: Option<&str>) -> Result<Vec<String>> {
        let (sql, pattern) = match project_filter {
            Some(filter) => (
                "SELECT session_id FROM sessions
                 WHERE project_name LIKE ?1 OR custom_name LIKE ?1
                 ORDER BY session_id",
                Some(format!("%{}%", filter)),
            ),
            None => ("SELECT session_id FROM sessions ORDER BY session_id", None),
        };
        let mut stmt = self.conn.prepare(sql)?;
        let rows = match pattern {
            Some(p) => stmt
                .query_map(params![p], |row| row.get(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?,
            None => stmt
                .query_map([], |row| row.get(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?,
        };
        Ok(rows)
    }

    pub fn list_sessions(
        &self,
        limit: i64,
        project_filter: Option<&str>,
    ) -> Result<Vec<SessionOverview>> {
        let base = r#"SELECT s.session_id, s.project_path, s.project_name, s.custom_name,
                             s.started_at, s.ended_at,
                             (SELECT COUNT(*) FROM events e WHERE e.session_id = s.session_id),
                             (SELECT COUNT(*) FROM transcript_entries t WHERE t.session_id = s.session_id),
                             COALESCE(
                                 (SELECT MAX(t.timestamp) FROM transcript_entries t WHERE t.session_id = s.session_id),
                                 (SELECT MAX(e.timestamp) FROM events e WHERE e.session_id = s.session_id),
                                 s.started_at)
                      FROM sessions s"#;

        let (sql, use_filter) = match project_filter {
            Some(_) => (
                format!(
                    "{} WHERE s.project_name LIKE ?1 OR s.custom_name LIKE ?1
                     ORDER BY 9 DESC LIMIT ?2",
                    base
                ),
                true,
            ),
            None => (format!("{} ORDER BY 9 DESC LIMIT ?1", base), false),
        };

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = if use_filter {
            let pattern = format!("%{}%", project_filter.unwrap_or_default());
            stmt.query_map(params![pattern, limit], map_session_overview)?
                .collect::<std::result::Result<Vec<_>, _>>()?
        } else {
            stmt.query_map(params![limit], map_session_overview)?
                .collect::<std::result::Result<Vec<_>, _>>()?
        };
        Ok(rows)
    }

    pub fn get_session(&self, id_prefix: &str) -> Result<Option<SessionOverview>> {
        let Some(session_id) = self.resolve_session_id(id_prefix)? else {
            return Ok(None);
        };
        let row = self
            .conn
            .query_row(
                r#"SELECT s.session_id, s.project_path, s.project_name, s.custom_name,
                          s.started_at, s.ended_at,
                          (SELECT COUNT(*) FROM events e WHERE e.session_id = s.session_id),
                          (SELECT COUNT(*) FROM transcript_entries t WHERE t.session_id = s.session_id),
                          COALESCE(
                              (SELECT MAX(t.timestamp) FROM transcript_entries t WHERE t.session_id = s.session_id),
                              (SELECT MAX(e.timestamp) FROM events e WHERE e.session_id = s.session_id),
                              s.started_at)
                   FROM sessions s WHERE s.session_id = ?"#,
                params![session_id],
                map_session_overview,
            )
            .optional()?;
        Ok(row)
    }

    pub fn session_events(&self, session_id: &str, limit: i64) -> Result<Vec<EventRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, session_id, event_type, tool_name, tool_input, tool_response,
                    prompt, cwd, transcript_path, timestamp
             FROM events WHERE session_id = ?
             ORDER BY id ASC LIMIT ?",
        )?;
        let rows = stmt
            .query_map(params![session_id, limit], |row| {
                Ok(EventRow {
                    id: row.get(0)?,
                    session_id: row.get(1)?,
                    event_type: row.get(2)?,
                    tool_name: row.get(3)?,
                    tool_input: row.get(4)?,
                    tool_response: row.get(5)?,
                    prompt: row.get(6)?,
                    cwd: row.get(7)?,
                    transcript_path: row.get(8)?,
                    timestamp: row.get(9)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn transcript_entries(&self, session_id: &str) -> Result<Vec<TranscriptEntryRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, session_id, line_number, entry_type, role, content, raw_json, timestamp
             FROM transcript_entries WHERE session_id = ?
             ORDER BY line_number ASC",
        )?;
        let rows = stmt
            .query_map(params![session_id], |row| {
                Ok(TranscriptEntryRow {
                    id: row.get(0)?,
                    session_id: row.get(1)?,
                    line_number: row.get(2)?,
                    entry_type: row.get(3)?,
                    role: row.get(4)?,
                    content: row.get(5)?,
                    raw_json: row.get(6)?,
                    timestamp: row.get(7)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Ranked full-text search over hook events. Best bm25 score first,
    /// most recent first on ties.
    pub fn search_events(
        &self,
        query: &str,
        limit: i64,
        session_id: Option<&str>,
        event_type: Option<&str>,
    ) -> Result<Vec<EventHit>> {
        let mut sql = String::from(
            r#"SELECT e.id, e.session_id, e.event_type, e.tool_name, e.prompt, e.timestamp,
                      s.project_name,
                      snippet(events_fts, -1, '[', ']', '…', 12),
                      bm25(events_fts)
               FROM events_fts
               JOIN events e ON e.id = events_fts.rowid
               JOIN sessions s ON s.session_id = e.session_id
               WHERE events_fts MATCH ?"#,
        );
        let mut bind: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(fts_match_expr(query))];

        if let Some(sid) = session_id {
            sql.push_str(" AND e.session_id = ?");
            bind.push(Box::new(sid.to_string()));
        }
        if let Some(et) = event_type {
            sql.push_str(" AND e.event_type = ?");
            bind.push(Box::new(et.to_string()));
        }
        sql.push_str(" ORDER BY bm25(events_fts), e.timestamp DESC LIMIT ?");
        bind.push(Box::new(limit));

        let mut stmt = self.conn.prepare(&sql)?;
        let bind_refs: Vec<&dyn rusqlite::ToSql> = bind.iter().map(|p| p.as_ref()).collect();
        let rows = stmt
            .query_map(bind_refs.as_slice(), |row| {
                Ok(EventHit {
                    event_id: row.get(0)?,
                    session_id: row.get(1)?,
                    event_type: row.get(2)?,
                    tool_name: row.get(3)?,
                    prompt: row.get(4)?,
                    timestamp: row.get(5)?,
                    project_name: row.get(6)?,
                    snippet: row.get(7)?,
                    score: row.get(8)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Ranked full-text search over transcript content.
    pub fn search_transcripts(
        &self,
        query: &str,
        limit: i64,
        session_id: Option<&str>,
    ) -> Result<Vec<TranscriptHit>> {
        let mut sql = String::from(
            r#"SELECT t.session_id, t.line_number, t.entry_type, t.role, t.timestamp,
                      s.project_name, s.custom_name,
                      snippet(transcript_fts, 0, '[', ']', '…', 12),
                      bm25(transcript_fts)
               FROM transcript_fts
               JOIN transcript_entries t ON t.id = transcript_fts.rowid
               JOIN sessions s ON s.session_id = t.session_id
               WHERE transcript_fts MATCH ?"#,
        );
        let mut bind: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(fts_match_expr(query))];

        if let Some(sid) = session_id {
            sql.push_str(" AND t.session_id = ?");
            bind.push(Box::new(sid.to_string()));
        }
        sql.push_str(" ORDER BY bm25(transcript_fts), t.timestamp DESC LIMIT ?");
        bind.push(Box::new(limit));

        let mut stmt = self.conn.prepare(&sql)?;
        let bind_refs: Vec<&dyn rusqlite::ToSql> = bind.iter().map(|p| p.as_ref()).collect();
        let rows = stmt
            .query_map(bind_refs.as_slice(), |row| {
                Ok(TranscriptHit {
                    session_id: row.get(0)?,
                    line_number: row.get(1)?,
                    entry_type: row.get(2)?,
                    role: row.get(3)?,
                    timestamp: row.get(4)?,
                    project_name: row.get(5)?,
                    custom_name: row.get(6)?,
                    snippet: row.get(7)?,
                    score: row.get(8)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Substring match over session metadata. This is the fallback path for
    /// queries too short for a meaningful full-text search.
    pub fn search_session_titles(&self, query: &str, limit: i64) -> Result<Vec<SessionOverview>> {
        let pattern = format!("%{}%", query);
        let prefix = format!("{}%", query);
        let mut stmt = self.conn.prepare(
            r#"SELECT s.session_id, s.project_path, s.project_name, s.custom_name,
                      s.started_at, s.ended_at,
                      (SELECT COUNT(*) FROM events e WHERE e.session_id = s.session_id),
                      (SELECT COUNT(*) FROM transcript_entries t WHERE t.session_id = s.session_id),
                      COALESCE(
                          (SELECT MAX(t.timestamp) FROM transcript_entries t WHERE t.session_id = s.session_id),
                          (SELECT MAX(e.timestamp) FROM events e WHERE e.session_id = s.session_id),
                          s.started_at)
               FROM sessions s
               WHERE s.project_name LIKE ?1 COLLATE NOCASE
                  OR s.custom_name LIKE ?1 COLLATE NOCASE
                  OR s.session_id LIKE ?2
               ORDER BY 9 DESC LIMIT ?3"#,
        )?;
        let rows = stmt
            .query_map(params![pattern, prefix, limit], map_session_overview)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn stats(&self, db_path: &Path) -> Result<VaultStats> {
        let total_sessions: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?;
        let total_events: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
        let total_entries: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM transcript_entries",
            [],
            |row| row.get(0),
        )?;
        let sessions_with_transcripts: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT session_id) FROM transcript_entries",
            [],
            |row| row.get(0),
        )?;

        let events_by_type = self.count_pairs(
            "SELECT event_type, COUNT(*) FROM events GROUP BY event_type ORDER BY 2 DESC",
        )?;
        let top_projects = self.count_pairs(
            "SELECT project_name, COUNT(*) FROM sessions
             WHERE project_name IS NOT NULL GROUP BY project_name ORDER BY 2 DESC LIMIT 10",
        )?;
        let top_tools = self.count_pairs(
            "SELECT tool_name, COUNT(*) FROM events
             WHERE tool_name IS NOT NULL GROUP BY tool_name ORDER BY 2 DESC LIMIT 10",
        )?;

        let db_size_bytes = std::fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);

        Ok(VaultStats {
            total_sessions,
            total_events,
            total_transcript_entries: total_entries,
            sessions_with_transcripts,
            events_by_type,
            top_projects,
            top_tools,
            db_size_bytes,
        })
    }

    fn count_pairs(&self, sql: &str) -> Result<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

/// Quote the user's query so FTS5 operators in it are treated literally, and
/// add prefix matching so partial words still hit.
fn fts_match_expr(query: &str) -> String {
    format!("\"{}\"*", query.replace('"', "\"\""))
}

fn map_session_overview(row: &rusqlite::Row) -> rusqlite::Result<SessionOverview> {
    Ok(SessionOverview {
        session_id: row.get(0)?,
        project_path: row.get(1)?,
        project_name: row.get(2)?,
        custom_name: row.get(3)?,
        started_at: row.get(4)?,
        ended_at: row.get(5)?,
        event_count: row.get(6)?,
        entry_count: row.get(7)?,
        last_activity: row.get(8)?,
    })
}

// ============================================
// ROW TYPES
// ============================================

#[derive(Debug, Serialize)]
pub struct SessionOverview {
    pub session_id: String,
    pub project_path: Option<String>,
    pub project_name: Option<String>,
    pub custom_name: Option<String>,
    pub started_at: Option<String>,
    pub ended_at: Option<String>,
    pub event_count: i64,
    pub entry_count: i64,
    pub last_activity: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EventRow {
    pub id: i64,
    pub session_id: String,
    pub event_type: String,
    pub tool_name: Option<String>,
    pub tool_input: Option<String>,
    pub tool_response: Option<String>,
    pub prompt: Option<String>,
    pub cwd: Option<String>,
    pub transcript_path: Option<String>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TranscriptEntryRow {
    pub id: i64,
    pub session_id: String,
    pub line_number: i64,
    pub entry_type: Option<String>,
    pub role: Option<String>,
    pub content: Option<String>,
    pub raw_json: String,
    pub timestamp: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EventHit {
    pub event_id: i64,
    pub session_id: String,
    pub event_type: String,
    pub tool_name: Option<String>,
    pub prompt: Option<String>,
    pub timestamp: Option<String>,
    pub project_name: Option<String>,
    pub snippet: String,
    pub score: f64,
}

#[derive(Debug, Serialize)]
pub struct TranscriptHit {
    pub session_id: String,
    pub line_number: i64,
    pub entry_type: Option<String>,
    pub role: Option<String>,
    pub timestamp: Option<String>,
    pub project_name: Option<String>,
    pub custom_name: Option<String>,
    pub snippet: String,
    pub score: f64,
}

#[derive(Debug, Serialize)]
pub struct VaultStats {
    pub total_sessions: i64,
    pub total_events: i64,
    pub total_transcript_entries: i64,
    pub sessions_with_transcripts: i64,
    pub events_by_type: Vec<(String, i64)>,
    pub top_projects: Vec<(String, i64)>,
    pub top_tools: Vec<(String, i64)>,
    pub db_size_bytes: u64,
}
