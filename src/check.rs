//! Integrity checker
//!
//! Cross-checks the content tables against their FTS index tables and against
//! the transcript files on disk. Everything is read-only; repair is a manual
//! decision left to the operator.

use serde::Serialize;
use std::io::BufRead;

use crate::config::Config;
use crate::discover;
use crate::error::Result;
use crate::store::Store;

/// One content table paired against its index table.
#[derive(Debug, Serialize)]
pub struct IndexPairing {
    pub content_rows: i64,
    pub index_rows: i64,
    /// Content row ids with no index row. These rows exist but are unsearchable.
    pub missing_from_index: Vec<i64>,
    /// Index rowids pointing at no content row. These can surface phantom hits.
    pub orphaned_index_rows: Vec<i64>,
}

impl IndexPairing {
    pub fn is_clean(&self) -> bool {
        self.missing_from_index.is_empty() && self.orphaned_index_rows.is_empty()
    }
}

/// A transcript file on disk that is now shorter than what was synced from it.
/// Informational only: stored rows are kept, the cursor simply stops advancing.
#[derive(Debug, Serialize)]
pub struct ShrunkFile {
    pub session_id: String,
    pub path: String,
    pub synced_lines: i64,
    pub file_lines: i64,
}

#[derive(Debug, Serialize)]
pub struct IntegrityReport {
    pub events: IndexPairing,
    pub transcripts: IndexPairing,
    /// Event rows whose session_id has no sessions row. The schema's foreign
    /// keys should make this impossible; a non-empty list means the store was
    /// written by something that bypassed them.
    pub dangling_event_sessions: Vec<String>,
    pub dangling_entry_sessions: Vec<String>,
    pub shrunk_files: Vec<ShrunkFile>,
}

impl IntegrityReport {
    /// True when no structural problem was found. Shrunk files are reported
    /// but do not fail the check.
    pub fn is_clean(&self) -> bool {
        self.events.is_clean()
            && self.transcripts.is_clean()
            && self.dangling_event_sessions.is_empty()
            && self.dangling_entry_sessions.is_empty()
    }
}

pub fn check(store: &Store, config: &Config) -> Result<IntegrityReport> {
    let conn = store.connection();

    let events = pairing(
        conn,
        "events",
        "events_fts",
        "SELECT id FROM events WHERE id NOT IN (SELECT rowid FROM events_fts) ORDER BY id",
        "SELECT rowid FROM events_fts WHERE rowid NOT IN (SELECT id FROM events) ORDER BY rowid",
    )?;
    let transcripts = pairing(
        conn,
        "transcript_entries",
        "transcript_fts",
        "SELECT id FROM transcript_entries
         WHERE id NOT IN (SELECT rowid FROM transcript_fts) ORDER BY id",
        "SELECT rowid FROM transcript_fts
         WHERE rowid NOT IN (SELECT id FROM transcript_entries) ORDER BY rowid",
    )?;

    let dangling_event_sessions = string_column(
        conn,
        "SELECT DISTINCT session_id FROM events
         WHERE session_id NOT IN (SELECT session_id FROM sessions) ORDER BY session_id",
    )?;
    let dangling_entry_sessions = string_column(
        conn,
        "SELECT DISTINCT session_id FROM transcript_entries
         WHERE session_id NOT IN (SELECT session_id FROM sessions) ORDER BY session_id",
    )?;

    let shrunk_files = find_shrunk_files(store, config)?;

    Ok(IntegrityReport {
        events,
        transcripts,
        dangling_event_sessions,
        dangling_entry_sessions,
        shrunk_files,
    })
}

fn pairing(
    conn: &rusqlite::Connection,
    content_table: &str,
    index_table: &str,
    missing_sql: &str,
    orphaned_sql: &str,
) -> Result<IndexPairing> {
    let content_rows: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", content_table),
        [],
        |row| row.get(0),
    )?;
    let index_rows: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", index_table),
        [],
        |row| row.get(0),
    )?;

    Ok(IndexPairing {
        content_rows,
        index_rows,
        missing_from_index: id_column(conn, missing_sql)?,
        orphaned_index_rows: id_column(conn, orphaned_sql)?,
    })
}

fn id_column(conn: &rusqlite::Connection, sql: &str) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn string_column(conn: &rusqlite::Connection, sql: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Compare each session's sync cursor against the physical line count of its
/// transcript file. A file shorter than the cursor usually means it was
/// rewritten or truncated out from under us.
fn find_shrunk_files(store: &Store, config: &Config) -> Result<Vec<ShrunkFile>> {
    let mut shrunk = Vec::new();
    for transcript in
        discover::find_transcripts(&config.projects_dir(), config.sync.skip_subagents)
    {
        let synced = store.last_synced_line(&transcript.session_id)?;
        if synced == 0 {
            continue;
        }
        let Ok(file) = std::fs::File::open(&transcript.path) else {
            continue;
        };
        let file_lines = std::io::BufReader::new(file).lines().count() as i64;
        if file_lines < synced {
            shrunk.push(ShrunkFile {
                session_id: transcript.session_id,
                path: transcript.path.to_string_lossy().to_string(),
                synced_lines: synced,
                file_lines,
            });
        }
    }
    shrunk.sort_by(|a, b| a.session_id.cmp(&b.session_id));
    Ok(shrunk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{NewEvent, NewTranscriptEntry, SessionSeed};
    use std::fs;

    fn setup() -> (tempfile::TempDir, Store, Config) {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::open(&tmp.path().join("vault.db")).unwrap();
        let mut config = Config::default();
        config.claude.projects_dir = tmp.path().join("projects").to_string_lossy().to_string();
        (tmp, store, config)
    }

    fn seed(session_id: &str) -> SessionSeed {
        SessionSeed {
            session_id: session_id.to_string(),
            ..Default::default()
        }
    }

    fn populate(store: &mut Store) {
        store
            .insert_event(
                &seed("s1"),
                &NewEvent {
                    session_id: "s1".to_string(),
                    event_type: "UserPromptSubmit".to_string(),
                    prompt: Some("hello".to_string()),
                    timestamp: "2025-06-01T10:00:00Z".to_string(),
                    ..Default::default()
                },
            )
            .unwrap();
        store
            .insert_transcript_entries(
                &seed("s1"),
                &[NewTranscriptEntry {
                    line_number: 1,
                    entry_type: Some("user".to_string()),
                    role: Some("user".to_string()),
                    content: Some("hello".to_string()),
                    raw_json: "{}".to_string(),
                    timestamp: Some("2025-06-01T10:00:00Z".to_string()),
                }],
            )
            .unwrap();
    }

    #[test]
    fn test_clean_store_reports_clean() {
        let (_tmp, mut store, config) = setup();
        populate(&mut store);

        let report = check(&store, &config).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.events.content_rows, 1);
        assert_eq!(report.events.index_rows, 1);
        assert_eq!(report.transcripts.content_rows, 1);
        assert!(report.shrunk_files.is_empty());
    }

    #[test]
    fn test_detects_missing_index_row() {
        let (_tmp, mut store, config) = setup();
        populate(&mut store);

        // plant drift: content row without an index row
        store
            .connection()
            .execute(
                "INSERT INTO events (session_id, event_type, timestamp)
                 VALUES ('s1', 'PostToolUse', '2025-06-01T10:00:01Z')",
                [],
            )
            .unwrap();

        let report = check(&store, &config).unwrap();
        assert!(!report.is_clean());
        assert_eq!(report.events.missing_from_index.len(), 1);
        assert!(report.events.orphaned_index_rows.is_empty());
    }

    #[test]
    fn test_detects_orphaned_index_row() {
        let (_tmp, mut store, config) = setup();
        populate(&mut store);

        // plant drift: delete content while leaving the index row behind
        store
            .connection()
            .execute("DELETE FROM transcript_entries WHERE session_id = 's1'", [])
            .unwrap();

        let report = check(&store, &config).unwrap();
        assert!(!report.is_clean());
        assert_eq!(report.transcripts.orphaned_index_rows.len(), 1);
    }

    #[test]
    fn test_shrunk_file_is_informational() {
        let (_tmp, mut store, config) = setup();
        let dir = config.projects_dir().join("-Users-dev-demo");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("s1.jsonl"), "{\"type\":\"user\"}\n").unwrap();

        let entries: Vec<_> = (1..=3)
            .map(|n| NewTranscriptEntry {
                line_number: n,
                entry_type: Some("user".to_string()),
                role: None,
                content: Some("x".to_string()),
                raw_json: "{}".to_string(),
                timestamp: None,
            })
            .collect();
        store.insert_transcript_entries(&seed("s1"), &entries).unwrap();

        let report = check(&store, &config).unwrap();
        assert_eq!(report.shrunk_files.len(), 1);
        assert_eq!(report.shrunk_files[0].synced_lines, 3);
        assert_eq!(report.shrunk_files[0].file_lines, 1);
        // structural integrity is still intact
        assert!(report.is_clean());
    }
}
