//! Transcript synchronizer
//!
//! Advances each session's sync cursor by re-reading its transcript file and
//! appending lines beyond the highest line number already stored. The cursor
//! is derived (MAX(line_number)), so re-running sync on an unchanged file is a
//! no-op scan and re-processing can never duplicate a line. The
//! (session_id, line_number) uniqueness constraint is the real guarantee,
//! not any offset bookkeeping.

use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::discover;
use crate::error::Result;
use crate::store::{NewTranscriptEntry, SessionSeed, Store};
use crate::transcript::extract_entry;

/// What to sync: everything, one session (id or prefix), or one project.
#[derive(Debug, Clone)]
pub enum SyncScope {
    All,
    Session(String),
    Project(String),
}

/// Per-session sync result.
#[derive(Debug, Serialize)]
pub struct SyncOutcome {
    pub session_id: String,
    pub entries_added: usize,
    pub lines_skipped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregated result over the whole scope.
#[derive(Debug, Default, Serialize)]
pub struct SyncReport {
    pub sessions_scanned: usize,
    pub entries_added: usize,
    pub lines_skipped: usize,
    pub sessions: Vec<SyncOutcome>,
}

/// Sync every eligible session in the scope. A failing session is recorded in
/// its outcome and never aborts the rest; each session's new lines commit in
/// one transaction, so interruption between sessions is always safe.
pub fn sync(store: &mut Store, config: &Config, scope: &SyncScope) -> Result<SyncReport> {
    let session_ids = match scope {
        SyncScope::All => store.session_ids(None)?,
        SyncScope::Project(filter) => store.session_ids(Some(filter))?,
        SyncScope::Session(prefix) => match store.resolve_session_id(prefix)? {
            Some(id) => vec![id],
            None => Vec::new(),
        },
    };

    let mut report = SyncReport::default();
    for session_id in session_ids {
        report.sessions_scanned += 1;
        match sync_session(store, config, &session_id) {
            Ok((entries_added, lines_skipped)) => {
                report.entries_added += entries_added;
                report.lines_skipped += lines_skipped;
                report.sessions.push(SyncOutcome {
                    session_id,
                    entries_added,
                    lines_skipped,
                    error: None,
                });
            }
            Err(e) => report.sessions.push(SyncOutcome {
                session_id,
                entries_added: 0,
                lines_skipped: 0,
                error: Some(e.to_string()),
            }),
        }
    }
    Ok(report)
}

/// Sync one session: resolve its transcript file, read past the cursor,
/// append what is new. Returns (entries_added, lines_skipped).
pub fn sync_session(store: &mut Store, config: &Config, session_id: &str) -> Result<(usize, usize)> {
    let Some(path) = resolve_transcript_path(store, config, session_id)? else {
        return Ok((0, 0));
    };
    if !path.exists() {
        return Ok((0, 0));
    }

    let last_synced = store.last_synced_line(session_id)?;
    let (entries, lines_skipped, cwd) = read_new_lines(&path, last_synced)?;
    if entries.is_empty() {
        return Ok((0, lines_skipped));
    }

    let seed = seed_from_path(session_id, &path, entries.first(), cwd.as_deref());
    let entries_added = store.insert_transcript_entries(&seed, &entries)?;
    store.backfill_session_project(&seed)?;
    Ok((entries_added, lines_skipped))
}

/// Transcript path from the session's hook events, else from disk discovery.
fn resolve_transcript_path(
    store: &Store,
    config: &Config,
    session_id: &str,
) -> Result<Option<PathBuf>> {
    if let Some(path) = store.transcript_path_for(session_id)? {
        let path = PathBuf::from(path);
        if path.exists() {
            return Ok(Some(path));
        }
    }
    Ok(
        discover::find_session_file(&config.projects_dir(), session_id, config.sync.skip_subagents)
            .map(|t| t.path),
    )
}

/// Stream the file, skipping lines at or before the cursor. Line numbers are
/// physical and 1-based; blank lines consume a number silently, malformed
/// lines consume a number and bump the skip counter (a truncated trailing
/// line from a crash mid-write lands here).
fn read_new_lines(
    path: &Path,
    last_synced: i64,
) -> Result<(Vec<NewTranscriptEntry>, usize, Option<String>)> {
    let reader = BufReader::new(File::open(path)?);
    let mut entries = Vec::new();
    let mut lines_skipped = 0;
    let mut cwd = None;

    for (idx, line) in reader.lines().enumerate() {
        let line_number = idx as i64 + 1;
        if line_number <= last_synced {
            continue;
        }
        let line = match line {
            Ok(l) => l,
            Err(_) => {
                lines_skipped += 1;
                continue;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let parsed: serde_json::Value = match serde_json::from_str(trimmed) {
            Ok(v) => v,
            Err(_) => {
                lines_skipped += 1;
                continue;
            }
        };

        let extracted = extract_entry(&parsed);
        if cwd.is_none() {
            cwd = extracted.cwd.clone();
        }
        entries.push(NewTranscriptEntry {
            line_number,
            entry_type: extracted.entry_type,
            role: extracted.role,
            content: extracted.content,
            raw_json: trimmed.to_string(),
            timestamp: extracted.timestamp,
        });
    }

    Ok((entries, lines_skipped, cwd))
}

/// Session seed for the synchronizer path: project info from the transcript's
/// own cwd field where present (the exact path, not the lossy directory
/// encoding), else decoded from the parent directory name; started_at from
/// the first new entry.
fn seed_from_path(
    session_id: &str,
    path: &Path,
    first: Option<&NewTranscriptEntry>,
    cwd: Option<&str>,
) -> SessionSeed {
    let encoded_dir = path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str());
    SessionSeed {
        session_id: session_id.to_string(),
        project_path: cwd
            .map(String::from)
            .or_else(|| encoded_dir.map(discover::decode_project_path)),
        project_name: cwd
            .and_then(discover::project_name_from_cwd)
            .or_else(|| encoded_dir.map(discover::project_name_from_encoded)),
        started_at: first.and_then(|e| e.timestamp.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SessionSeed;
    use std::fs;
    use std::io::Write;

    fn setup() -> (tempfile::TempDir, Store, Config) {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::open(&tmp.path().join("vault.db")).unwrap();
        let mut config = Config::default();
        config.claude.projects_dir = tmp.path().join("projects").to_string_lossy().to_string();
        (tmp, store, config)
    }

    fn write_transcript(config: &Config, session_id: &str, lines: &[&str]) -> PathBuf {
        let dir = config.projects_dir().join("-Users-dev-demo");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("{}.jsonl", session_id));
        fs::write(&path, lines.join("\n") + "\n").unwrap();
        path
    }

    fn user_line(n: usize) -> String {
        format!(
            r#"{{"type":"user","timestamp":"2025-06-01T10:00:{:02}Z","message":{{"role":"user","content":"message {}"}}}}"#,
            n, n
        )
    }

    fn known_session(store: &mut Store, session_id: &str) {
        store
            .create_session_if_missing(&SessionSeed {
                session_id: session_id.to_string(),
                ..Default::default()
            })
            .unwrap();
    }

    #[test]
    fn test_sync_twice_is_idempotent() {
        let (_tmp, mut store, config) = setup();
        let lines: Vec<String> = (1..=10).map(user_line).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        write_transcript(&config, "sess-1", &refs);
        known_session(&mut store, "sess-1");

        let first = sync(&mut store, &config, &SyncScope::All).unwrap();
        assert_eq!(first.entries_added, 10);
        let second = sync(&mut store, &config, &SyncScope::All).unwrap();
        assert_eq!(second.entries_added, 0);
        assert_eq!(second.lines_skipped, 0);

        let total: i64 = store
            .connection()
            .query_row("SELECT COUNT(*) FROM transcript_entries", [], |r| r.get(0))
            .unwrap();
        assert_eq!(total, 10);
    }

    #[test]
    fn test_sync_picks_up_appended_lines() {
        let (_tmp, mut store, config) = setup();
        let lines: Vec<String> = (1..=3).map(user_line).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let path = write_transcript(&config, "sess-1", &refs);
        known_session(&mut store, "sess-1");

        sync(&mut store, &config, &SyncScope::All).unwrap();

        let mut f = fs::OpenOptions::new().append(true).open(&path).unwrap();
        for n in 4..=7 {
            writeln!(f, "{}", user_line(n)).unwrap();
        }

        let report = sync(&mut store, &config, &SyncScope::All).unwrap();
        assert_eq!(report.entries_added, 4);
        assert_eq!(store.last_synced_line("sess-1").unwrap(), 7);
    }

    #[test]
    fn test_truncated_trailing_line_is_skipped_not_fatal() {
        let (_tmp, mut store, config) = setup();
        let mut lines: Vec<String> = (1..=4).map(user_line).collect();
        lines.push(r#"{"type":"user","message":{"role":"us"#.to_string());
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        write_transcript(&config, "sess-1", &refs);
        known_session(&mut store, "sess-1");

        let report = sync(&mut store, &config, &SyncScope::All).unwrap();
        assert_eq!(report.entries_added, 4);
        assert_eq!(report.lines_skipped, 1);

        // once the host finishes the line, the next sync picks it up
        let path = config.projects_dir().join("-Users-dev-demo/sess-1.jsonl");
        let mut full: Vec<String> = (1..=4).map(user_line).collect();
        full.push(user_line(5));
        fs::write(&path, full.join("\n") + "\n").unwrap();

        let report = sync(&mut store, &config, &SyncScope::All).unwrap();
        assert_eq!(report.entries_added, 1);
        assert_eq!(report.lines_skipped, 0);
    }

    #[test]
    fn test_blank_lines_keep_numbering_without_skip_count() {
        let (_tmp, mut store, config) = setup();
        let l1 = user_line(1);
        let l3 = user_line(3);
        let lines = vec![l1.as_str(), "", l3.as_str()];
        write_transcript(&config, "sess-1", &lines);
        known_session(&mut store, "sess-1");

        let report = sync(&mut store, &config, &SyncScope::All).unwrap();
        assert_eq!(report.entries_added, 2);
        assert_eq!(report.lines_skipped, 0);
        // physical line numbers survive the blank
        assert_eq!(store.last_synced_line("sess-1").unwrap(), 3);
    }

    #[test]
    fn test_session_scope_uses_prefix() {
        let (_tmp, mut store, config) = setup();
        let l1 = user_line(1);
        write_transcript(&config, "abcdef-1234", &[l1.as_str()]);
        write_transcript(&config, "other-5678", &[l1.as_str()]);
        known_session(&mut store, "abcdef-1234");
        known_session(&mut store, "other-5678");

        let report = sync(&mut store, &config, &SyncScope::Session("abcdef".into())).unwrap();
        assert_eq!(report.sessions_scanned, 1);
        assert_eq!(report.entries_added, 1);
        assert_eq!(report.sessions[0].session_id, "abcdef-1234");
    }

    #[test]
    fn test_sync_prefers_event_transcript_path() {
        let (tmp, mut store, config) = setup();
        // transcript lives outside the projects root; only the hook knows it
        let outside = tmp.path().join("-Users-dev-elsewhere");
        fs::create_dir_all(&outside).unwrap();
        let path = outside.join("sess-x.jsonl");
        fs::write(&path, user_line(1) + "\n").unwrap();

        let payload = crate::hook::HookPayload {
            session_id: "sess-x".into(),
            hook_event_name: "SessionStart".into(),
            transcript_path: Some(path.to_string_lossy().to_string()),
            ..Default::default()
        };
        crate::hook::ingest(&mut store, &payload).unwrap();

        let report = sync(&mut store, &config, &SyncScope::Session("sess-x".into())).unwrap();
        assert_eq!(report.entries_added, 1);
    }

    #[test]
    fn test_sync_backfills_project_from_transcript_cwd() {
        let (_tmp, mut store, config) = setup();
        let line = r#"{"type":"user","timestamp":"2025-06-01T10:00:00Z","cwd":"/Users/dev/actual-name","message":{"role":"user","content":"hi"}}"#;
        write_transcript(&config, "sess-1", &[line]);
        // session known from a hook that carried no project info
        known_session(&mut store, "sess-1");

        sync(&mut store, &config, &SyncScope::All).unwrap();

        let session = store.get_session("sess-1").unwrap().unwrap();
        assert_eq!(session.project_path.as_deref(), Some("/Users/dev/actual-name"));
        assert_eq!(session.project_name.as_deref(), Some("actual-name"));
    }

    #[test]
    fn test_backfill_never_overwrites_hook_project() {
        let (_tmp, mut store, config) = setup();
        let line = r#"{"type":"user","timestamp":"2025-06-01T10:00:00Z","cwd":"/Users/dev/other","message":{"role":"user","content":"hi"}}"#;
        write_transcript(&config, "sess-1", &[line]);
        store
            .create_session_if_missing(&SessionSeed {
                session_id: "sess-1".to_string(),
                project_path: Some("/Users/dev/demo".to_string()),
                project_name: Some("demo".to_string()),
                ..Default::default()
            })
            .unwrap();

        sync(&mut store, &config, &SyncScope::All).unwrap();

        let session = store.get_session("sess-1").unwrap().unwrap();
        assert_eq!(session.project_name.as_deref(), Some("demo"));
    }

    #[test]
    fn test_missing_file_is_quiet_noop() {
        let (_tmp, mut store, config) = setup();
        known_session(&mut store, "ghost");
        let report = sync(&mut store, &config, &SyncScope::All).unwrap();
        assert_eq!(report.sessions_scanned, 1);
        assert_eq!(report.entries_added, 0);
        assert!(report.sessions[0].error.is_none());
    }
}
