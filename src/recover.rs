//! Orphan recovery
//!
//! A session whose transcript file exists on disk but which was never seen by
//! a hook has no Session row. This scan seeds those rows from file metadata so
//! a following sync pass can populate content. It creates nothing else and is
//! idempotent by session id.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

use crate::config::Config;
use crate::discover;
use crate::error::Result;
use crate::store::{SessionSeed, Store};

#[derive(Debug, Default, Serialize)]
pub struct RecoverReport {
    pub files_scanned: usize,
    pub sessions_recovered: usize,
    pub recovered_ids: Vec<String>,
}

pub fn recover_orphans(store: &mut Store, config: &Config) -> Result<RecoverReport> {
    let transcripts =
        discover::find_transcripts(&config.projects_dir(), config.sync.skip_subagents);

    let mut report = RecoverReport {
        files_scanned: transcripts.len(),
        ..Default::default()
    };

    for transcript in transcripts {
        let seed = SessionSeed {
            session_id: transcript.session_id.clone(),
            project_path: transcript.project_path.clone(),
            project_name: transcript.project_name.clone(),
            started_at: file_creation_time(&transcript.path),
        };
        if store.create_session_if_missing(&seed)? {
            report.sessions_recovered += 1;
            report.recovered_ids.push(transcript.session_id);
        }
    }

    report.recovered_ids.sort();
    Ok(report)
}

/// Best available "session started" approximation: file creation time where
/// the platform tracks it, modification time otherwise.
fn file_creation_time(path: &Path) -> Option<String> {
    let meta = std::fs::metadata(path).ok()?;
    let ts = meta.created().or_else(|_| meta.modified()).ok()?;
    Some(DateTime::<Utc>::from(ts).to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::{sync, SyncScope};
    use std::fs;

    fn setup() -> (tempfile::TempDir, Store, Config) {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::open(&tmp.path().join("vault.db")).unwrap();
        let mut config = Config::default();
        config.claude.projects_dir = tmp.path().join("projects").to_string_lossy().to_string();
        (tmp, store, config)
    }

    fn write_transcript(config: &Config, session_id: &str) {
        let dir = config.projects_dir().join("-Users-dev-demo");
        fs::create_dir_all(&dir).unwrap();
        let line = r#"{"type":"user","timestamp":"2025-06-01T10:00:00Z","message":{"role":"user","content":"hi"}}"#;
        fs::write(dir.join(format!("{}.jsonl", session_id)), format!("{}\n", line)).unwrap();
    }

    #[test]
    fn test_recovers_only_missing_sessions() {
        let (_tmp, mut store, config) = setup();
        for sid in ["s1", "s2", "s3", "s4", "s5"] {
            write_transcript(&config, sid);
        }
        // three already captured by hooks
        for sid in ["s1", "s2", "s3"] {
            store
                .create_session_if_missing(&SessionSeed {
                    session_id: sid.to_string(),
                    ..Default::default()
                })
                .unwrap();
        }

        let report = recover_orphans(&mut store, &config).unwrap();
        assert_eq!(report.files_scanned, 5);
        assert_eq!(report.sessions_recovered, 2);
        assert_eq!(report.recovered_ids, vec!["s4", "s5"]);

        // a following sync populates content for all five
        let synced = sync(&mut store, &config, &SyncScope::All).unwrap();
        assert_eq!(synced.sessions_scanned, 5);
        assert_eq!(synced.entries_added, 5);
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let (_tmp, mut store, config) = setup();
        write_transcript(&config, "s1");

        let first = recover_orphans(&mut store, &config).unwrap();
        assert_eq!(first.sessions_recovered, 1);
        let second = recover_orphans(&mut store, &config).unwrap();
        assert_eq!(second.sessions_recovered, 0);

        let sessions: i64 = store
            .connection()
            .query_row("SELECT COUNT(*) FROM sessions", [], |r| r.get(0))
            .unwrap();
        assert_eq!(sessions, 1);
    }

    #[test]
    fn test_recovered_session_carries_decoded_project() {
        let (_tmp, mut store, config) = setup();
        write_transcript(&config, "s1");
        recover_orphans(&mut store, &config).unwrap();

        let session = store.get_session("s1").unwrap().unwrap();
        assert_eq!(session.project_name.as_deref(), Some("demo"));
        assert!(session.started_at.is_some());
    }
}
