//! SQLite schema definition
//!
//! The FTS tables are external-content tables over events/transcript_entries
//! and are deliberately trigger-free: every content write carries its index
//! write in the same transaction, inside the store's write methods. That keeps
//! the 1:1 content/index invariant enforced in one reviewable place and lets
//! the integrity checker treat any divergence as a defect.

pub const SCHEMA: &str = r#"
-- ============================================
-- SESSIONS
-- ============================================

-- One row per conversational session, keyed by the producer-assigned id.
-- Created on first reference by either the hook ingestor or the synchronizer.
CREATE TABLE IF NOT EXISTS sessions (
    session_id TEXT PRIMARY KEY,
    project_path TEXT,
    project_name TEXT,
    custom_name TEXT,
    started_at TEXT,
    ended_at TEXT,
    created_at TEXT DEFAULT (datetime('now'))
);

-- ============================================
-- EVENTS (append-only hook log)
-- ============================================

CREATE TABLE IF NOT EXISTS events (
    id INTEGER PRIMARY KEY,
    session_id TEXT NOT NULL,
    event_type TEXT NOT NULL,
    tool_name TEXT,
    tool_input TEXT,
    tool_response TEXT,
    prompt TEXT,
    cwd TEXT,
    transcript_path TEXT,
    timestamp TEXT,
    created_at TEXT DEFAULT (datetime('now')),
    FOREIGN KEY(session_id) REFERENCES sessions(session_id) ON DELETE CASCADE
);

-- ============================================
-- TRANSCRIPT ENTRIES (append-only, line-addressed)
-- ============================================

-- (session_id, line_number) uniqueness is the idempotence guarantee for
-- re-sync: re-reading a file never re-inserts a line already recorded.
-- line_number is 1-based.
CREATE TABLE IF NOT EXISTS transcript_entries (
    id INTEGER PRIMARY KEY,
    session_id TEXT NOT NULL,
    line_number INTEGER NOT NULL,
    entry_type TEXT,
    role TEXT,
    content TEXT,
    raw_json TEXT,
    timestamp TEXT,
    created_at TEXT DEFAULT (datetime('now')),
    UNIQUE(session_id, line_number),
    FOREIGN KEY(session_id) REFERENCES sessions(session_id) ON DELETE CASCADE
);

-- ============================================
-- SEARCH INDEX (derived, write-through)
-- ============================================

CREATE VIRTUAL TABLE IF NOT EXISTS events_fts USING fts5(
    tool_name,
    tool_input,
    tool_response,
    prompt,
    content='events',
    content_rowid='id'
);

CREATE VIRTUAL TABLE IF NOT EXISTS transcript_fts USING fts5(
    content,
    content='transcript_entries',
    content_rowid='id'
);

-- ============================================
-- INDEXES
-- ============================================

CREATE INDEX IF NOT EXISTS idx_events_session ON events(session_id);
CREATE INDEX IF NOT EXISTS idx_events_type ON events(event_type);
CREATE INDEX IF NOT EXISTS idx_events_timestamp ON events(timestamp);
CREATE INDEX IF NOT EXISTS idx_transcript_session ON transcript_entries(session_id);
CREATE INDEX IF NOT EXISTS idx_transcript_type ON transcript_entries(entry_type);
CREATE INDEX IF NOT EXISTS idx_sessions_project ON sessions(project_name);
"#;
