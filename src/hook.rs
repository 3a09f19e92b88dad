//! Hook event ingestion
//!
//! One hook firing delivers one JSON payload on stdin; this module validates
//! it and applies it to the store as a single transaction. It runs inside the
//! host's hook critical path, so it never retries beyond the store's bounded
//! busy handling and never blocks on anything but store I/O.

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

use crate::discover;
use crate::error::{Result, VaultError};
use crate::store::{NewEvent, SessionSeed, Store};

/// Hook event names as delivered by the session host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventType {
    SessionStart,
    UserPromptSubmit,
    PreToolUse,
    PostToolUse,
    SessionEnd,
    Other(String),
}

impl EventType {
    pub fn parse(name: &str) -> Self {
        match name {
            "SessionStart" => EventType::SessionStart,
            "UserPromptSubmit" => EventType::UserPromptSubmit,
            "PreToolUse" => EventType::PreToolUse,
            "PostToolUse" => EventType::PostToolUse,
            "SessionEnd" => EventType::SessionEnd,
            other => EventType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EventType::SessionStart => "SessionStart",
            EventType::UserPromptSubmit => "UserPromptSubmit",
            EventType::PreToolUse => "PreToolUse",
            EventType::PostToolUse => "PostToolUse",
            EventType::SessionEnd => "SessionEnd",
            EventType::Other(name) => name,
        }
    }
}

/// The raw hook payload as the host delivers it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HookPayload {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub hook_event_name: String,
    pub tool_name: Option<String>,
    pub tool_input: Option<Value>,
    pub tool_response: Option<Value>,
    pub prompt: Option<String>,
    pub cwd: Option<String>,
    pub transcript_path: Option<String>,
    pub timestamp: Option<String>,
}

impl HookPayload {
    pub fn from_json(raw: &str) -> Result<Self> {
        let payload: HookPayload = serde_json::from_str(raw)
            .map_err(|e| VaultError::MalformedPayload(e.to_string()))?;
        payload.validate()?;
        Ok(payload)
    }

    fn validate(&self) -> Result<()> {
        if self.session_id.trim().is_empty() {
            return Err(VaultError::MalformedPayload("empty session_id".into()));
        }
        if self.hook_event_name.trim().is_empty() {
            return Err(VaultError::MalformedPayload("missing hook_event_name".into()));
        }
        Ok(())
    }
}

/// Apply one hook payload: session row on first reference, one immutable
/// event row, and its search-index row, all in one transaction.
/// Returns the event row id.
pub fn ingest(store: &mut Store, payload: &HookPayload) -> Result<i64> {
    payload.validate()?;

    let event_type = EventType::parse(&payload.hook_event_name);
    let timestamp = payload
        .timestamp
        .clone()
        .unwrap_or_else(|| Utc::now().to_rfc3339());

    let seed = SessionSeed {
        session_id: payload.session_id.clone(),
        project_path: payload.cwd.clone(),
        project_name: derive_project_name(payload),
        started_at: Some(timestamp.clone()),
    };

    let event = NewEvent {
        session_id: payload.session_id.clone(),
        event_type: event_type.as_str().to_string(),
        tool_name: payload.tool_name.clone(),
        tool_input: payload.tool_input.as_ref().map(|v| v.to_string()),
        tool_response: payload.tool_response.as_ref().map(|v| v.to_string()),
        prompt: payload.prompt.clone(),
        cwd: payload.cwd.clone(),
        transcript_path: payload.transcript_path.clone(),
        timestamp,
        ends_session: event_type == EventType::SessionEnd,
    };

    store.insert_event(&seed, &event)
}

/// Project label for a fresh session: the working directory's basename,
/// falling back to the decoded transcript directory name.
fn derive_project_name(payload: &HookPayload) -> Option<String> {
    if let Some(name) = payload
        .cwd
        .as_deref()
        .and_then(discover::project_name_from_cwd)
    {
        return Some(name);
    }
    payload
        .transcript_path
        .as_deref()
        .and_then(|p| {
            std::path::Path::new(p)
                .parent()
                .and_then(|d| d.file_name())
                .and_then(|n| n.to_str())
        })
        .map(discover::project_name_from_encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_test_store() -> (tempfile::TempDir, Store) {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::open(&tmp.path().join("vault.db")).unwrap();
        (tmp, store)
    }

    #[test]
    fn test_rejects_empty_session_id() {
        let err = HookPayload::from_json(r#"{"session_id":"","hook_event_name":"SessionStart"}"#)
            .unwrap_err();
        assert!(matches!(err, VaultError::MalformedPayload(_)));
    }

    #[test]
    fn test_rejects_missing_event_name() {
        let err = HookPayload::from_json(r#"{"session_id":"sess-1"}"#).unwrap_err();
        assert!(matches!(err, VaultError::MalformedPayload(_)));
    }

    #[test]
    fn test_rejects_invalid_json() {
        assert!(HookPayload::from_json("not json").is_err());
    }

    #[test]
    fn test_ingest_prompt_event() {
        let (_tmp, mut store) = open_test_store();
        let payload = HookPayload::from_json(
            r#"{"session_id":"sess-1","hook_event_name":"UserPromptSubmit",
                "prompt":"fix the flaky test","cwd":"/Users/dev/demo",
                "transcript_path":"/Users/dev/.claude/projects/-Users-dev-demo/sess-1.jsonl"}"#,
        )
        .unwrap();

        let id = ingest(&mut store, &payload).unwrap();
        assert!(id > 0);

        let session = store.get_session("sess-1").unwrap().unwrap();
        assert_eq!(session.project_name.as_deref(), Some("demo"));
        assert_eq!(session.event_count, 1);
    }

    #[test]
    fn test_ingest_tool_event_serializes_payloads() {
        let (_tmp, mut store) = open_test_store();
        let payload = HookPayload::from_json(
            r#"{"session_id":"sess-1","hook_event_name":"PostToolUse",
                "tool_name":"Edit","tool_input":{"file_path":"src/main.rs"},
                "tool_response":{"ok":true}}"#,
        )
        .unwrap();
        ingest(&mut store, &payload).unwrap();

        let events = store.session_events("sess-1", 10).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].tool_name.as_deref(), Some("Edit"));
        assert!(events[0].tool_input.as_deref().unwrap().contains("main.rs"));
    }

    #[test]
    fn test_session_end_sets_ended_at() {
        let (_tmp, mut store) = open_test_store();
        for raw in [
            r#"{"session_id":"sess-1","hook_event_name":"SessionStart","cwd":"/tmp/x"}"#,
            r#"{"session_id":"sess-1","hook_event_name":"SessionEnd"}"#,
        ] {
            ingest(&mut store, &HookPayload::from_json(raw).unwrap()).unwrap();
        }
        let session = store.get_session("sess-1").unwrap().unwrap();
        assert!(session.ended_at.is_some());
        assert_eq!(session.event_count, 2);
    }

    #[test]
    fn test_unknown_event_type_is_preserved() {
        let (_tmp, mut store) = open_test_store();
        let payload =
            HookPayload::from_json(r#"{"session_id":"s","hook_event_name":"Notification"}"#)
                .unwrap();
        ingest(&mut store, &payload).unwrap();
        let events = store.session_events("s", 10).unwrap();
        assert_eq!(events[0].event_type, "Notification");
    }

    #[test]
    fn test_project_name_falls_back_to_transcript_dir() {
        let payload = HookPayload {
            session_id: "s".into(),
            hook_event_name: "SessionStart".into(),
            transcript_path: Some("/x/-Users-dev-my-api/s.jsonl".into()),
            ..Default::default()
        };
        assert_eq!(derive_project_name(&payload).as_deref(), Some("my-api"));
    }
}
