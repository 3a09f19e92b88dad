//! Show command implementation

use anyhow::Result;
use serde::Serialize;

use crate::error::VaultError;
use crate::store::{EventRow, SessionOverview, Store, TranscriptEntryRow};

pub struct ShowArgs {
    pub session: String,
    pub prompts_only: bool,
    pub tools_only: bool,
    pub limit: i64,
    pub json: bool,
}

#[derive(Serialize)]
struct SessionDetail {
    session: SessionOverview,
    events: Vec<EventRow>,
    transcript: Vec<TranscriptEntryRow>,
}

pub fn run(store: &Store, args: &ShowArgs) -> Result<()> {
    let session = store
        .get_session(&args.session)?
        .ok_or_else(|| VaultError::SessionNotFound(args.session.clone()))?;

    let mut events = store.session_events(&session.session_id, args.limit)?;
    if args.prompts_only {
        events.retain(|e| e.prompt.is_some());
    }
    if args.tools_only {
        events.retain(|e| e.tool_name.is_some());
    }

    let transcript = if args.prompts_only || args.tools_only {
        Vec::new()
    } else {
        store.transcript_entries(&session.session_id)?
    };

    if args.json {
        let detail = SessionDetail {
            session,
            events,
            transcript,
        };
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(80));
    println!("Session: {}", session.session_id);
    if let Some(name) = &session.custom_name {
        println!("Name: {}", name);
    }
    if let Some(project) = &session.project_name {
        println!("Project: {}", project);
    } else if let Some(path) = &session.project_path {
        println!("Raw Path: {}", path);
    }
    println!(
        "Started: {} | Ended: {}",
        session.started_at.as_deref().unwrap_or("-"),
        session.ended_at.as_deref().unwrap_or("-"),
    );
    println!("{}", "=".repeat(80));

    if !events.is_empty() {
        println!("\nEvents ({}):", events.len());
        for event in &events {
            let detail = event
                .prompt
                .as_deref()
                .or(event.tool_name.as_deref())
                .unwrap_or("");
            println!(
                "  [{}] {:<16} {}",
                event.timestamp.as_deref().unwrap_or("-"),
                event.event_type,
                truncate(detail, 60),
            );
        }
    }

    if !transcript.is_empty() {
        println!("\nTranscript ({} entries):", transcript.len());
        for entry in &transcript {
            let Some(content) = &entry.content else {
                continue;
            };
            println!(
                "  {:>5} {:<10} {}",
                entry.line_number,
                entry.role.as_deref().unwrap_or("-"),
                truncate(content, 70),
            );
        }
    }

    Ok(())
}

fn truncate(text: &str, max: usize) -> String {
    let flat = text.lines().next().unwrap_or(text);
    if flat.chars().count() > max {
        let cut: String = flat.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        flat.to_string()
    }
}
