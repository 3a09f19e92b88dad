//! Search command implementation

use anyhow::Result;
use serde::Serialize;

use crate::store::{EventHit, SessionOverview, Store, TranscriptHit};

/// Queries shorter than this skip FTS (a one or two character prefix matches
/// nearly everything) and fall back to session metadata matching.
const MIN_FTS_QUERY_LEN: usize = 3;

pub struct SearchArgs {
    pub query: String,
    pub limit: i64,
    pub session: Option<String>,
    pub event_type: Option<String>,
    pub events_only: bool,
    pub transcripts_only: bool,
    pub json: bool,
}

#[derive(Serialize)]
struct SearchResults {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sessions: Vec<SessionOverview>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    events: Vec<EventHit>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    transcripts: Vec<TranscriptHit>,
}

pub fn run(store: &Store, args: &SearchArgs) -> Result<()> {
    let mut results = SearchResults {
        sessions: Vec::new(),
        events: Vec::new(),
        transcripts: Vec::new(),
    };

    let session_id = match &args.session {
        Some(prefix) => Some(store.require_session_id(prefix)?),
        None => None,
    };

    if args.query.chars().count() < MIN_FTS_QUERY_LEN {
        results.sessions = store.search_session_titles(&args.query, args.limit)?;
    } else {
        if !args.transcripts_only {
            results.events = store.search_events(
                &args.query,
                args.limit,
                session_id.as_deref(),
                args.event_type.as_deref(),
            )?;
        }
        if !args.events_only {
            results.transcripts =
                store.search_transcripts(&args.query, args.limit, session_id.as_deref())?;
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    print_results(&args.query, &results);
    Ok(())
}

fn print_results(query: &str, results: &SearchResults) {
    if results.sessions.is_empty() && results.events.is_empty() && results.transcripts.is_empty() {
        println!("No results for '{}'.", query);
        return;
    }

    if !results.sessions.is_empty() {
        println!("Sessions matching '{}':", query);
        for session in &results.sessions {
            println!(
                "  {:<10} {:<20} {}",
                short_id(&session.session_id),
                session
                    .custom_name
                    .as_deref()
                    .or(session.project_name.as_deref())
                    .unwrap_or("-"),
                session.last_activity.as_deref().unwrap_or("-"),
            );
        }
    }

    if !results.events.is_empty() {
        println!("Events:");
        for hit in &results.events {
            println!(
                "  {:<10} {:<16} {:<10} {}",
                short_id(&hit.session_id),
                hit.event_type,
                hit.tool_name.as_deref().unwrap_or("-"),
                hit.snippet,
            );
        }
    }

    if !results.transcripts.is_empty() {
        println!("Transcript:");
        for hit in &results.transcripts {
            println!(
                "  {:<10} line {:<6} {:<10} {}",
                short_id(&hit.session_id),
                hit.line_number,
                hit.role.as_deref().unwrap_or("-"),
                hit.snippet,
            );
        }
    }
}

/// First 8 characters of a session id. Ids are normally ASCII UUIDs, but
/// they come from transcript filename stems, so slicing has to respect char
/// boundaries.
pub(crate) fn short_id(session_id: &str) -> &str {
    match session_id.char_indices().nth(8) {
        Some((idx, _)) => &session_id[..idx],
        None => session_id,
    }
}
