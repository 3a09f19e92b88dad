//! Hook command implementation
//!
//! Runs inside the host's hook pipeline: reads one JSON payload from stdin
//! and records it. The host treats a nonzero exit or unexpected stdout as a
//! hook failure, so this command always prints an empty JSON object and exits
//! zero; problems go to stderr only.

use std::io::Read;

use crate::config::Config;
use crate::error::Result;
use crate::hook::{EventType, HookPayload};
use crate::store::Store;
use crate::sync::{self, SyncScope};

pub fn run(config: &Config, no_sync: bool) {
    if let Err(e) = ingest_stdin(config, no_sync) {
        eprintln!("claude-vault hook: {}", e);
    }
    println!("{{}}");
}

fn ingest_stdin(config: &Config, no_sync: bool) -> Result<()> {
    let mut raw = String::new();
    std::io::stdin().read_to_string(&mut raw)?;

    let payload = HookPayload::from_json(&raw)?;
    let event_type = EventType::parse(&payload.hook_event_name);
    let session_id = payload.session_id.clone();

    let mut store = Store::open(&config.database_path())?;
    crate::hook::ingest(&mut store, &payload)?;

    // A closing session is the natural moment to pull its transcript in.
    if !no_sync && matches!(event_type, EventType::SessionEnd) {
        sync::sync(&mut store, config, &SyncScope::Session(session_id))?;
    }

    Ok(())
}
