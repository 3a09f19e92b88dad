//! Session management commands (rename, delete)

use anyhow::Result;

use crate::error::VaultError;
use crate::store::Store;

pub fn rename(store: &mut Store, session_query: &str, name: &str) -> Result<()> {
    let session_id = store.rename_session(session_query, name)?;

    println!("Renamed session '{}' to '{}'", session_id, name);
    Ok(())
}

pub fn delete(store: &mut Store, session_query: &str, force: bool) -> Result<()> {
    let session = store
        .get_session(session_query)?
        .ok_or_else(|| VaultError::SessionNotFound(session_query.to_string()))?;

    if !force {
        println!(
            "Would delete session '{}' ({} events, {} transcript entries).",
            session.session_id, session.event_count, session.entry_count
        );
        println!("Re-run with --force to delete.");
        return Ok(());
    }

    store.delete_session(&session.session_id)?;
    println!("Deleted session '{}'", session.session_id);
    Ok(())
}
