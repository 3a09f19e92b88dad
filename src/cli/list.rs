//! Sessions listing command

use anyhow::Result;

use crate::cli::search::short_id;
use crate::store::Store;

pub fn run(store: &Store, project: Option<String>, limit: i64, json: bool) -> Result<()> {
    let sessions = store.list_sessions(limit, project.as_deref())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!("No sessions found. Run 'claude-vault sync' first.");
        return Ok(());
    }

    println!(
        "{:<10} {:<20} {:<12} {:>7} {:>8} {}",
        "ID", "Project", "Activity", "Events", "Entries", "Name"
    );
    println!("{}", "-".repeat(80));

    for session in sessions {
        let activity = session
            .last_activity
            .as_deref()
            .map(format_activity)
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<10} {:<20} {:<12} {:>7} {:>8} {}",
            short_id(&session.session_id),
            session.project_name.as_deref().unwrap_or("-"),
            activity,
            session.event_count,
            session.entry_count,
            session.custom_name.as_deref().unwrap_or("-"),
        );
    }

    Ok(())
}

/// Compact "MM-DD HH:MM" from an RFC 3339 timestamp. Timestamps are stored
/// verbatim from transcript files, so anything that does not slice cleanly is
/// shown as-is instead of panicking.
fn format_activity(ts: &str) -> String {
    match (ts.get(5..10), ts.get(11..16)) {
        (Some(date), Some(time)) => format!("{} {}", date, time),
        _ => ts.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_activity_rfc3339() {
        assert_eq!(format_activity("2025-06-01T10:30:00Z"), "06-01 10:30");
    }

    #[test]
    fn test_format_activity_odd_input_passes_through() {
        assert_eq!(format_activity("yesterday"), "yesterday");
        assert_eq!(format_activity("昨日の夕方ごろに更新された"), "昨日の夕方ごろに更新された");
    }
}