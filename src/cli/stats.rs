//! Stats command implementation

use anyhow::Result;

use crate::config::Config;
use crate::store::Store;

pub fn run(store: &Store, config: &Config, json: bool) -> Result<()> {
    let stats = store.stats(&config.database_path())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Vault statistics");
    println!("{}", "-".repeat(40));
    println!("Sessions:            {:>8}", stats.total_sessions);
    println!(
        "  with transcripts:  {:>8}",
        stats.sessions_with_transcripts
    );
    println!("Events:              {:>8}", stats.total_events);
    println!("Transcript entries:  {:>8}", stats.total_transcript_entries);
    println!(
        "Database size:       {:>8.1} MB",
        stats.db_size_bytes as f64 / 1_048_576.0
    );

    if !stats.events_by_type.is_empty() {
        println!("\nEvents by type:");
        for (event_type, count) in &stats.events_by_type {
            println!("  {:<20} {:>8}", event_type, count);
        }
    }
    if !stats.top_projects.is_empty() {
        println!("\nTop projects:");
        for (project, count) in &stats.top_projects {
            println!("  {:<20} {:>8}", project, count);
        }
    }
    if !stats.top_tools.is_empty() {
        println!("\nTop tools:");
        for (tool, count) in &stats.top_tools {
            println!("  {:<20} {:>8}", tool, count);
        }
    }

    Ok(())
}
