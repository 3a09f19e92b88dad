//! Check command implementation

use anyhow::Result;

use crate::check;
use crate::config::Config;
use crate::store::Store;

/// Prints the integrity report as JSON. Returns an error (nonzero exit) when
/// the store has structural problems, so the command scripts cleanly.
pub fn run(store: &Store, config: &Config) -> Result<()> {
    let report = check::check(store, config)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.is_clean() {
        anyhow::bail!("integrity problems found");
    }
    Ok(())
}
