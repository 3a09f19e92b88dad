//! Sync command implementation

use anyhow::Result;
use serde::Serialize;

use crate::config::Config;
use crate::recover::{self, RecoverReport};
use crate::store::Store;
use crate::sync::{self, SyncReport, SyncScope};

#[derive(Serialize)]
struct SyncSummary {
    recovery: RecoverReport,
    sync: SyncReport,
}

pub fn run(
    store: &mut Store,
    config: &Config,
    session: Option<String>,
    project: Option<String>,
    no_recover: bool,
) -> Result<()> {
    let scope = match (session, project) {
        (Some(id), _) => SyncScope::Session(store.require_session_id(&id)?),
        (None, Some(name)) => SyncScope::Project(name),
        (None, None) => SyncScope::All,
    };

    // Recover first so freshly discovered sessions are part of this pass.
    let recovery = match scope {
        SyncScope::All | SyncScope::Project(_) if !no_recover => {
            recover::recover_orphans(store, config)?
        }
        _ => RecoverReport::default(),
    };
    let sync = sync::sync(store, config, &scope)?;

    let summary = SyncSummary { recovery, sync };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
