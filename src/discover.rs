//! Discovery of transcript files in the session host's on-disk layout
//!
//! Layout: one directory per project under the projects root, one JSONL file
//! per session, filename stem = session id. Project directories carry the
//! project path with '/' encoded as '-' (e.g. `-Users-dev-my-project`).

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A transcript file found on disk, with its decoded project context.
#[derive(Debug, Clone)]
pub struct TranscriptRef {
    pub session_id: String,
    pub path: PathBuf,
    pub project_path: Option<String>,
    pub project_name: Option<String>,
}

/// Walk the projects root and collect transcript files, one per session.
/// Subagent transcripts (`agent-*.jsonl`) are optionally skipped; they belong
/// to the parent session and would otherwise show up as phantom sessions.
pub fn find_transcripts(root: &Path, skip_subagents: bool) -> Vec<TranscriptRef> {
    if !root.exists() {
        return Vec::new();
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() || path.extension().map(|e| e != "jsonl").unwrap_or(true) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if skip_subagents && stem.starts_with("agent-") {
            continue;
        }

        let encoded_dir = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str());

        found.push(TranscriptRef {
            session_id: stem.to_string(),
            path: path.to_path_buf(),
            project_path: encoded_dir.map(decode_project_path),
            project_name: encoded_dir.map(project_name_from_encoded),
        });
    }

    found.sort_by(|a, b| a.session_id.cmp(&b.session_id));
    found
}

/// Locate a single session's transcript file by id.
pub fn find_session_file(root: &Path, session_id: &str, skip_subagents: bool) -> Option<TranscriptRef> {
    find_transcripts(root, skip_subagents)
        .into_iter()
        .find(|t| t.session_id == session_id)
}

/// Decode the host's directory encoding back into a path-like string.
/// `-Users-dev-my-project` -> `/Users/dev/my/project`. The encoding is lossy
/// (a '-' inside a directory name is indistinguishable from a separator), so
/// this is only used as a display hint, never resolved on disk.
pub fn decode_project_path(encoded: &str) -> String {
    if !encoded.starts_with('-') {
        return encoded.to_string();
    }
    encoded.replace('-', "/")
}

/// Derive a human-readable project label from an encoded directory name,
/// dropping the leading `/Users/<name>` (or `/home/<name>`) noise.
pub fn project_name_from_encoded(encoded: &str) -> String {
    if !encoded.starts_with('-') {
        return encoded.to_string();
    }
    let parts: Vec<&str> = encoded.split('-').skip(1).collect();
    match parts.as_slice() {
        [first, _, rest @ ..] if !rest.is_empty() && (*first == "Users" || *first == "home") => {
            rest.join("-")
        }
        _ => parts.last().map(|s| s.to_string()).unwrap_or_default(),
    }
}

/// Derive a project name from a working directory: just its basename.
pub fn project_name_from_cwd(cwd: &str) -> Option<String> {
    Path::new(cwd)
        .file_name()
        .and_then(|n| n.to_str())
        .map(String::from)
}
