//! Pure extraction of searchable fields from raw transcript lines
//!
//! Transcript files are line-delimited JSON written by the session host.
//! Fields vary by entry type; this module derives the entry type, role, and a
//! display-content string without touching the store. Raw lines are preserved
//! verbatim by the caller.

use serde_json::Value;

/// What a single well-formed transcript line boils down to.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedEntry {
    pub entry_type: Option<String>,
    pub role: Option<String>,
    pub content: Option<String>,
    pub timestamp: Option<String>,
    pub cwd: Option<String>,
}

/// Extract type, role, display content, and timestamp from one parsed line.
pub fn extract_entry(parsed: &Value) -> ExtractedEntry {
    let entry_type = parsed
        .get("type")
        .and_then(|v| v.as_str())
        .map(String::from);

    let role = parsed
        .get("message")
        .and_then(|m| m.get("role"))
        .and_then(|v| v.as_str())
        .map(String::from);

    let content = match entry_type.as_deref() {
        Some("summary") => parsed
            .get("summary")
            .and_then(|v| v.as_str())
            .map(String::from),
        _ => parsed
            .get("message")
            .and_then(|m| m.get("content"))
            .map(extract_content_text)
            .filter(|s| !s.is_empty()),
    };

    let timestamp = parsed
        .get("timestamp")
        .and_then(|v| v.as_str())
        .map(String::from);

    let cwd = parsed.get("cwd").and_then(|v| v.as_str()).map(String::from);

    ExtractedEntry {
        entry_type,
        role,
        content,
        timestamp,
        cwd,
    }
}

/// Flatten message content into display text. Content is either a plain
/// string or a list of typed blocks; tool calls become a short structured
/// summary rather than their full payload.
fn extract_content_text(content: &Value) -> String {
    let mut parts: Vec<String> = Vec::new();

    match content {
        Value::String(s) => parts.push(s.clone()),
        Value::Array(blocks) => {
            for block in blocks {
                match block.get("type").and_then(|t| t.as_str()) {
                    Some("text") => {
                        if let Some(text) = block.get("text").and_then(|t| t.as_str()) {
                            parts.push(text.to_string());
                        }
                    }
                    Some("tool_use") => {
                        if let Some(name) = block.get("name").and_then(|n| n.as_str()) {
                            parts.push(format!("[Tool: {}]", name));
                        }
                        if let Some(input) = block.get("input").and_then(|i| i.as_object()) {
                            for (key, value) in input {
                                if let Some(s) = value.as_str() {
                                    if s.len() < 500 {
                                        parts.push(format!("{}: {}", key, s));
                                    }
                                }
                            }
                        }
                    }
                    Some("tool_result") => {
                        if let Some(text) = block.get("content").and_then(|c| c.as_str()) {
                            parts.push(truncate_at_char_boundary(text, 1000).to_string());
                        }
                    }
                    _ => {
                        if let Some(s) = block.as_str() {
                            parts.push(s.to_string());
                        }
                    }
                }
            }
        }
        _ => {}
    }

    parts.join("\n")
}

fn truncate_at_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_string_content() {
        let parsed = json!({
            "type": "user",
            "timestamp": "2025-06-01T10:00:00Z",
            "message": {"role": "user", "content": "Hello world"}
        });
        let entry = extract_entry(&parsed);
        assert_eq!(entry.entry_type.as_deref(), Some("user"));
        assert_eq!(entry.role.as_deref(), Some("user"));
        assert_eq!(entry.content.as_deref(), Some("Hello world"));
        assert_eq!(entry.timestamp.as_deref(), Some("2025-06-01T10:00:00Z"));
    }

    #[test]
    fn test_assistant_block_content() {
        let parsed = json!({
            "type": "assistant",
            "message": {
                "role": "assistant",
                "content": [
                    {"type": "text", "text": "First part"},
                    {"type": "text", "text": "Second part"}
                ]
            }
        });
        let entry = extract_entry(&parsed);
        assert_eq!(entry.content.as_deref(), Some("First part\nSecond part"));
    }

    #[test]
    fn test_tool_use_becomes_structured_summary() {
        let parsed = json!({
            "type": "assistant",
            "message": {
                "role": "assistant",
                "content": [{
                    "type": "tool_use",
                    "name": "Bash",
                    "input": {"command": "ls -la", "description": "List files"}
                }]
            }
        });
        let content = extract_entry(&parsed).content.unwrap();
        assert!(content.contains("[Tool: Bash]"));
        assert!(content.contains("command: ls -la"));
    }

    #[test]
    fn test_tool_use_skips_long_input_values() {
        let long = "x".repeat(600);
        let parsed = json!({
            "message": {
                "content": [{"type": "tool_use", "name": "Write", "input": {"body": long}}]
            }
        });
        let content = extract_entry(&parsed).content.unwrap();
        assert!(content.contains("[Tool: Write]"));
        assert!(!content.contains("xxxxxxxxxx"));
    }

    #[test]
    fn test_tool_result_truncated() {
        let long = "y".repeat(2000);
        let parsed = json!({
            "message": {"content": [{"type": "tool_result", "content": long}]}
        });
        let content = extract_entry(&parsed).content.unwrap();
        assert_eq!(content.len(), 1000);
    }

    #[test]
    fn test_summary_entry() {
        let parsed = json!({"type": "summary", "summary": "Session about login bugs"});
        let entry = extract_entry(&parsed);
        assert_eq!(entry.entry_type.as_deref(), Some("summary"));
        assert_eq!(entry.content.as_deref(), Some("Session about login bugs"));
    }

    #[test]
    fn test_empty_content_is_none() {
        let parsed = json!({"type": "user", "message": {"role": "user", "content": []}});
        assert_eq!(extract_entry(&parsed).content, None);
    }

    #[test]
    fn test_missing_everything() {
        let entry = extract_entry(&json!({}));
        assert_eq!(entry.entry_type, None);
        assert_eq!(entry.role, None);
        assert_eq!(entry.content, None);
    }
}
