//! Audit logging for prompts and responses
//!
//! Every assembled prompt and every parsed response can be written to
//! capped log files for debugging and review. The cap truncates rather
//! than rotates: a file that has grown past the limit is cleared before
//! the next entry. Logging failures are swallowed: an unwritable log
//! must not fail document processing.

use chrono::Utc;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default cap on each log file
pub const DEFAULT_MAX_LOG_BYTES: u64 = 10 * 1024 * 1024;

/// Size-capped prompt/response audit log
#[derive(Debug, Clone)]
pub struct AuditLog {
    prompt_path: PathBuf,
    response_path: PathBuf,
    max_bytes: u64,
}

impl AuditLog {
    /// Create an audit log writing `prompt.txt` and `response.txt` under
    /// the given directory
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            prompt_path: dir.join("prompt.txt"),
            response_path: dir.join("response.txt"),
            max_bytes: DEFAULT_MAX_LOG_BYTES,
        }
    }

    /// Override the per-file size cap
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Record an assembled prompt and the (truncated) document content
    pub fn record_prompt(&self, instructions: &str, content: &str) {
        let timestamp = Utc::now().to_rfc3339();
        let entry = format!(
            "\n=== {timestamp} ===\nSYSTEM PROMPT:\n{instructions}\n\nUSER CONTENT:\n{content}\n\n"
        );
        self.append_capped(&self.prompt_path, &entry);
    }

    /// Record a parsed (or raw) provider response
    pub fn record_response(&self, response: &str) {
        let timestamp = Utc::now().to_rfc3339();
        let entry = format!("\n=== {timestamp} ===\n{response}\n");
        self.append_capped(&self.response_path, &entry);
    }

    fn append_capped(&self, path: &Path, entry: &str) {
        if let Err(err) = self.try_append(path, entry) {
            warn!(path = %path.display(), %err, "failed to write audit log");
        }
    }

    fn try_append(&self, path: &Path, entry: &str) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Clear the file once it outgrows the cap
        if let Ok(meta) = fs::metadata(path) {
            if meta.len() > self.max_bytes {
                debug!(path = %path.display(), "clearing audit log over size cap");
                fs::remove_file(path)?;
            }
        }

        let mut file = fs::OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(entry.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_entries_are_appended() {
        let dir = tempfile::tempdir().unwrap();
        let audit = AuditLog::new(dir.path());

        audit.record_prompt("instructions one", "content one");
        audit.record_prompt("instructions two", "content two");

        let logged = fs::read_to_string(dir.path().join("prompt.txt")).unwrap();
        assert!(logged.contains("SYSTEM PROMPT:\ninstructions one"));
        assert!(logged.contains("USER CONTENT:\ncontent two"));
    }

    #[test]
    fn test_response_entries_are_appended() {
        let dir = tempfile::tempdir().unwrap();
        let audit = AuditLog::new(dir.path());

        audit.record_response("{\"title\": \"Invoice\"}");

        let logged = fs::read_to_string(dir.path().join("response.txt")).unwrap();
        assert!(logged.contains("{\"title\": \"Invoice\"}"));
    }

    #[test]
    fn test_size_cap_clears_file() {
        let dir = tempfile::tempdir().unwrap();
        let audit = AuditLog::new(dir.path()).with_max_bytes(200);

        audit.record_prompt(&"x".repeat(300), "content");
        let first_len = fs::metadata(dir.path().join("prompt.txt")).unwrap().len();
        assert!(first_len > 200);

        // The next entry clears the oversized file first
        audit.record_prompt("fresh", "entry");
        let logged = fs::read_to_string(dir.path().join("prompt.txt")).unwrap();
        assert!(!logged.contains("xxx"));
        assert!(logged.contains("fresh"));
    }

    #[test]
    fn test_unwritable_path_is_swallowed() {
        // A file where a directory is expected makes every write fail
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, "not a directory").unwrap();

        let audit = AuditLog::new(blocker.join("logs"));
        // Must not panic
        audit.record_prompt("instructions", "content");
        audit.record_response("response");
    }
}
