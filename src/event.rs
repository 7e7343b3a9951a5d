use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Push-event payload, pre-parsed by the CI runner and read from disk.
///
/// Only the fields the pipeline needs are modeled; everything else in the
/// payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct PushEvent {
    /// Full ref that was pushed, e.g. `refs/heads/master`
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub repository: Repository,
    #[serde(default)]
    pub commits: Vec<CommitRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub owner: Owner,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Owner {
    pub name: String,
    pub email: String,
}

/// One pushed commit. Order matters: version extraction scans messages in
/// the order the payload supplies them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitRecord {
    pub message: String,
}

impl CommitRecord {
    pub fn new(message: impl Into<String>) -> Self {
        CommitRecord {
            message: message.into(),
        }
    }
}

/// Load the event payload. An unreadable or unparseable payload is a fatal
/// configuration problem, not a skip.
pub fn load(path: &Path) -> Result<PushEvent> {
    let data = fs::read_to_string(path).map_err(|e| {
        Error::event(format!("cannot read event file {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&data).map_err(|e| {
        Error::event(format!("cannot parse event file {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_payload(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_full_payload() {
        let file = write_payload(
            r#"{
                "ref": "refs/heads/master",
                "repository": {
                    "owner": { "name": "Jane", "email": "jane@example.com" },
                    "full_name": "jane/widget"
                },
                "commits": [
                    { "message": "feat: add widget", "id": "abc123" },
                    { "message": "fix: typo" }
                ]
            }"#,
        );

        let event = load(file.path()).unwrap();
        assert_eq!(event.git_ref, "refs/heads/master");
        assert_eq!(event.repository.owner.name, "Jane");
        assert_eq!(event.repository.owner.email, "jane@example.com");
        assert_eq!(
            event.commits,
            vec![
                CommitRecord::new("feat: add widget"),
                CommitRecord::new("fix: typo"),
            ]
        );
    }

    #[test]
    fn test_load_without_commits() {
        let file = write_payload(
            r#"{
                "ref": "refs/heads/master",
                "repository": { "owner": { "name": "Jane", "email": "jane@example.com" } }
            }"#,
        );

        let event = load(file.path()).unwrap();
        assert!(event.commits.is_empty());
    }

    #[test]
    fn test_load_missing_owner_is_fatal() {
        let file = write_payload(r#"{ "ref": "refs/heads/master", "repository": {} }"#);

        let err = load(file.path()).unwrap_err();
        assert!(!err.is_benign());
        assert!(err.to_string().contains("cannot parse event file"));
    }

    #[test]
    fn test_load_missing_file_is_fatal() {
        let err = load(Path::new("/nonexistent/event.json")).unwrap_err();
        assert!(!err.is_benign());
        assert!(err.to_string().contains("cannot read event file"));
    }
}
