//! Value objects returned by history and recording operations.

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp format used in version listings.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One commit in a file's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionRecord {
    pub author: String,
    /// Commit time rendered as `YYYY-MM-DD HH:MM:SS` (UTC).
    pub timestamp: String,
    /// Full hex object id of the commit.
    pub commit_id: String,
}

impl VersionRecord {
    pub fn from_commit(commit: &git2::Commit) -> Self {
        let author = commit.author().name().unwrap_or("Unknown").to_string();
        let timestamp = Utc
            .timestamp_opt(commit.time().seconds(), 0)
            .single()
            .unwrap_or_else(Utc::now)
            .format(TIMESTAMP_FORMAT)
            .to_string();

        Self {
            author,
            timestamp,
            commit_id: commit.id().to_string(),
        }
    }
}

/// What the composite `record_version` operation actually did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordOutcome {
    pub commit_id: String,
    pub pushed: bool,
}
