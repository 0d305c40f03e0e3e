use serde::{Deserialize, Serialize};

/// Versions observed by the last successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedState {
    /// Stable channel version.
    pub version: String,
    pub snapshot_version: String,

    /// Missing in caches written before the launcher was tracked.
    #[serde(default)]
    pub launcher_version: Option<String>,
}
