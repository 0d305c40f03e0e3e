use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root `project` element of a Maven POM.
#[derive(Debug, Clone, Deserialize)]
pub struct PomProject {
    pub version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Bootstrap {
    pub version: String,
}

/// Root `metadata` element of a `maven-metadata.xml`.
#[derive(Debug, Clone, Deserialize)]
pub struct MavenMetadata {
    pub versioning: MavenVersioning,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MavenVersioning {
    #[serde(default)]
    pub snapshot_versions: SnapshotVersions,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotVersions {
    #[serde(rename = "snapshotVersion", default)]
    pub entries: Vec<SnapshotVersion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotVersion {
    #[serde(default)]
    pub extension: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LauncherRelease {
    pub tag_name: String,

    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
}

/// Body of a workflow dispatch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowDispatch {
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub inputs: BTreeMap<String, String>,
}
