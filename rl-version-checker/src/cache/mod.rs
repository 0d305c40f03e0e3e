mod models;
pub use models::*;

use crate::error::CheckerError;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached state, if a cache file exists.
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn load(&self) -> Result<Option<CachedState>, CheckerError> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(v) => v,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!("No cache file present");
                return Ok(None);
            }
            Err(source) => {
                return Err(CheckerError::CacheRead {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_slice(&data)
            .map(Some)
            .map_err(|source| CheckerError::CacheMalformed {
                path: self.path.clone(),
                source,
            })
    }

    /// Replace the cache file with the given state.
    ///
    /// The state is written to a sibling file first and renamed over the
    /// cache, so an interrupted write never leaves a truncated cache behind.
    #[tracing::instrument(skip(self, state), fields(path = %self.path.display()))]
    pub async fn save(&self, state: &CachedState) -> Result<(), CheckerError> {
        let data = serde_json::to_vec_pretty(state)?;
        let write_error = |source| CheckerError::CacheWrite {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
        }

        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, &data)
            .await
            .map_err(write_error)?;

        if let Err(err) = tokio::fs::rename(&temp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(write_error(err));
        }

        tracing::trace!("Wrote {} bytes", data.len());

        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut file_name = self
            .path
            .file_name()
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| OsString::from("cache"));
        file_name.push(".tmp");

        self.path.with_file_name(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_state() -> CachedState {
        CachedState {
            version: "1.2.3".to_owned(),
            snapshot_version: "2.1-20240101.120000-5".to_owned(),
            launcher_version: Some("v1.0.0".to_owned()),
        }
    }

    #[tokio::test]
    async fn load_returns_none_when_file_is_missing() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path().join("cache.json"));

        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path().join("cache.json"));

        store.save(&sample_state()).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(sample_state()));
    }

    #[tokio::test]
    async fn save_uses_compatible_field_names() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path().join("cache.json"));

        store.save(&sample_state()).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!({
                "version": "1.2.3",
                "snapshotVersion": "2.1-20240101.120000-5",
                "launcherVersion": "v1.0.0"
            })
        );
    }

    #[tokio::test]
    async fn save_overwrites_and_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path().join("cache.json"));

        store.save(&sample_state()).await.unwrap();

        let mut newer = sample_state();
        newer.version = "1.2.4".to_owned();
        store.save(&newer).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(newer));

        let entries: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![OsString::from("cache.json")]);
    }

    #[tokio::test]
    async fn save_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path().join("state").join("cache.json"));

        store.save(&sample_state()).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(sample_state()));
    }

    #[tokio::test]
    async fn load_accepts_cache_without_launcher_version() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cache.json");
        std::fs::write(
            &path,
            r#"{"version": "1.2.3", "snapshotVersion": "2.1-20240101.120000-5"}"#,
        )
        .unwrap();

        let state = CacheStore::new(&path).load().await.unwrap().unwrap();

        assert_eq!(state.launcher_version, None);
        assert_eq!(state.version, "1.2.3");
    }

    #[tokio::test]
    async fn load_accepts_null_launcher_version_and_unknown_fields() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cache.json");
        std::fs::write(
            &path,
            r#"{
                "version": "1.2.3",
                "snapshotVersion": "2.1-20240101.120000-5",
                "launcherVersion": null,
                "checkedAt": "2024-01-01T12:00:00Z"
            }"#,
        )
        .unwrap();

        let state = CacheStore::new(&path).load().await.unwrap().unwrap();

        assert_eq!(state.launcher_version, None);
    }

    #[tokio::test]
    async fn load_fails_on_malformed_cache() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cache.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = CacheStore::new(&path).load().await;

        assert!(matches!(result, Err(CheckerError::CacheMalformed { .. })));
    }

    #[tokio::test]
    async fn load_fails_when_path_is_a_directory() {
        let temp_dir = TempDir::new().unwrap();

        let result = CacheStore::new(temp_dir.path()).load().await;

        assert!(matches!(result, Err(CheckerError::CacheRead { .. })));
    }
}
