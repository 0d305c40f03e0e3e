mod changes;
pub use changes::*;

use crate::api::{ReleaseApi, WorkflowDispatch};
use crate::args::{CheckerConfig, WorkflowTarget};
use crate::cache::{CacheStore, CachedState};
use crate::error::CheckerError;
use std::collections::BTreeMap;

/// Outcome of a successful run.
#[derive(Debug)]
pub struct RunReport {
    pub fetched: FetchedVersions,
    pub changes: ChangeSet,
    pub dispatched: bool,
}

pub struct VersionChecker {
    api: ReleaseApi,
    cache: CacheStore,
    target: WorkflowTarget,
}

impl VersionChecker {
    /// Prepare the version checker.
    pub fn new(config: &CheckerConfig) -> Result<Self, CheckerError> {
        let api = ReleaseApi::new(config)?;
        let cache = CacheStore::new(&config.cache_file);

        Ok(Self {
            api,
            cache,
            target: config.target.clone(),
        })
    }

    /// Compare upstream versions against the cache, dispatch the workflow if
    /// anything changed and record what was observed.
    ///
    /// The cache is only written once every fetch and the dispatch (if any)
    /// succeeded.
    pub async fn run(&self) -> Result<RunReport, CheckerError> {
        let cached = self.cache.load().await?;
        match &cached {
            Some(state) => tracing::info!(
                "Cache file found, version: {}, snapshot version: {}, launcher version: {}",
                state.version,
                state.snapshot_version,
                state.launcher_version.as_deref().unwrap_or("<none>")
            ),
            None => tracing::info!("Cache file not found"),
        }

        let fetched = self.fetch_versions().await?;
        let changes = ChangeSet::detect(cached.as_ref(), &fetched);

        let dispatched = if changes.is_empty() {
            tracing::info!("All components are up to date");
            false
        } else {
            let dispatch = dispatch_request(&self.target, &changes);
            tracing::info!("Downloading: {}", changes.download_input());

            self.api.dispatch_workflow(&self.target, &dispatch).await?;
            true
        };

        self.cache.save(&CachedState::from(fetched.clone())).await?;
        tracing::debug!("Cache updated at {}", self.cache.path().display());

        Ok(RunReport {
            fetched,
            changes,
            dispatched,
        })
    }

    async fn fetch_versions(&self) -> Result<FetchedVersions, CheckerError> {
        let snapshot = async {
            let channel = self.api.fetch_snapshot_channel_version().await?;
            tracing::info!("Snapshot version: {}", channel);

            let build = self.api.fetch_snapshot_build_version(&channel).await?;
            tracing::info!("Snapshot jar version: {}", build);

            Ok::<_, CheckerError>(build)
        };

        let stable = async {
            let version = self.api.fetch_stable_version().await?;
            tracing::info!("Stable version: {}", version);

            Ok::<_, CheckerError>(version)
        };

        let launcher = async {
            let release = self.api.fetch_launcher_release().await?;
            tracing::info!("Launcher version: {}", release.tag_name);

            Ok::<_, CheckerError>(release.tag_name)
        };

        let (snapshot_version, stable_version, launcher_version) =
            futures::try_join!(snapshot, stable, launcher)?;

        Ok(FetchedVersions {
            stable_version,
            snapshot_version,
            launcher_version,
        })
    }
}

fn dispatch_request(target: &WorkflowTarget, changes: &ChangeSet) -> WorkflowDispatch {
    WorkflowDispatch {
        git_ref: target.git_ref.clone(),
        inputs: BTreeMap::from([("download".to_owned(), changes.download_input())]),
    }
}
