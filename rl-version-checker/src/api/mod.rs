mod models;
pub use models::*;

use crate::args::{CheckerConfig, Endpoints, Token, WorkflowTarget};
use crate::error::{CheckerError, FetchFailure};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::redirect::Policy;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

const GITHUB_JSON: &str = "application/vnd.github+json";

#[derive(Debug, Clone)]
pub struct ReleaseApi {
    client: Client,
    endpoints: Endpoints,
    token: Token,
}

impl ReleaseApi {
    /// Prepare the API client.
    pub fn new(config: &CheckerConfig) -> Result<Self, CheckerError> {
        let endpoints = &config.endpoints;
        for (key, url) in [
            ("source-url", &endpoints.source),
            ("static-url", &endpoints.static_files),
            ("maven-url", &endpoints.maven),
            ("github-api-url", &endpoints.github_api),
        ] {
            if url.cannot_be_a_base() {
                return Err(CheckerError::InvalidConfiguration {
                    key,
                    reason: format!("'{}' cannot be used as a base url", url),
                });
            }
        }

        let client = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .redirect(Policy::limited(10))
            .timeout(config.request_timeout)
            .hickory_dns(true)
            .build()?;

        Ok(Self {
            client,
            endpoints: endpoints.clone(),
            token: config.token.clone(),
        })
    }

    /// Version of the snapshot channel, as declared by the root POM.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_snapshot_channel_version(&self) -> Result<String, CheckerError> {
        const RESOURCE: &str = "snapshot channel version";

        let request = self.client.get(path(&self.endpoints.source, ["pom.xml"]));
        let project: PomProject = fetch_xml(request)
            .await
            .map_err(|e| e.while_fetching(RESOURCE))?;

        Ok(project.version)
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_stable_version(&self) -> Result<String, CheckerError> {
        const RESOURCE: &str = "stable version";

        let request = self
            .client
            .get(path(&self.endpoints.static_files, ["bootstrap.json"]));
        let bootstrap: Bootstrap = fetch_json(request)
            .await
            .map_err(|e| e.while_fetching(RESOURCE))?;

        Ok(bootstrap.version)
    }

    /// Resolve the timestamped build of the injected client published for a
    /// snapshot channel.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_snapshot_build_version(&self, channel: &str) -> Result<String, CheckerError> {
        const RESOURCE: &str = "snapshot build version";

        let request = self.client.get(path(
            &self.endpoints.maven,
            [
                "net",
                "runelite",
                "injected-client",
                channel,
                "maven-metadata.xml",
            ],
        ));
        let metadata: MavenMetadata = fetch_xml(request)
            .await
            .map_err(|e| e.while_fetching(RESOURCE))?;

        let first = metadata
            .versioning
            .snapshot_versions
            .entries
            .into_iter()
            .next()
            .ok_or_else(|| FetchFailure::NoSnapshotVersions.while_fetching(RESOURCE))?;

        tracing::trace!(
            "Using snapshot build {} ({})",
            first.value,
            first.extension.as_deref().unwrap_or("no extension")
        );

        Ok(first.value)
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_launcher_release(&self) -> Result<LauncherRelease, CheckerError> {
        const RESOURCE: &str = "launcher release";

        let segments = ["repos"]
            .into_iter()
            .chain(self.endpoints.launcher_repo.split('/'))
            .chain(["releases", "latest"]);

        let request = self
            .client
            .get(path(&self.endpoints.github_api, segments))
            .header(AUTHORIZATION, self.token.authorization())
            .header(ACCEPT, GITHUB_JSON);

        let release: LauncherRelease = fetch_json(request)
            .await
            .map_err(|e| e.while_fetching(RESOURCE))?;

        for asset in &release.assets {
            tracing::trace!("Launcher asset {}: {}", asset.name, asset.browser_download_url);
        }

        Ok(release)
    }

    #[tracing::instrument(
        skip(self, target, dispatch),
        fields(workflow = target.workflow_id.as_str(), git_ref = dispatch.git_ref.as_str())
    )]
    pub async fn dispatch_workflow(
        &self,
        target: &WorkflowTarget,
        dispatch: &WorkflowDispatch,
    ) -> Result<(), CheckerError> {
        let url = path(
            &self.endpoints.github_api,
            [
                "repos",
                target.owner.as_str(),
                target.repo.as_str(),
                "actions",
                "workflows",
                target.workflow_id.as_str(),
                "dispatches",
            ],
        );
        let body = serde_json::to_vec(dispatch)?;

        self.client
            .post(url)
            .header(AUTHORIZATION, self.token.authorization())
            .header(ACCEPT, GITHUB_JSON)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| CheckerError::Dispatch {
                workflow: target.workflow_id.clone(),
                source,
            })?;

        Ok(())
    }
}

fn path<'a>(base: &Url, segments: impl IntoIterator<Item = &'a str>) -> Url {
    let mut new_path = base.clone();
    if let Ok(mut path) = new_path.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }

    new_path
}

async fn fetch_body(request: RequestBuilder) -> Result<String, FetchFailure> {
    let response = request.send().await?.error_for_status()?;
    let body = response.text().await?;

    if body.trim().is_empty() {
        return Err(FetchFailure::EmptyBody);
    }

    Ok(body)
}

async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, FetchFailure> {
    let body = fetch_body(request).await?;
    serde_json::from_str(&body).map_err(FetchFailure::from)
}

async fn fetch_xml<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, FetchFailure> {
    let body = fetch_body(request).await?;
    quick_xml::de::from_str(&body).map_err(FetchFailure::from)
}
