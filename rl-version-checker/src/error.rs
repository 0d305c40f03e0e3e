use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckerError {
    #[error("required configuration value {0} is not set")]
    MissingConfiguration(&'static str),

    #[error("invalid configuration value {key}: {reason}")]
    InvalidConfiguration { key: &'static str, reason: String },

    #[error("http client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("failed to fetch {resource}: {failure}")]
    Fetch {
        resource: &'static str,
        #[source]
        failure: FetchFailure,
    },

    #[error("failed to read cache file {}: {source}", path.display())]
    CacheRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cache file {} is malformed: {source}", path.display())]
    CacheMalformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write cache file {}: {source}", path.display())]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("failed to dispatch workflow {workflow}: {source}")]
    Dispatch {
        workflow: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Why a single fetch failed.
#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("response body was empty")]
    EmptyBody,

    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed xml: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("metadata lists no snapshot versions")]
    NoSnapshotVersions,
}

impl FetchFailure {
    pub fn while_fetching(self, resource: &'static str) -> CheckerError {
        CheckerError::Fetch {
            resource,
            failure: self,
        }
    }
}
