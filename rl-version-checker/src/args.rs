use crate::error::CheckerError;
use clap::Parser;
use reqwest::Url;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
pub struct CheckerArgs {
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    #[arg(long, env = "CI_TOKEN", hide_env_values = true)]
    pub ci_token: Option<String>,

    #[arg(long, env = "TRIGGER_WORKFLOW_ID")]
    pub workflow_id: Option<String>,

    #[arg(long, env = "REPO_URI")]
    pub repo_uri: Option<String>,

    #[arg(long, env = "REPO_REF")]
    pub repo_ref: Option<String>,

    #[arg(long, env = "CACHE_FILE")]
    pub cache_file: Option<PathBuf>,

    #[arg(
        long,
        default_value = "https://raw.githubusercontent.com/runelite/runelite/master/"
    )]
    pub source_url: Url,

    #[arg(long, default_value = "https://static.runelite.net/")]
    pub static_url: Url,

    #[arg(long, default_value = "https://repo.runelite.net/")]
    pub maven_url: Url,

    #[arg(long, default_value = "https://api.github.com/")]
    pub github_api_url: Url,

    #[arg(long, default_value = "runelite/launcher")]
    pub launcher_repo: String,

    /// Per-request timeout in seconds.
    #[arg(long, default_value = "30")]
    pub request_timeout: u64,
}

/// API token, kept out of debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn authorization(&self) -> String {
        format!("token {}", self.0)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// The repository and workflow a change notification is dispatched to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowTarget {
    pub owner: String,
    pub repo: String,
    pub workflow_id: String,
    pub git_ref: String,
}

#[derive(Debug, Clone)]
pub struct Endpoints {
    pub source: Url,
    pub static_files: Url,
    pub maven: Url,
    pub github_api: Url,
    pub launcher_repo: String,
}

/// Fully validated configuration of a single run.
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    pub token: Token,
    pub target: WorkflowTarget,
    pub cache_file: PathBuf,
    pub endpoints: Endpoints,
    pub request_timeout: Duration,
}

impl CheckerArgs {
    /// Check that every required value is present, reporting the first
    /// missing one.
    pub fn validate(self) -> Result<CheckerConfig, CheckerError> {
        let token = non_empty(self.github_token)
            .or_else(|| non_empty(self.ci_token))
            .ok_or(CheckerError::MissingConfiguration("GITHUB_TOKEN"))?;
        let workflow_id = required(self.workflow_id, "TRIGGER_WORKFLOW_ID")?;
        let repo_uri = required(self.repo_uri, "REPO_URI")?;
        let git_ref = required(self.repo_ref, "REPO_REF")?;
        let cache_file = self
            .cache_file
            .filter(|v| !v.as_os_str().is_empty())
            .ok_or(CheckerError::MissingConfiguration("CACHE_FILE"))?;

        let (owner, repo) = split_repo_uri(&repo_uri)?;

        Ok(CheckerConfig {
            token: Token::new(token),
            target: WorkflowTarget {
                owner,
                repo,
                workflow_id,
                git_ref,
            },
            cache_file,
            endpoints: Endpoints {
                source: self.source_url,
                static_files: self.static_url,
                maven: self.maven_url,
                github_api: self.github_api_url,
                launcher_repo: self.launcher_repo,
            },
            request_timeout: Duration::from_secs(self.request_timeout),
        })
    }
}

#[cfg(test)]
impl CheckerConfig {
    /// Configuration with every endpoint pointing at one mock server.
    pub fn for_mock_server(base: &str, cache_file: impl Into<PathBuf>) -> Self {
        let base = Url::parse(base).expect("mock server url");

        Self {
            token: Token::new("test-token"),
            target: WorkflowTarget {
                owner: "octo".to_owned(),
                repo: "mirror".to_owned(),
                workflow_id: "download.yml".to_owned(),
                git_ref: "main".to_owned(),
            },
            cache_file: cache_file.into(),
            endpoints: Endpoints {
                source: base.clone(),
                static_files: base.clone(),
                maven: base.clone(),
                github_api: base,
                launcher_repo: "runelite/launcher".to_owned(),
            },
            request_timeout: Duration::from_secs(5),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn required(value: Option<String>, key: &'static str) -> Result<String, CheckerError> {
    non_empty(value).ok_or(CheckerError::MissingConfiguration(key))
}

fn split_repo_uri(repo_uri: &str) -> Result<(String, String), CheckerError> {
    match repo_uri.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_owned(), repo.to_owned()))
        }
        _ => Err(CheckerError::InvalidConfiguration {
            key: "REPO_URI",
            reason: format!("expected 'owner/repo', got '{}'", repo_uri),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_args() -> CheckerArgs {
        CheckerArgs {
            github_token: Some("secret".to_owned()),
            ci_token: None,
            workflow_id: Some("download.yml".to_owned()),
            repo_uri: Some("octo/mirror".to_owned()),
            repo_ref: Some("main".to_owned()),
            cache_file: Some(PathBuf::from("cache.json")),
            source_url: Url::parse("https://source.invalid/").unwrap(),
            static_url: Url::parse("https://static.invalid/").unwrap(),
            maven_url: Url::parse("https://maven.invalid/").unwrap(),
            github_api_url: Url::parse("https://api.invalid/").unwrap(),
            launcher_repo: "runelite/launcher".to_owned(),
            request_timeout: 5,
        }
    }

    #[test]
    fn validate_accepts_complete_configuration() {
        let config = complete_args().validate().unwrap();

        assert_eq!(config.token, Token::new("secret"));
        assert_eq!(
            config.target,
            WorkflowTarget {
                owner: "octo".to_owned(),
                repo: "mirror".to_owned(),
                workflow_id: "download.yml".to_owned(),
                git_ref: "main".to_owned(),
            }
        );
        assert_eq!(config.cache_file, PathBuf::from("cache.json"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn validate_reports_each_missing_key() {
        let cases: [(fn(&mut CheckerArgs), &str); 5] = [
            (|a| a.github_token = None, "GITHUB_TOKEN"),
            (|a| a.workflow_id = None, "TRIGGER_WORKFLOW_ID"),
            (|a| a.repo_uri = None, "REPO_URI"),
            (|a| a.repo_ref = None, "REPO_REF"),
            (|a| a.cache_file = None, "CACHE_FILE"),
        ];

        for (unset, key) in cases {
            let mut args = complete_args();
            unset(&mut args);

            match args.validate() {
                Err(CheckerError::MissingConfiguration(missing)) => assert_eq!(missing, key),
                other => panic!("expected {} to be reported missing, got {:?}", key, other),
            }
        }
    }

    #[test]
    fn validate_reports_first_missing_key() {
        let mut args = complete_args();
        args.repo_ref = None;
        args.workflow_id = None;

        assert!(matches!(
            args.validate(),
            Err(CheckerError::MissingConfiguration("TRIGGER_WORKFLOW_ID"))
        ));
    }

    #[test]
    fn validate_treats_empty_values_as_missing() {
        let mut args = complete_args();
        args.repo_ref = Some(String::new());

        assert!(matches!(
            args.validate(),
            Err(CheckerError::MissingConfiguration("REPO_REF"))
        ));
    }

    #[test]
    fn validate_falls_back_to_ci_token() {
        let mut args = complete_args();
        args.github_token = None;
        args.ci_token = Some("from-ci".to_owned());

        let config = args.validate().unwrap();
        assert_eq!(config.token, Token::new("from-ci"));
    }

    #[test]
    fn validate_rejects_malformed_repo_uri() {
        for repo_uri in ["mirror", "octo/", "/mirror", "octo/mirror/extra"] {
            let mut args = complete_args();
            args.repo_uri = Some(repo_uri.to_owned());

            assert!(
                matches!(
                    args.validate(),
                    Err(CheckerError::InvalidConfiguration { key: "REPO_URI", .. })
                ),
                "{} should be rejected",
                repo_uri
            );
        }
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = Token::new("hunter2");

        assert_eq!(format!("{:?}", token), "Token(***)");
        assert_eq!(token.authorization(), "token hunter2");
    }
}
