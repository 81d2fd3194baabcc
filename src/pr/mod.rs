pub mod fetch;
pub mod review;
pub mod types;

pub use fetch::DiffFetcher;
pub use review::ReviewPoster;
pub use types::{PullRequestRef, ReviewComment, ReviewEvent, ReviewSubmission};

use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum PrError {
    #[error("Invalid PR URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("GitHub request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{status} from {url}: {body}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
        body: String,
    },
}

/// Coarse classification of a [`PrError`], for callers that branch on failure type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    Transport,
    Status,
}

impl PrError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PrError::InvalidUrl(_) | PrError::InvalidArguments(_) => ErrorKind::InvalidInput,
            PrError::Transport(_) => ErrorKind::Transport,
            PrError::Status { .. } => ErrorKind::Status,
        }
    }
}

/// Parse a GitHub PR URL into its component parts.
/// Expected format: https://github.com/{owner}/{repo}/pull/{number}
pub fn parse_pr_url(url: &str) -> Result<PullRequestRef, PrError> {
    let invalid = || PrError::InvalidUrl(url.to_string());
    let parsed = reqwest::Url::parse(url.trim()).map_err(|_| invalid())?;

    if parsed.host_str() != Some("github.com") {
        return Err(invalid());
    }

    let segments: Vec<_> = parsed
        .path_segments()
        .ok_or_else(invalid)?
        .filter(|segment| !segment.is_empty())
        .collect();

    // Trailing views like /files or /commits still name the same PR.
    if segments.len() < 4 || segments[2] != "pull" {
        return Err(invalid());
    }

    let pr_number = segments[3].parse::<u64>().map_err(|_| invalid())?;

    let pr = PullRequestRef {
        owner: segments[0].to_string(),
        repo: segments[1].to_string(),
        pr_number,
    };
    pr.validate().map_err(|_| invalid())?;
    Ok(pr)
}

/// Build the HTTP client shared by the fetcher and poster.
/// GitHub rejects API calls without a User-Agent.
pub(crate) fn http_client(config: &Config) -> Result<reqwest::Client, PrError> {
    let client = reqwest::Client::builder()
        .user_agent(config.user_agent())
        .timeout(config.timeout())
        .build()?;
    Ok(client)
}

/// Turn a >= 400 response into [`PrError::Status`], keeping the body for diagnostics.
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, PrError> {
    let status = response.status();
    if status.as_u16() >= 400 {
        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        return Err(PrError::Status { status, url, body });
    }
    Ok(response)
}
