use tracing::{debug, instrument};

use super::{check_status, http_client, PrError, PullRequestRef};
use crate::config::Config;

/// Retrieves the unified diff of a pull request from GitHub's raw diff host.
/// No authentication is sent; public PRs are readable anonymously.
#[derive(Debug, Clone)]
pub struct DiffFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl DiffFetcher {
    pub fn new(config: &Config) -> Result<Self, PrError> {
        Ok(Self {
            client: http_client(config)?,
            base_url: config.diff_base_url().trim_end_matches('/').to_string(),
        })
    }

    /// `{base}/raw/{owner}/{repo}/pull/{pr_number}.diff`
    pub fn diff_url(&self, pr: &PullRequestRef) -> String {
        format!(
            "{}/raw/{}/{}/pull/{}.diff",
            self.base_url, pr.owner, pr.repo, pr.pr_number
        )
    }

    /// Fetch the raw diff text. The body is returned exactly as served.
    #[instrument(skip(self), fields(owner = %pr.owner, repo = %pr.repo, pr = pr.pr_number))]
    pub async fn fetch_diff(&self, pr: &PullRequestRef) -> Result<String, PrError> {
        pr.validate()?;
        let url = self.diff_url(pr);
        debug!(%url, "fetching PR diff");

        let response = self.client.get(&url).send().await?;
        let diff_text = check_status(response).await?.text().await?;
        debug!(diff_bytes = diff_text.len(), "received PR diff");

        Ok(diff_text)
    }
}
