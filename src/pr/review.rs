use tracing::{debug, info, instrument, warn};

use super::{check_status, http_client, PrError, PullRequestRef, ReviewSubmission};
use crate::config::Config;

/// Submits reviews through the GitHub REST API.
///
/// The token is fixed when the poster is built and is never re-read from the
/// environment afterwards.
#[derive(Clone)]
pub struct ReviewPoster {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for ReviewPoster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewPoster")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ReviewPoster {
    pub fn new(config: &Config, token: Option<String>) -> Result<Self, PrError> {
        Ok(Self {
            client: http_client(config)?,
            base_url: config.api_base_url().trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Build a poster with the token resolved by [`Config`].
    pub fn from_config(config: &Config) -> Result<Self, PrError> {
        Self::new(config, config.github_token())
    }

    /// `{base}/repos/{owner}/{repo}/pulls/{pr_number}/reviews`
    pub fn reviews_url(&self, pr: &PullRequestRef) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{}/reviews",
            self.base_url, pr.owner, pr.repo, pr.pr_number
        )
    }

    /// Post a review. The whole submission succeeds or fails together.
    ///
    /// Without a token an empty bearer is still sent and GitHub's 401 is
    /// reported as [`PrError::Status`].
    #[instrument(
        skip(self, submission),
        fields(owner = %pr.owner, repo = %pr.repo, pr = pr.pr_number, event = %submission.event)
    )]
    pub async fn post_review(
        &self,
        pr: &PullRequestRef,
        submission: &ReviewSubmission,
    ) -> Result<String, PrError> {
        pr.validate()?;
        let url = self.reviews_url(pr);
        let token = match self.token.as_deref() {
            Some(token) => token,
            None => {
                warn!("no GitHub token configured; the review will be rejected as unauthorized");
                ""
            }
        };

        debug!(%url, comments = submission.comments.len(), "posting review");
        let response = self
            .client
            .post(&url)
            .header("Accept", "application/vnd.github+json")
            .bearer_auth(token)
            .json(submission)
            .send()
            .await?;
        check_status(response).await?;

        info!("review posted");
        Ok(format!(
            "Successfully posted review to PR #{} in {}/{}",
            pr.pr_number, pr.owner, pr.repo
        ))
    }
}
