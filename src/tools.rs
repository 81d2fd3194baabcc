//! Tool surface exposed to the orchestrating LLM.
//!
//! Every tool takes JSON arguments and answers with text. Failures come back
//! as text starting with "Error" so the model can read them; [`ToolOutput::is_error`]
//! carries the same signal for programmatic callers.

use async_trait::async_trait;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info_span, warn, Instrument};

use crate::config::Config;
use crate::pr::types::lenient_u64;
use crate::pr::{
    DiffFetcher, PrError, PullRequestRef, ReviewComment, ReviewEvent, ReviewPoster,
    ReviewSubmission,
};
use crate::prompts::DEFAULT_REVIEW_BODY;

pub const GET_PULL_REQUEST_DIFF: &str = "get_pull_request_diff";
pub const POST_REVIEW_COMMENTS: &str = "post_review_comments";

/// Name, description and JSON schema of a tool, as advertised to the model.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn failure(context: &str, err: impl std::fmt::Display) -> Self {
        Self {
            text: format!("Error {context}: {err}"),
            is_error: true,
        }
    }
}

/// A single callable tool.
#[async_trait]
pub trait Tool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    async fn call(&self, args: Value) -> ToolOutput;
}

/// Identifies the pull request a tool acts on.
#[derive(Debug, Deserialize, JsonSchema)]
struct PullRequestArgs {
    /// Repository owner (user or organization)
    owner: String,
    /// Repository name
    repo: String,
    /// Pull request number
    #[serde(deserialize_with = "lenient_u64")]
    #[schemars(with = "u64")]
    pr_number: u64,
}

impl TryFrom<PullRequestArgs> for PullRequestRef {
    type Error = PrError;

    fn try_from(args: PullRequestArgs) -> Result<Self, Self::Error> {
        let pr = PullRequestRef::new(args.owner, args.repo, args.pr_number);
        pr.validate()?;
        Ok(pr)
    }
}

/// Review to submit to a pull request.
#[derive(Debug, Deserialize, JsonSchema)]
struct PostReviewArgs {
    #[serde(flatten)]
    pr: PullRequestArgs,
    /// Summary text of the review; a default summary is used when omitted
    #[serde(default)]
    body: Option<String>,
    /// Review event, COMMENT when omitted
    #[serde(default)]
    #[schemars(with = "Option<ReviewEvent>")]
    event: Option<String>,
    /// Line comments anchored to the diff
    #[serde(default)]
    comments: Option<Vec<ReviewComment>>,
}

impl PostReviewArgs {
    fn into_parts(self) -> Result<(PullRequestRef, ReviewSubmission), PrError> {
        let event = match self.event.as_deref() {
            Some(event) => event.parse::<ReviewEvent>().map_err(PrError::InvalidArguments)?,
            None => ReviewEvent::default(),
        };
        let body = self
            .body
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REVIEW_BODY.to_string());
        let submission =
            ReviewSubmission::new(body, event).with_comments(self.comments.unwrap_or_default());
        Ok((self.pr.try_into()?, submission))
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(args: Value) -> Result<T, PrError> {
    serde_json::from_value(args).map_err(|e| PrError::InvalidArguments(e.to_string()))
}

pub struct GetPullRequestDiff {
    fetcher: DiffFetcher,
}

impl GetPullRequestDiff {
    pub fn new(fetcher: DiffFetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl Tool for GetPullRequestDiff {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: GET_PULL_REQUEST_DIFF,
            description: "Fetch the unified diff of a GitHub pull request.",
            parameters: schema_for!(PullRequestArgs).to_value(),
        }
    }

    async fn call(&self, args: Value) -> ToolOutput {
        let result = match parse_args::<PullRequestArgs>(args).and_then(PullRequestRef::try_from) {
            Ok(pr) => self.fetcher.fetch_diff(&pr).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(diff) => ToolOutput::success(diff),
            Err(e) => ToolOutput::failure("fetching pull request diff", e),
        }
    }
}

pub struct PostReviewComments {
    poster: ReviewPoster,
}

impl PostReviewComments {
    pub fn new(poster: ReviewPoster) -> Self {
        Self { poster }
    }
}

#[async_trait]
impl Tool for PostReviewComments {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: POST_REVIEW_COMMENTS,
            description: "Submit a review, optionally with line comments, to a GitHub pull request.",
            parameters: schema_for!(PostReviewArgs).to_value(),
        }
    }

    async fn call(&self, args: Value) -> ToolOutput {
        let result = match parse_args::<PostReviewArgs>(args).and_then(PostReviewArgs::into_parts)
        {
            Ok((pr, submission)) => self.poster.post_review(&pr, &submission).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(message) => ToolOutput::success(message),
            Err(e) => ToolOutput::failure("posting review comments", e),
        }
    }
}

/// Registry the orchestrator dispatches tool calls through.
pub struct Toolbox {
    tools: Vec<Box<dyn Tool>>,
}

impl Toolbox {
    pub fn new(tools: Vec<Box<dyn Tool>>) -> Self {
        Self { tools }
    }

    /// The standard diff + review tool pair, wired from config.
    pub fn from_config(config: &Config) -> Result<Self, PrError> {
        Ok(Self::new(vec![
            Box::new(GetPullRequestDiff::new(DiffFetcher::new(config)?)),
            Box::new(PostReviewComments::new(ReviewPoster::from_config(config)?)),
        ]))
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    pub async fn call(&self, name: &str, args: Value) -> ToolOutput {
        let Some(tool) = self.tools.iter().find(|t| t.definition().name == name) else {
            warn!(tool = name, "unknown tool requested");
            return ToolOutput::failure("calling tool", format!("unknown tool '{name}'"));
        };

        let output = tool
            .call(args)
            .instrument(info_span!("tool", name = name))
            .await;
        debug!(tool = name, is_error = output.is_error, bytes = output.text.len(), "tool finished");
        output
    }
}
