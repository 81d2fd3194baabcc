use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::PrError;

/// Identifies a target pull request.
/// Extracted by parse_pr_url() in pr/mod.rs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    pub owner: String,
    pub repo: String,
    pub pr_number: u64,
}

impl PullRequestRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, pr_number: u64) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            pr_number,
        }
    }

    /// Check that owner and repo are plain GitHub names, so each lands in the
    /// request URL as exactly one path segment.
    pub fn validate(&self) -> Result<(), PrError> {
        for (field, value) in [("owner", &self.owner), ("repo", &self.repo)] {
            if !is_valid_name(value) {
                return Err(PrError::InvalidArguments(format!(
                    "invalid {field} '{value}': expected letters, digits, '.', '_' or '-'"
                )));
            }
        }
        Ok(())
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

impl fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.pr_number)
    }
}

/// A single line comment attached to a review.
///
/// Only `path`, `position` and `body` are sent to GitHub; any other key is
/// rejected rather than silently dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ReviewComment {
    /// File path as it appears in the diff
    pub path: String,
    /// Line offset within the diff hunk
    #[serde(deserialize_with = "lenient_u64")]
    #[schemars(with = "u64")]
    pub position: u64,
    /// Comment text
    pub body: String,
}

/// GitHub's classification of a submitted review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewEvent {
    #[default]
    Comment,
    Approve,
    RequestChanges,
}

impl fmt::Display for ReviewEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewEvent::Comment => write!(f, "COMMENT"),
            ReviewEvent::Approve => write!(f, "APPROVE"),
            ReviewEvent::RequestChanges => write!(f, "REQUEST_CHANGES"),
        }
    }
}

impl FromStr for ReviewEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "COMMENT" => Ok(ReviewEvent::Comment),
            "APPROVE" => Ok(ReviewEvent::Approve),
            "REQUEST_CHANGES" => Ok(ReviewEvent::RequestChanges),
            other => Err(format!(
                "unknown review event '{other}', expected COMMENT, APPROVE or REQUEST_CHANGES"
            )),
        }
    }
}

/// Request body for `POST /repos/{owner}/{repo}/pulls/{n}/reviews`.
/// `comments` is left out of the JSON entirely when there are none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReviewSubmission {
    /// Summary text
    pub body: String,
    pub event: ReviewEvent,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<ReviewComment>,
}

impl ReviewSubmission {
    pub fn new(body: impl Into<String>, event: ReviewEvent) -> Self {
        Self {
            body: body.into(),
            event,
            comments: Vec::new(),
        }
    }

    pub fn with_comments(mut self, comments: Vec<ReviewComment>) -> Self {
        self.comments = comments;
        self
    }
}

/// Accepts `42` as well as `"42"`; LLM callers frequently quote numbers.
pub fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(u64),
        Text(String),
    }

    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| serde::de::Error::custom(format!("expected a number, got '{s}'"))),
    }
}
