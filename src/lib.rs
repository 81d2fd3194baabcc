//! Tools for an LLM-driven pull request reviewer: fetch a PR diff, post a review.

pub mod config;
pub mod pr;
pub mod prompts;
pub mod tools;

#[cfg(test)]
mod testutil;

pub use config::Config;
pub use pr::{
    parse_pr_url, DiffFetcher, ErrorKind, PrError, PullRequestRef, ReviewComment, ReviewEvent,
    ReviewPoster, ReviewSubmission,
};
pub use tools::{Tool, ToolDefinition, ToolOutput, Toolbox};
