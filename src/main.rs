use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, info_span, Instrument};
use tracing_subscriber::EnvFilter;

use pr_review_agent::prompts::{DEFAULT_REVIEW_BODY, REVIEWER_INSTRUCTIONS};
use pr_review_agent::{
    parse_pr_url, Config, DiffFetcher, ReviewComment, ReviewEvent, ReviewPoster,
    ReviewSubmission, ToolOutput, Toolbox,
};

/// PR Review Agent: fetches a GitHub Pull Request diff and posts review
/// comments back, standing in for the LLM that normally drives these tools.
#[derive(Parser, Debug)]
#[command(name = "pr-review-agent", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the unified diff of a pull request
    Diff {
        /// GitHub Pull Request URL (e.g., https://github.com/org/repo/pull/42)
        pr_url: String,
    },

    /// Submit a review to a pull request (needs GITHUB_TOKEN)
    Review {
        /// GitHub Pull Request URL
        pr_url: String,

        /// Summary text of the review
        #[arg(short, long)]
        body: Option<String>,

        /// COMMENT, APPROVE or REQUEST_CHANGES
        #[arg(short, long, default_value_t = ReviewEvent::Comment)]
        event: ReviewEvent,

        /// JSON file with an array of {path, position, body} line comments
        #[arg(short, long)]
        comments: Option<PathBuf>,
    },

    /// Print the tool definitions offered to the model
    Tools {
        /// Print the reviewer instructions instead
        #[arg(long)]
        instructions: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("loading configuration");
    let config = Config::load()?;

    match cli.command {
        Command::Diff { pr_url } => {
            let span = info_span!("diff", pr_url = %pr_url);
            run_diff(&config, &pr_url).instrument(span).await
        }
        Command::Review {
            pr_url,
            body,
            event,
            comments,
        } => {
            let span = info_span!("review", pr_url = %pr_url);
            run_review(&config, &pr_url, body, event, comments.as_deref())
                .instrument(span)
                .await
        }
        Command::Tools { instructions } => {
            if instructions {
                println!("{REVIEWER_INSTRUCTIONS}");
            } else {
                let toolbox = Toolbox::from_config(&config)?;
                println!("{}", serde_json::to_string_pretty(&toolbox.definitions())?);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_diff(config: &Config, pr_url: &str) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let pr = parse_pr_url(pr_url)?;
    debug!(owner = %pr.owner, repo = %pr.repo, pr = pr.pr_number, "parsed PR URL");

    let fetcher = DiffFetcher::new(config)?;
    match fetcher.fetch_diff(&pr).await {
        Ok(diff) => {
            print!("{diff}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Ok(report(&ToolOutput::failure("fetching pull request diff", e))),
    }
}

async fn run_review(
    config: &Config,
    pr_url: &str,
    body: Option<String>,
    event: ReviewEvent,
    comments: Option<&Path>,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let pr = parse_pr_url(pr_url)?;

    let comments = match comments {
        Some(path) => load_comments(path)?,
        None => Vec::new(),
    };
    info!(comments = comments.len(), %event, "submitting review");

    let submission = ReviewSubmission::new(
        body.unwrap_or_else(|| DEFAULT_REVIEW_BODY.to_string()),
        event,
    )
    .with_comments(comments);

    let poster = ReviewPoster::from_config(config)?;
    let output = match poster.post_review(&pr, &submission).await {
        Ok(message) => ToolOutput::success(message),
        Err(e) => ToolOutput::failure("posting review comments", e),
    };
    Ok(report(&output))
}

fn load_comments(path: &Path) -> Result<Vec<ReviewComment>, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    let comments = serde_json::from_str(&contents)?;
    Ok(comments)
}

fn report(output: &ToolOutput) -> ExitCode {
    if output.is_error {
        eprintln!("{}", output.text.red().bold());
        ExitCode::FAILURE
    } else {
        println!("{}", output.text.green());
        ExitCode::SUCCESS
    }
}
