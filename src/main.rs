use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use ghrp::{config::ReleaseConfig, error::ReleaseError, release::publish};

/// ghrp - GitHub Release Publisher
///
/// Create a draft prerelease tagged to a commit and upload a directory of
/// assets to it. Refuses to run while another draft release exists.
///
/// Every positional argument can also be given through the environment
/// variable shown next to it.
///
/// Examples:
///   ghrp ~/.gh-token owner/repo 3f2c...e91a ./dist
///   API_TOKEN_FILE=~/.gh-token RELEASE_REPO=owner/repo SNAPSHOT_COMMIT=3f2c...e91a ASSET_DIR=./dist ghrp
#[derive(Parser, Debug)]
#[command(author, version = env!("GHRP_VERSION"), about)]
struct Cli {
    /// File containing a single line: your GitHub API token
    #[arg(value_name = "API_TOKEN_FILE", env = "API_TOKEN_FILE")]
    api_token_file: PathBuf,

    /// Name of the GitHub repository to release into, as "owner/repo"
    #[arg(value_name = "OWNER/REPO", env = "RELEASE_REPO")]
    repo_name: String,

    /// Full 40 character commit id the release is tagged at
    #[arg(value_name = "COMMIT_ID", env = "SNAPSHOT_COMMIT")]
    commit_id: String,

    /// Directory containing assets to upload (binaries, etc.)
    #[arg(value_name = "ASSET_DIR", env = "ASSET_DIR")]
    asset_dir: PathBuf,

    /// Branch the snapshot was built from (informational)
    #[arg(long = "branch", value_name = "BRANCH", env = "SNAPSHOT_BRANCH")]
    branch: Option<String>,

    /// Release name; prompted for when absent
    #[arg(long = "name", value_name = "NAME", env = "RELEASE_NAME")]
    release_name: Option<String>,

    /// Release tag such as v1.0.0; prompted for when absent
    #[arg(long = "tag", value_name = "TAG", env = "RELEASE_TAG")]
    release_tag: Option<String>,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", value_name = "URL", env = "GITHUB_API_URL")]
    api_url: Option<String>,
}

impl From<Cli> for ReleaseConfig {
    fn from(cli: Cli) -> Self {
        ReleaseConfig {
            token_file: cli.api_token_file,
            repo_name: cli.repo_name,
            commit_id: cli.commit_id,
            asset_dir: cli.asset_dir,
            branch: cli.branch,
            release_name: cli.release_name,
            release_tag: cli.release_tag,
            api_url: cli.api_url,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let config = ReleaseConfig::from(Cli::parse());
    let runtime = ghrp::runtime::RealRuntime;

    match publish(runtime, &config).await {
        Ok(summary) => {
            println!(
                "Draft release {} created with {} asset(s).",
                summary.release.tag_name,
                summary.assets.len()
            );
            if let Some(url) = &summary.release.html_url {
                println!("Review and publish it at {}", url);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            if ReleaseError::is_invalid_input(&e) {
                let _ = Cli::command().print_help();
                println!();
            }
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
