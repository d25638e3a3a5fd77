//! Settings for one release run, populated once at startup.

use std::path::PathBuf;

/// Everything a release run needs from the operator.
///
/// Built by the binary from command-line arguments, each of which falls back
/// to an environment variable, and passed by reference to the publisher.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReleaseConfig {
    /// File whose first line is the API token
    pub token_file: PathBuf,
    /// Target repository as `owner/repo`
    pub repo_name: String,
    /// Commit the release tag points at
    pub commit_id: String,
    /// Directory whose files become release assets
    pub asset_dir: PathBuf,
    /// Branch the snapshot was taken from; informational only
    pub branch: Option<String>,
    /// Release name supplied up front instead of prompting
    pub release_name: Option<String>,
    /// Release tag supplied up front instead of prompting
    pub release_tag: Option<String>,
    /// API base URL (defaults to https://api.github.com)
    pub api_url: Option<String>,
}
