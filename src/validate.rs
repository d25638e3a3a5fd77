//! Input validation for release runs.
//!
//! Everything here is a pure check: nothing touches the network, and the
//! filesystem is only inspected through the [`Runtime`].

use std::path::Path;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use crate::error::ReleaseError;
use crate::github::GitHubRepo;
use crate::runtime::Runtime;

/// Minimum number of characters in a release name.
pub const MIN_NAME_LEN: usize = 10;

static COMMIT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{40}$").expect("commit id pattern is valid"));

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v[0-9]+\.[0-9]+\.[0-9]+$").expect("release tag pattern is valid")
});

/// A full, lowercase, 40 character hex commit id.
pub fn is_valid_commit_id(commit_id: &str) -> bool {
    COMMIT_ID_RE.is_match(commit_id)
}

/// A `vMAJOR.MINOR.PATCH` tag.
pub fn is_valid_tag(tag: &str) -> bool {
    TAG_RE.is_match(tag)
}

pub fn is_valid_release_name(name: &str) -> bool {
    name.chars().count() >= MIN_NAME_LEN
}

/// Checks the operator-supplied paths, repository and commit id before any
/// credential is read or remote call is made.
#[tracing::instrument(skip(runtime))]
pub fn validate_inputs<R: Runtime>(
    runtime: &R,
    token_file: &Path,
    repo_name: &str,
    commit_id: &str,
    asset_dir: &Path,
) -> Result<GitHubRepo> {
    if !runtime.is_file(token_file) {
        return Err(ReleaseError::invalid_input(format!(
            "{} does not exist or is not a file.",
            token_file.display()
        )));
    }

    let repo = repo_name
        .parse::<GitHubRepo>()
        .map_err(|e| ReleaseError::invalid_input(format!("{}: {}", repo_name, e)))?;

    if !runtime.is_dir(asset_dir) {
        return Err(ReleaseError::invalid_input(format!(
            "{} does not exist or is not a directory.",
            asset_dir.display()
        )));
    }

    if !is_valid_commit_id(commit_id) {
        return Err(ReleaseError::invalid_input(format!(
            "{} is not a valid commit id.",
            commit_id
        )));
    }

    Ok(repo)
}

/// Checks a release name and tag given up front, before anything remote
/// happens. Values are judged after trimming, as prompted answers are.
pub fn validate_release_presets(name: Option<&str>, tag: Option<&str>) -> Result<()> {
    if let Some(name) = name.map(str::trim) {
        if !is_valid_release_name(name) {
            return Err(ReleaseError::invalid_input(format!(
                "Release name '{}' must be at least {} characters.",
                name, MIN_NAME_LEN
            )));
        }
    }

    if let Some(tag) = tag.map(str::trim) {
        if !is_valid_tag(tag) {
            return Err(ReleaseError::invalid_input(format!(
                "Release tag '{}' must be of format 'v1.0.0'.",
                tag
            )));
        }
    }

    Ok(())
}
