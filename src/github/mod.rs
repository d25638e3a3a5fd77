//! GitHub REST API access for publishing releases.

mod client;
mod repo;
mod types;

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

pub use client::{DEFAULT_API_URL, GitHub};
pub use repo::GitHubRepo;
pub use types::{NewRelease, Release, ReleaseAsset, Repository};

/// The release-hosting operations the publisher consumes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReleaseApi: Send + Sync {
    /// Get the API base URL.
    fn api_url(&self) -> &str;

    /// Resolve a repository; fails when the token is rejected or the
    /// repository is not visible to it.
    async fn get_repository(&self, repo: &GitHubRepo) -> Result<Repository>;

    /// Fetch all releases of a repository, drafts included.
    async fn list_releases(&self, repo: &GitHubRepo) -> Result<Vec<Release>>;

    /// Create an annotated tag on the target commit and a release wrapping it.
    async fn create_tagged_release(
        &self,
        repo: &GitHubRepo,
        new_release: &NewRelease,
    ) -> Result<Release>;

    /// Stream the file at `path` to `release` as an asset called `name`.
    async fn upload_asset(
        &self,
        release: &Release,
        name: &str,
        path: &Path,
    ) -> Result<ReleaseAsset>;
}
