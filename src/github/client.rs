use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use log::debug;
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue},
};
use std::path::Path;
use tokio::fs::File;

use crate::credential::mask_token;
use crate::http::HttpClient;

use super::ReleaseApi;
use super::repo::GitHubRepo;
use super::types::{
    CreateRefRequest, CreateReleaseRequest, CreateTagRequest, GitRef, NewRelease, Release,
    ReleaseAsset, Repository, TagObject,
};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const PER_PAGE: usize = 100;
/// Listing more pages than this fails rather than returning a partial list.
const MAX_PAGES: usize = 100;

pub struct GitHub {
    http_client: HttpClient,
    api_url: String,
}

impl GitHub {
    /// Builds an authenticated session. No request is made until the first call.
    #[tracing::instrument(skip(token))]
    pub fn new(token: &str, api_url: Option<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();

        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
            .context("API token contains characters not allowed in an HTTP header")?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static("2022-11-28"),
        );
        debug!("Using API token {} for authentication", mask_token(token));

        let client = Client::builder()
            .user_agent(concat!("ghrp/", env!("GHRP_VERSION")))
            .default_headers(headers)
            .build()?;

        let api_url = api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Ok(Self::from_http_client(HttpClient::new(client), &api_url))
    }

    /// Create from an existing HttpClient.
    pub fn from_http_client(http_client: HttpClient, api_url: &str) -> Self {
        Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn repo_url(&self, repo: &GitHubRepo, suffix: &str) -> String {
        format!("{}{}{}", self.api_url, repo.api_path(), suffix)
    }

    async fn create_tag_object(&self, repo: &GitHubRepo, new_release: &NewRelease) -> Result<TagObject> {
        let url = self.repo_url(repo, "/git/tags");
        debug!("Creating tag object {} at {}...", new_release.tag, new_release.target_commit);

        let body = CreateTagRequest {
            tag: &new_release.tag,
            message: &new_release.tag_message,
            object: &new_release.target_commit,
            object_type: "commit",
        };
        self.http_client
            .post_json(&url, &body)
            .await
            .with_context(|| {
                format!(
                    "Failed to create tag {} on commit {}",
                    new_release.tag, new_release.target_commit
                )
            })
    }

    async fn create_tag_ref(&self, repo: &GitHubRepo, tag: &str, sha: &str) -> Result<GitRef> {
        let url = self.repo_url(repo, "/git/refs");
        debug!("Creating ref refs/tags/{} -> {}...", tag, sha);

        let body = CreateRefRequest {
            git_ref: format!("refs/tags/{}", tag),
            sha,
        };
        self.http_client
            .post_json(&url, &body)
            .await
            .with_context(|| format!("Failed to create ref for tag {}", tag))
    }
}

#[async_trait]
impl ReleaseApi for GitHub {
    fn api_url(&self) -> &str {
        &self.api_url
    }

    #[tracing::instrument(skip(self))]
    async fn get_repository(&self, repo: &GitHubRepo) -> Result<Repository> {
        let url = self.repo_url(repo, "");
        debug!("Fetching repository from {}...", url);

        self.http_client
            .get_json(&url)
            .await
            .with_context(|| format!("Failed to look up repository {}", repo))
    }

    #[tracing::instrument(skip(self))]
    async fn list_releases(&self, repo: &GitHubRepo) -> Result<Vec<Release>> {
        let url = self.repo_url(repo, "/releases");
        let per_page = PER_PAGE.to_string();
        let mut releases = Vec::new();

        // A short or empty page is the last one.
        for page in 1..=MAX_PAGES {
            debug!("Fetching releases page {} from {}...", page, url);

            let page_str = page.to_string();
            let parsed: Vec<Release> = self
                .http_client
                .get_json_with_query(&url, &[("per_page", per_page.as_str()), ("page", page_str.as_str())])
                .await
                .with_context(|| format!("Failed to list releases of {}", repo))?;

            let len = parsed.len();
            releases.extend(parsed);

            if len < PER_PAGE {
                return Ok(releases);
            }
        }

        Err(anyhow!(
            "{} has more than {} releases; refusing to continue without the full list",
            repo,
            PER_PAGE * MAX_PAGES
        ))
    }

    #[tracing::instrument(skip(self, new_release), fields(tag = %new_release.tag))]
    async fn create_tagged_release(
        &self,
        repo: &GitHubRepo,
        new_release: &NewRelease,
    ) -> Result<Release> {
        let tag_object = self.create_tag_object(repo, new_release).await?;
        let git_ref = self
            .create_tag_ref(repo, &new_release.tag, &tag_object.sha)
            .await?;
        debug!("Created {} -> {}", git_ref.git_ref, tag_object.sha);

        let url = self.repo_url(repo, "/releases");
        debug!("Creating release {} at {}...", new_release.tag, url);

        let body = CreateReleaseRequest {
            tag_name: &new_release.tag,
            target_commitish: &new_release.target_commit,
            name: &new_release.name,
            body: &new_release.message,
            draft: new_release.draft,
            prerelease: new_release.prerelease,
        };
        self.http_client
            .post_json(&url, &body)
            .await
            .with_context(|| format!("Failed to create release {}", new_release.tag))
    }

    #[tracing::instrument(skip(self, release), fields(release = release.id))]
    async fn upload_asset(
        &self,
        release: &Release,
        name: &str,
        path: &Path,
    ) -> Result<ReleaseAsset> {
        let endpoint = release
            .upload_endpoint()
            .ok_or_else(|| anyhow!("Release {} has no upload URL", release.tag_name))?;

        let file = File::open(path)
            .await
            .with_context(|| format!("Failed to open asset {}", path.display()))?;
        let size = file
            .metadata()
            .await
            .with_context(|| format!("Failed to read metadata of {}", path.display()))?
            .len();
        debug!("Streaming {} ({} bytes) to {}...", name, size, endpoint);

        self.http_client
            .post_body(
                endpoint,
                &[("name", name)],
                "application/octet-stream",
                size,
                file,
            )
            .await
            .with_context(|| format!("Failed to upload asset {}", name))
    }
}
