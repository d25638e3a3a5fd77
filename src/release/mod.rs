//! Release orchestration: from validated inputs to an uploaded draft release.
//!
//! A run walks through the [`Stage`]s in order and stops at the first
//! failure. Nothing is rolled back: an error during upload leaves a draft
//! release holding the assets uploaded so far.

mod assets;
mod metadata;

use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};

use crate::{
    config::ReleaseConfig,
    credential::load_credential,
    error::ReleaseError,
    github::{GitHub, GitHubRepo, NewRelease, Release, ReleaseApi, ReleaseAsset, Repository},
    runtime::Runtime,
    validate::{validate_inputs, validate_release_presets},
};

pub use assets::{asset_name, collect_asset_files};
pub use metadata::{
    NAME_PROMPT, ReleaseMetadata, TAG_PROMPT, get_valid_input, prompt_release_metadata,
    release_message, tag_message,
};

/// Progress of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    InputsValidated,
    Authenticated,
    NoDraftConfirmed,
    MetadataCollected,
    ReleaseCreated,
    AssetsUploading,
    Done,
    Aborted,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Start => "start",
            Stage::InputsValidated => "inputs validated",
            Stage::Authenticated => "authenticated",
            Stage::NoDraftConfirmed => "no draft confirmed",
            Stage::MetadataCollected => "metadata collected",
            Stage::ReleaseCreated => "release created",
            Stage::AssetsUploading => "assets uploading",
            Stage::Done => "done",
            Stage::Aborted => "aborted",
        };
        write!(f, "{}", s)
    }
}

/// A repository resolved with the operator's credential.
#[derive(Debug, Clone, PartialEq)]
pub struct RepoHandle {
    pub repo: GitHubRepo,
    pub info: Repository,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishSummary {
    pub release: Release,
    pub assets: Vec<ReleaseAsset>,
}

/// Validates the configuration, authenticates with the API token and runs
/// the release against GitHub.
#[tracing::instrument(skip(runtime, config))]
pub async fn publish<R: Runtime>(runtime: R, config: &ReleaseConfig) -> Result<PublishSummary> {
    debug!("Stage: {}", Stage::Start);

    let result = validate_and_run(runtime, config).await;
    if let Err(e) = &result {
        debug!("Stage: {} ({:#})", Stage::Aborted, e);
    }
    result
}

async fn validate_and_run<R: Runtime>(runtime: R, config: &ReleaseConfig) -> Result<PublishSummary> {
    let repo = validate_inputs(
        &runtime,
        &config.token_file,
        &config.repo_name,
        &config.commit_id,
        &config.asset_dir,
    )?;
    validate_release_presets(
        config.release_name.as_deref(),
        config.release_tag.as_deref(),
    )?;
    debug!("Stage: {}", Stage::InputsValidated);

    if let Some(branch) = &config.branch {
        info!("Publishing snapshot of branch {}", branch);
    }

    let token = load_credential(&runtime, &config.token_file)?;
    let github = GitHub::new(&token, config.api_url.clone())?;

    Publisher::new(runtime, github).run(config, repo).await
}

pub struct Publisher<R: Runtime, G: ReleaseApi> {
    pub runtime: R,
    pub api: G,
}

impl<R: Runtime, G: ReleaseApi> Publisher<R, G> {
    pub fn new(runtime: R, api: G) -> Self {
        Self { runtime, api }
    }

    /// Runs every stage after input validation.
    #[tracing::instrument(skip(self, config))]
    pub async fn run(&self, config: &ReleaseConfig, repo: GitHubRepo) -> Result<PublishSummary> {
        let handle = self.authenticate(repo).await?;
        debug!("Stage: {}", Stage::Authenticated);

        self.assert_no_existing_draft(&handle).await?;
        debug!("Stage: {}", Stage::NoDraftConfirmed);

        let metadata = prompt_release_metadata(
            &self.runtime,
            config.release_name.as_deref(),
            config.release_tag.as_deref(),
        )?;
        debug!("Stage: {}", Stage::MetadataCollected);

        let release = self
            .create_draft_release(&handle, &metadata, &config.commit_id)
            .await?;
        debug!("Stage: {}", Stage::ReleaseCreated);

        let assets = self.upload_assets(&release, &config.asset_dir).await?;
        debug!("Stage: {}", Stage::Done);

        Ok(PublishSummary { release, assets })
    }

    /// Resolves the repository, proving the credential can see it.
    #[tracing::instrument(skip(self))]
    pub async fn authenticate(&self, repo: GitHubRepo) -> Result<RepoHandle> {
        let info = self
            .api
            .get_repository(&repo)
            .await
            .with_context(|| format!("Aborted at stage '{}'", Stage::InputsValidated))?;
        info!("Authenticated against {} for {}", self.api.api_url(), info.full_name);
        Ok(RepoHandle { repo, info })
    }

    /// Refuses to go on while an unpublished release exists.
    #[tracing::instrument(skip(self, handle))]
    pub async fn assert_no_existing_draft(&self, handle: &RepoHandle) -> Result<()> {
        println!("Checking existing releases...");

        let releases = self
            .api
            .list_releases(&handle.repo)
            .await
            .with_context(|| format!("Aborted at stage '{}'", Stage::Authenticated))?;
        debug!("{} has {} release(s)", handle.repo, releases.len());

        if let Some(draft) = releases.iter().find(|r| r.draft) {
            return Err(anyhow::Error::from(ReleaseError::DraftConflict {
                title: draft.title().to_string(),
            }));
        }
        Ok(())
    }

    /// Tags `commit_id` and wraps the tag in a draft prerelease.
    #[tracing::instrument(skip(self, handle, metadata))]
    pub async fn create_draft_release(
        &self,
        handle: &RepoHandle,
        metadata: &ReleaseMetadata,
        commit_id: &str,
    ) -> Result<Release> {
        println!("Creating new draft release...");

        let new_release = NewRelease {
            tag: metadata.tag.clone(),
            tag_message: tag_message(&metadata.tag),
            name: metadata.name.clone(),
            message: release_message(&metadata.name, commit_id),
            target_commit: commit_id.to_string(),
            draft: true,
            prerelease: true,
        };

        let release = self
            .api
            .create_tagged_release(&handle.repo, &new_release)
            .await
            .with_context(|| format!("Aborted at stage '{}'", Stage::MetadataCollected))?;
        info!("Created draft release {} (id {})", release.tag_name, release.id);
        Ok(release)
    }

    /// Uploads every file under `asset_dir`, one at a time, in traversal order.
    /// Each file is streamed from disk rather than loaded whole.
    #[tracing::instrument(skip(self, release))]
    pub async fn upload_assets(
        &self,
        release: &Release,
        asset_dir: &Path,
    ) -> Result<Vec<ReleaseAsset>> {
        println!("Uploading assets...");
        debug!("Stage: {}", Stage::AssetsUploading);

        let files = collect_asset_files(&self.runtime, asset_dir)?;
        let mut uploaded = Vec::with_capacity(files.len());

        for file in files {
            let name = asset_name(&file)?;
            println!("  Uploading {}...", name);

            let asset = self
                .api
                .upload_asset(release, &name, &file)
                .await
                .with_context(|| {
                    format!(
                        "Aborted at stage '{}' after {} upload(s); draft {} is incomplete",
                        Stage::AssetsUploading,
                        uploaded.len(),
                        release.tag_name
                    )
                })?;
            uploaded.push(asset);
        }

        Ok(uploaded)
    }
}
