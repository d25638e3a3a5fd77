use serde::{Deserialize, Serialize};

/// The subset of `GET /repos/{owner}/{repo}` the publisher reads.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct Repository {
    pub full_name: String,
    #[serde(default)]
    pub private: bool,
    pub default_branch: Option<String>,
}

/// Represents an uploaded release asset
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone, Default)]
pub struct ReleaseAsset {
    pub id: u64,
    pub name: String,
    pub size: u64,
    pub browser_download_url: String,
}

/// Represents a GitHub release
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone, Default)]
pub struct Release {
    pub id: u64,
    pub tag_name: String,
    pub name: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
    pub target_commitish: Option<String>,
    pub html_url: Option<String>,
    /// Hypermedia template, e.g. `https://uploads.github.com/.../assets{?name,label}`
    pub upload_url: Option<String>,
}

impl Release {
    /// Name shown to people, falling back to the tag for unnamed releases.
    pub fn title(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.tag_name,
        }
    }

    /// Upload endpoint with the `{?name,label}` template suffix removed.
    pub fn upload_endpoint(&self) -> Option<&str> {
        self.upload_url
            .as_deref()
            .map(|url| url.split('{').next().unwrap_or(url))
            .filter(|url| !url.is_empty())
    }
}

/// Everything needed to create a tag and a release wrapping it.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRelease {
    pub tag: String,
    pub tag_message: String,
    pub name: String,
    pub message: String,
    pub target_commit: String,
    pub draft: bool,
    pub prerelease: bool,
}

/// Body of `POST /repos/{owner}/{repo}/git/tags`.
#[derive(Serialize, Debug, PartialEq)]
pub(crate) struct CreateTagRequest<'a> {
    pub tag: &'a str,
    pub message: &'a str,
    pub object: &'a str,
    #[serde(rename = "type")]
    pub object_type: &'a str,
}

/// Annotated tag object returned by the git database API.
#[derive(Deserialize, Debug, PartialEq, Clone)]
pub(crate) struct TagObject {
    pub sha: String,
}

/// Body of `POST /repos/{owner}/{repo}/git/refs`.
#[derive(Serialize, Debug, PartialEq)]
pub(crate) struct CreateRefRequest<'a> {
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub sha: &'a str,
}

#[derive(Deserialize, Debug, PartialEq, Clone)]
pub(crate) struct GitRef {
    #[serde(rename = "ref")]
    pub git_ref: String,
}

/// Body of `POST /repos/{owner}/{repo}/releases`.
#[derive(Serialize, Debug, PartialEq)]
pub(crate) struct CreateReleaseRequest<'a> {
    pub tag_name: &'a str,
    pub target_commitish: &'a str,
    pub name: &'a str,
    pub body: &'a str,
    pub draft: bool,
    pub prerelease: bool,
}
