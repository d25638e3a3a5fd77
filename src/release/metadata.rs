//! Release name and tag collection.

use anyhow::{Result, anyhow};
use log::debug;

use crate::runtime::Runtime;
use crate::validate::{is_valid_release_name, is_valid_tag, validate_release_presets};

pub const NAME_PROMPT: &str = "Enter release name";
pub const TAG_PROMPT: &str = "Enter a release tag (must be of format 'v1.0.0')";

/// A validated release name and tag.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseMetadata {
    pub name: String,
    pub tag: String,
}

/// Asks until `predicate` accepts the trimmed answer.
///
/// Fails if the input runs out first, so a closed stdin cannot spin forever.
pub fn get_valid_input<R, P>(runtime: &R, prompt: &str, predicate: P) -> Result<String>
where
    R: Runtime,
    P: Fn(&str) -> bool,
{
    loop {
        let answer = runtime
            .prompt(prompt)?
            .ok_or_else(|| anyhow!("Input ended before a valid answer to '{}'", prompt))?;

        let answer = answer.trim();
        if predicate(answer) {
            return Ok(answer.to_string());
        }
        debug!("Rejected answer {:?} to '{}'", answer, prompt);
    }
}

/// Collects the release name and tag, prompting for whichever was not
/// supplied up front. Supplied values must already be valid.
///
/// Answers are trimmed before they are checked, so padding never counts
/// toward the minimum name length and is not kept in the stored name.
#[tracing::instrument(skip(runtime))]
pub fn prompt_release_metadata<R: Runtime>(
    runtime: &R,
    preset_name: Option<&str>,
    preset_tag: Option<&str>,
) -> Result<ReleaseMetadata> {
    validate_release_presets(preset_name, preset_tag)?;

    let name = match preset_name {
        Some(name) => name.trim().to_string(),
        None => get_valid_input(runtime, NAME_PROMPT, is_valid_release_name)?,
    };

    let tag = match preset_tag {
        Some(tag) => tag.trim().to_string(),
        None => get_valid_input(runtime, TAG_PROMPT, is_valid_tag)?,
    };

    Ok(ReleaseMetadata { name, tag })
}

pub fn tag_message(tag: &str) -> String {
    format!("tag message for {}", tag)
}

pub fn release_message(name: &str, commit_id: &str) -> String {
    format!("Release: {}\nbased on commit: {}", name, commit_id)
}
