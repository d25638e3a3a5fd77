use std::path::Path;

use anyhow::{Context, Result};
use log::debug;

use crate::error::ReleaseError;
use crate::runtime::Runtime;

/// Reads the API token: the first line of `token_file`, trimmed.
/// Later lines are never read, so they may hold anything.
#[tracing::instrument(skip(runtime))]
pub fn load_credential<R: Runtime>(runtime: &R, token_file: &Path) -> Result<String> {
    let line = runtime
        .read_first_line(token_file)
        .with_context(|| format!("Failed to read API token from {}", token_file.display()))?;

    let line = String::from_utf8(line).map_err(|_| {
        ReleaseError::invalid_input(format!(
            "The first line of {} is not valid UTF-8.",
            token_file.display()
        ))
    })?;

    let token = line.trim().to_string();
    if token.is_empty() {
        return Err(ReleaseError::invalid_input(format!(
            "{} does not contain an API token on its first line.",
            token_file.display()
        )));
    }

    debug!("Loaded API token {}", mask_token(&token));
    Ok(token)
}

/// Masks a token for logs, keeping four characters at each end of long tokens.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() < 12 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}****{}", head, tail)
}
