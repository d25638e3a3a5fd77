//! Errors the binary needs to tell apart from generic failures.

/// Failures that end a release run on purpose rather than by accident.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseError {
    /// Operator input is malformed; usage help should accompany the message.
    InvalidInput(String),
    /// An unpublished release already exists on the repository.
    DraftConflict {
        /// Title of the conflicting draft
        title: String,
    },
}

impl std::fmt::Display for ReleaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReleaseError::InvalidInput(msg) => write!(f, "{}", msg),
            ReleaseError::DraftConflict { title } => write!(
                f,
                "Release '{}' is already a draft; Publish that release first, or discard it and make a new one.",
                title
            ),
        }
    }
}

impl std::error::Error for ReleaseError {}

impl ReleaseError {
    pub fn invalid_input(msg: impl Into<String>) -> anyhow::Error {
        anyhow::Error::from(ReleaseError::InvalidInput(msg.into()))
    }

    /// Returns true when the error chain carries an [`ReleaseError::InvalidInput`].
    pub fn is_invalid_input(err: &anyhow::Error) -> bool {
        matches!(
            err.downcast_ref::<ReleaseError>(),
            Some(ReleaseError::InvalidInput(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_draft_conflict_display_names_release() {
        let err = ReleaseError::DraftConflict {
            title: "Nightly build".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'Nightly build'"));
        assert!(msg.contains("Publish that release first"));
    }

    #[test]
    fn test_is_invalid_input_survives_context() {
        let err: anyhow::Error = Err::<(), _>(ReleaseError::invalid_input("bad commit"))
            .context("Validating inputs")
            .unwrap_err();
        assert!(ReleaseError::is_invalid_input(&err));
    }

    #[test]
    fn test_is_invalid_input_rejects_other_errors() {
        let conflict = anyhow::Error::from(ReleaseError::DraftConflict {
            title: "x".into(),
        });
        assert!(!ReleaseError::is_invalid_input(&conflict));
        assert!(!ReleaseError::is_invalid_input(&anyhow::anyhow!("boom")));
    }
}
