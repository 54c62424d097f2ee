//! Error types for post-processing runs
//!
//! Absent resolvers, unresolvable fonts and missing markers are not errors;
//! stages degrade to pass-through for those. What remains here is surfaced
//! to the caller of `PostProcessor::run`, which decides whether to serve the
//! unprocessed markup.

use thiserror::Error;

/// Result type alias for pipeline operations
pub type PostProcessResult<T> = Result<T, PostProcessError>;

/// Boxed error carried from a failing stage
pub type StageFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error types for pipeline registration and runs
#[derive(Debug, Error)]
pub enum PostProcessError {
    /// Stage registered without a name
    #[error("Post-processor stage name must not be empty")]
    InvalidStageName,

    /// Stage failed while inspecting the parsed document
    #[error("Stage '{stage}' failed during inspect: {source}")]
    Inspect { stage: String, source: StageFailure },

    /// Stage failed while mutating the markup
    #[error("Stage '{stage}' failed during mutate: {source}")]
    Mutate { stage: String, source: StageFailure },
}

impl PostProcessError {
    pub(crate) fn inspect(stage: &str, error: anyhow::Error) -> Self {
        PostProcessError::Inspect {
            stage: stage.to_string(),
            source: error.into(),
        }
    }

    pub(crate) fn mutate(stage: &str, error: anyhow::Error) -> Self {
        PostProcessError::Mutate {
            stage: stage.to_string(),
            source: error.into(),
        }
    }

    /// Name of the stage that failed, if the error came from a run
    #[must_use]
    pub fn stage(&self) -> Option<&str> {
        match self {
            PostProcessError::InvalidStageName => None,
            PostProcessError::Inspect { stage, .. } | PostProcessError::Mutate { stage, .. } => {
                Some(stage.as_str())
            }
        }
    }
}
