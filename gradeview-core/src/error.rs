//! Error types for gradeview operations

use std::path::PathBuf;
use thiserror::Error;

/// gradeview error types
#[derive(Error, Debug)]
pub enum GradeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid glob: {0}")]
    Glob(#[from] glob::PatternError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed primary submission (too few lines, missing marker prefixes)
    #[error("malformed submission {}: {reason}", path.display())]
    Structural { path: PathBuf, reason: String },

    /// Notebook export that is not valid nbformat JSON
    #[error("malformed notebook {}: {source}", path.display())]
    Notebook {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate primary file for {user}: {}", path.display())]
    DuplicatePrimary { user: String, path: PathBuf },

    #[error("orphaned supplementary file for {user}: {}", path.display())]
    OrphanedSupplementary { user: String, path: PathBuf },

    #[error("unexpected file: {}", path.display())]
    UnexpectedFile { path: PathBuf },

    /// Logic bug, never a property of the input
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl GradeError {
    pub(crate) fn structural(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        GradeError::Structural {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by a malformed submission file
    pub fn is_structural(&self) -> bool {
        matches!(self, GradeError::Structural { .. } | GradeError::Notebook { .. })
    }

    /// True for errors raised while classifying the files of a directory
    pub fn is_classification(&self) -> bool {
        matches!(
            self,
            GradeError::DuplicatePrimary { .. }
                | GradeError::OrphanedSupplementary { .. }
                | GradeError::UnexpectedFile { .. }
        )
    }
}

/// Result type for gradeview operations
pub type Result<T> = std::result::Result<T, GradeError>;
