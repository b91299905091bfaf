//! Error taxonomy for plan building and plan execution

use std::path::PathBuf;
use thiserror::Error;

/// Every failure the generator can report
///
/// All variants are fatal for the run that produced them. Plan-building
/// errors are raised before any file is touched; `Render` and `Filesystem`
/// come from the executor and leave earlier artifacts in place.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The entity's identifier shape is not one the skeletons can handle
    #[error("Unsupported identifier for entity '{entity}': {reason}")]
    UnsupportedIdentifier { entity: String, reason: String },

    /// A module or entity shorthand could not be parsed
    #[error("Invalid identifier '{input}': {reason}")]
    InvalidIdentifier { input: String, reason: String },

    /// An artifact already exists and overwriting was not requested
    #[error("Unable to generate '{}' as it already exists (use --overwrite to replace it)", path.display())]
    Conflict { path: PathBuf },

    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Failed to render {}: {cause}", path.display())]
    Render { path: PathBuf, cause: String },

    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid project manifest {}: {message}", path.display())]
    Manifest { path: PathBuf, message: String },
}

impl GenerationError {
    pub(crate) fn invalid(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn render(path: impl Into<PathBuf>, cause: impl ToString) -> Self {
        Self::Render {
            path: path.into(),
            cause: cause.to_string(),
        }
    }

    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = GenerationError> = std::result::Result<T, E>;
