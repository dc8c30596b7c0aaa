//! Error types for book operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for book operations.
pub type BookResult<T> = Result<T, BookError>;

/// Errors that abort a book operation.
///
/// Every variant is fatal to the whole multi-chapter run; nothing is retried.
#[derive(Debug, Error)]
pub enum BookError {
    /// A chapter directory is missing under the chapter root.
    #[error("directory {} does not exist!", .path.display())]
    MissingChapterDirectory { path: PathBuf },

    /// A chapter has no `src-<chapter>` directory to pack.
    #[error("source directory {} for chapter '{chapter}' does not exist!", .path.display())]
    MissingSourceDirectory { chapter: String, path: PathBuf },

    /// A chapter identifier that is not a single directory name.
    #[error("invalid chapter name '{name}': expected a single directory name")]
    InvalidChapterName { name: String },

    /// A pack root that would not stay inside the book directory.
    #[error("invalid pack root '{root}': expected a relative path below the book directory")]
    InvalidPackRoot { root: String },

    /// An external command exited with a non-zero status.
    #[error(
        "failure in execution of '{command}' in {location} (exit code {})",
        .code.map_or_else(|| "none".to_string(), |c| c.to_string())
    )]
    CommandFailed { location: String, command: String, code: Option<i32> },

    /// An ignored-file pattern could not be compiled.
    #[error("invalid file pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    /// An external command could not be spawned.
    #[error("could not run '{command}': {reason}")]
    Spawn { command: String, reason: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error while walking a directory tree.
    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl BookError {
    /// Whether this error comes from the chapter layout rather than a command.
    pub fn is_missing_directory(&self) -> bool {
        matches!(self, Self::MissingChapterDirectory { .. } | Self::MissingSourceDirectory { .. })
    }
}
