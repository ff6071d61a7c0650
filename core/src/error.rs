//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//! Every variant is fatal to a generation run; nothing is retried.

use derive_more::{Display, From};
use std::path::PathBuf;

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors that are not tied to a specific file.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// The controllers root does not exist.
    #[from(ignore)]
    #[display("Controllers directory does not exist: {_0:?}")]
    MissingDirectory(PathBuf),

    /// A handler source file could not be read.
    #[from(ignore)]
    #[display("Failed to read {path:?}: {source}")]
    FileRead {
        /// The file being read.
        path: PathBuf,
        /// Underlying IO failure.
        source: std::io::Error,
    },

    /// A directive failed its grammar.
    #[from(ignore)]
    #[display("Malformed directive in {path:?}: {reason}")]
    MalformedDirective {
        /// File containing the directive.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// Line-adjacency extraction found a directive without its declaration.
    #[from(ignore)]
    #[display("Adjacency mismatch in {path:?} at line {line}: {reason}")]
    AdjacencyMismatch {
        /// File being scanned.
        path: PathBuf,
        /// 1-based line of the offending declaration (or directive).
        line: usize,
        /// What was expected.
        reason: String,
    },

    /// The declaration tree for a file could not be built.
    #[from(ignore)]
    #[display("Failed to parse {path:?}: {reason}")]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// Parser diagnostic.
        reason: String,
    },

    /// A handler directory produced an empty import path.
    #[from(ignore)]
    #[display("Could not resolve an import path for {_0:?}")]
    UnresolvedImportPath(PathBuf),

    /// Two handler types would be written to the same artifact.
    #[from(ignore)]
    #[display("Generated file name collision: {file_name}")]
    DuplicateArtifact {
        /// The colliding file name.
        file_name: String,
    },

    /// Creating, writing or deleting a generated artifact failed.
    #[from(ignore)]
    #[display("Failed to write {path:?}: {source}")]
    Write {
        /// Target path.
        path: PathBuf,
        /// Underlying IO failure.
        source: std::io::Error,
    },

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Io(e) => Some(e),
            AppError::FileRead { source, .. } | AppError::Write { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_conversion() {
        let io_err = Error::new(ErrorKind::Other, "test");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_string_conversion() {
        let msg = String::from("something wrong");
        let app_err: AppError = msg.into();
        match app_err {
            AppError::General(s) => assert_eq!(s, "something wrong"),
            _ => panic!("String should convert to AppError::General"),
        }
    }

    #[test]
    fn test_malformed_directive_names_file() {
        let err = AppError::MalformedDirective {
            path: PathBuf::from("src/controllers/user.go"),
            reason: "missing sub-path".into(),
        };
        let text = err.to_string();
        assert!(text.contains("user.go"));
        assert!(text.contains("missing sub-path"));
    }

    #[test]
    fn test_write_error_exposes_source() {
        let err = AppError::Write {
            path: PathBuf::from("out.go"),
            source: Error::new(ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
        assert!(AppError::General("x".into()).source().is_none());
    }
}
