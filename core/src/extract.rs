//! # Directive Extraction
//!
//! Turns one scanned source file into an optional [`FileDirectives`] record.
//! Two interchangeable strategies implement [`DirectiveExtractor`]:
//!
//! - [`StructuralExtractor`] walks the declaration tree and attaches doc
//!   comments to type and method declarations. This is the production path.
//! - [`AdjacencyExtractor`] scans raw lines and requires each directive to sit
//!   directly above its declaration. It breaks under blank lines, reordered
//!   declarations and multi-line signatures, and is kept as an alternate.

use crate::error::AppResult;
use crate::model::RouteBinding;
use crate::scanner::SourceFile;
use std::path::PathBuf;

/// Line-adjacency strategy.
pub mod adjacency;

/// Declaration-tree strategy.
pub mod structural;

pub use adjacency::AdjacencyExtractor;
pub use structural::StructuralExtractor;

/// An action directive attached to a handler type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDecl {
    /// Handler type carrying the directive.
    pub type_name: String,
    /// Declared route prefix.
    pub base_path: String,
}

/// A route directive attached to a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDecl {
    /// Receiver type of the method.
    pub receiver: String,
    /// The resulting binding.
    pub binding: RouteBinding,
}

/// Everything one file contributes to the route model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDirectives {
    /// Source file path, used in diagnostics.
    pub path: PathBuf,
    /// Declared package name.
    pub package_name: String,
    /// Resolved import path of the file's directory.
    pub import_path: String,
    /// Action directives by type.
    pub actions: Vec<ActionDecl>,
    /// Route directives by receiver type.
    pub routes: Vec<RouteDecl>,
}

/// A strategy for pulling routing directives out of a source file.
pub trait DirectiveExtractor {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Extracts directives from `file`.
    ///
    /// Returns `Ok(None)` when the file contributes nothing.
    fn extract(&self, file: &SourceFile) -> AppResult<Option<FileDirectives>>;
}

/// Selects one of the built-in strategies at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractorKind {
    /// [`StructuralExtractor`].
    #[default]
    Structural,
    /// [`AdjacencyExtractor`].
    Adjacency,
}

impl ExtractorKind {
    /// Instantiates the selected strategy.
    pub fn build(self) -> Box<dyn DirectiveExtractor> {
        match self {
            ExtractorKind::Structural => Box::new(StructuralExtractor),
            ExtractorKind::Adjacency => Box::new(AdjacencyExtractor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_builds_named_strategy() {
        assert_eq!(ExtractorKind::default().build().name(), "structural");
        assert_eq!(ExtractorKind::Adjacency.build().name(), "adjacency");
    }
}
