#![deny(missing_docs)]

//! # Routegen Core
//!
//! Core library for the comment-directive route generator.
//!
//! Handler sources annotate types with `// @action <basePath>` and pointer
//! receiver methods with `// @router <subPath> [<methods>]`. The pipeline
//! scans the controllers tree, builds a route model, skips work when the
//! model hash is unchanged, and otherwise rewrites one registration file per
//! handler type.

/// Shared error types.
pub mod error;

/// Generator settings.
pub mod config;

/// Directive grammar.
pub mod directive;

/// Source tree scanning.
pub mod scanner;

/// Directive extraction strategies.
pub mod extract;

/// Route model and builder.
pub mod model;

/// Model hashing and the change gate.
pub mod change;

/// Strategy Pattern Interfaces.
pub mod strategies;

/// Artifact rendering and output directory management.
pub mod route_generator;

/// End-to-end generation run.
pub mod pipeline;

pub use change::{
    ChangeDetector, ChangeStatus, FileHashStore, HashStore, MemoryHashStore, OutputSettings,
};
pub use config::{GeneratorConfig, ScanDepth};
pub use error::{AppError, AppResult};
pub use extract::{AdjacencyExtractor, DirectiveExtractor, ExtractorKind, StructuralExtractor};
pub use model::{HandlerAction, RouteBinding, RouteModel};
pub use pipeline::{build_route_model, clean_artifacts, generate_routes, GenerationOutcome};
pub use strategies::{BeegoStrategy, RegistrationStrategy};
