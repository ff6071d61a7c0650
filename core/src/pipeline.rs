//! # Generation Pipeline
//!
//! Scanner -> extractor -> model builder -> change gate -> cleanup + generation.
//! Every error aborts the run; nothing is written before the model is
//! complete and the gate has reported a change.

use crate::change::{ChangeDetector, ChangeStatus, HashStore, OutputSettings};
use crate::config::GeneratorConfig;
use crate::error::AppResult;
use crate::extract::DirectiveExtractor;
use crate::model::{ModelBuilder, RouteModel};
use crate::route_generator::{cleanup, ensure_output_dir, render_artifacts, write_artifacts};
use crate::scanner::{self, ImportResolver};
use crate::strategies::RegistrationStrategy;
use std::path::PathBuf;

/// Result of a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The model hash matched the stored one; nothing was touched.
    Unchanged {
        /// The current model hash.
        hash: String,
    },
    /// Artifacts were regenerated.
    Generated {
        /// The recorded model hash.
        hash: String,
        /// Stale artifacts deleted before writing.
        removed: Vec<PathBuf>,
        /// Artifacts written, one per handler type.
        written: Vec<PathBuf>,
    },
}

/// Scans the controllers tree and builds the route model.
pub fn build_route_model(
    config: &GeneratorConfig,
    extractor: &dyn DirectiveExtractor,
) -> AppResult<RouteModel> {
    let resolver = ImportResolver::for_project(&config.project_root, config.module_name.clone());
    let files = scanner::scan(&config.controllers_dir, config.scan_depth, &resolver)?;

    let mut builder = ModelBuilder::new();
    for file in &files {
        match extractor.extract(file)? {
            Some(directives) => builder.add_file(directives)?,
            None => {
                tracing::debug!(file = ?file.path, strategy = extractor.name(), "no handler found")
            }
        }
    }

    let model = builder.build();
    tracing::info!(
        files = files.len(),
        handlers = model.len(),
        routes = model.binding_count(),
        strategy = extractor.name(),
        "route model built"
    );
    Ok(model)
}

/// Runs one full generation pass.
pub fn generate_routes<S: HashStore + ?Sized>(
    config: &GeneratorConfig,
    extractor: &dyn DirectiveExtractor,
    strategy: &impl RegistrationStrategy,
    store: &S,
) -> AppResult<GenerationOutcome> {
    let model = build_route_model(config, extractor)?;

    let strategy_id = strategy.fingerprint();
    let settings = OutputSettings {
        route_prefix: &config.route_prefix,
        artifact_prefix: &config.artifact_prefix,
        strategy: &strategy_id,
    };

    let detector = ChangeDetector::new(store);
    let hash = match detector.check(&model, settings, config.force)? {
        ChangeStatus::Unchanged { hash } => {
            tracing::info!("routers had no change");
            return Ok(GenerationOutcome::Unchanged { hash });
        }
        ChangeStatus::Changed { hash, previous } => {
            tracing::debug!(?previous, current = %hash, "route model changed");
            hash
        }
    };

    let artifacts =
        render_artifacts(&model, &config.route_prefix, &config.artifact_prefix, strategy)?;

    ensure_output_dir(&config.output_dir)?;
    let removed = cleanup(
        &config.output_dir,
        &config.artifact_prefix,
        strategy.artifact_extension(),
    )?;
    let written = write_artifacts(&config.output_dir, &artifacts)?;
    detector.commit(&hash)?;

    tracing::info!(
        removed = removed.len(),
        written = written.len(),
        output = ?config.output_dir,
        "generated routers"
    );
    Ok(GenerationOutcome::Generated {
        hash,
        removed,
        written,
    })
}

/// Deletes every generated artifact, leaving other files alone.
///
/// The caller is expected to clear the change marker as well, otherwise the
/// next run would consider the (now missing) artifacts up to date.
pub fn clean_artifacts(
    config: &GeneratorConfig,
    strategy: &impl RegistrationStrategy,
) -> AppResult<Vec<PathBuf>> {
    cleanup(
        &config.output_dir,
        &config.artifact_prefix,
        strategy.artifact_extension(),
    )
}
