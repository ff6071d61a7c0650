//! # Project Arguments
//!
//! Options shared by every subcommand, resolved into a `GeneratorConfig`.

use routegen_core::config::{DEFAULT_ARTIFACT_PREFIX, DEFAULT_MARKER_FILE, DEFAULT_ROUTE_PREFIX};
use routegen_core::{AppError, AppResult, ExtractorKind, GeneratorConfig, ScanDepth};
use std::fs;
use std::path::PathBuf;

/// Which extractor reads the directives.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyArg {
    /// Declaration tree (doc comments on types and methods).
    #[default]
    Structural,
    /// Raw line adjacency.
    Adjacency,
}

impl From<StrategyArg> for ExtractorKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Structural => ExtractorKind::Structural,
            StrategyArg::Adjacency => ExtractorKind::Adjacency,
        }
    }
}

/// Project layout options.
#[derive(clap::Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Project root. Import paths start with its directory name.
    #[clap(long, env = "ROUTEGEN_PROJECT_ROOT", default_value = ".")]
    pub project_root: PathBuf,

    /// Handler sources, relative to the project root.
    #[clap(long, env = "ROUTEGEN_CONTROLLERS_DIR", default_value = "src/controllers")]
    pub controllers_dir: PathBuf,

    /// Generated routers directory, relative to the project root.
    #[clap(long, env = "ROUTEGEN_OUTPUT_DIR", default_value = "src/routers")]
    pub output_dir: PathBuf,

    /// Change marker file, relative to the project root.
    #[clap(long, env = "ROUTEGEN_MARKER", default_value = DEFAULT_MARKER_FILE)]
    pub marker: PathBuf,

    /// Url prefix prepended to every route.
    #[clap(long, env = "ROUTEGEN_ROUTE_PREFIX", default_value = DEFAULT_ROUTE_PREFIX)]
    pub route_prefix: String,

    /// File name prefix of generated routers.
    #[clap(long, env = "ROUTEGEN_ARTIFACT_PREFIX", default_value = DEFAULT_ARTIFACT_PREFIX)]
    pub artifact_prefix: String,

    /// Module name replacing the project directory in import paths.
    #[clap(long, env = "ROUTEGEN_MODULE")]
    pub module_name: Option<String>,

    /// Only scan the controllers root and its immediate subdirectories.
    #[clap(long, env = "ROUTEGEN_ONE_LEVEL")]
    pub one_level: bool,

    /// Directive extraction strategy.
    #[clap(long, value_enum, env = "ROUTEGEN_STRATEGY", default_value_t = StrategyArg::Structural)]
    pub strategy: StrategyArg,
}

impl ProjectArgs {
    /// Resolves the options into a configuration with absolute paths.
    pub fn to_config(&self) -> AppResult<GeneratorConfig> {
        let root = fs::canonicalize(&self.project_root)
            .map_err(|_| AppError::MissingDirectory(self.project_root.clone()))?;

        let mut config = GeneratorConfig::new(root);
        config.controllers_dir = config.resolve(&self.controllers_dir);
        config.output_dir = config.resolve(&self.output_dir);
        config.marker_path = config.resolve(&self.marker);
        config.route_prefix = self.route_prefix.clone();
        config.artifact_prefix = self.artifact_prefix.clone();
        config.module_name = self.module_name.clone().filter(|m| !m.is_empty());
        config.scan_depth = if self.one_level {
            ScanDepth::OneLevel
        } else {
            ScanDepth::Recursive
        };
        Ok(config)
    }

    /// The selected extractor.
    pub fn extractor(&self) -> ExtractorKind {
        self.strategy.into()
    }
}
