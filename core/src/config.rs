//! # Generator Configuration
//!
//! Paths and naming knobs for one generation run. Defaults mirror a beego
//! project laid out as `src/controllers` (handlers) and `src/routers`
//! (generated registration files).

use std::path::{Path, PathBuf};

/// Default url prefix prepended to every effective route.
pub const DEFAULT_ROUTE_PREFIX: &str = "/v1";

/// Default file name prefix shared by all generated artifacts.
pub const DEFAULT_ARTIFACT_PREFIX: &str = "commentsRouter_";

/// Default change marker file name, relative to the project root.
pub const DEFAULT_MARKER_FILE: &str = "routers.tmp";

/// How far below the controllers root the scanner descends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanDepth {
    /// Walk the whole tree.
    #[default]
    Recursive,
    /// The root itself plus each immediate subdirectory.
    OneLevel,
}

/// Settings for a single generation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Project root; import paths are computed relative to its parent.
    pub project_root: PathBuf,
    /// Root of the handler source tree.
    pub controllers_dir: PathBuf,
    /// Directory receiving generated registration files.
    pub output_dir: PathBuf,
    /// Plain-text file holding the hash of the last generated model.
    pub marker_path: PathBuf,
    /// Global url prefix for every route.
    pub route_prefix: String,
    /// File name prefix identifying generated artifacts.
    pub artifact_prefix: String,
    /// Replacement for the first import path segment (the project directory name).
    pub module_name: Option<String>,
    /// Scanner traversal depth.
    pub scan_depth: ScanDepth,
    /// Regenerate even when the model hash is unchanged.
    pub force: bool,
}

impl GeneratorConfig {
    /// Builds the default layout rooted at `project_root`.
    ///
    /// # Examples
    /// ```
    /// use routegen_core::config::GeneratorConfig;
    ///
    /// let config = GeneratorConfig::new("/work/baseadmin");
    /// assert!(config.controllers_dir.ends_with("src/controllers"));
    /// assert!(config.output_dir.ends_with("src/routers"));
    /// assert_eq!(config.route_prefix, "/v1");
    /// ```
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        Self {
            controllers_dir: project_root.join("src").join("controllers"),
            output_dir: project_root.join("src").join("routers"),
            marker_path: project_root.join(DEFAULT_MARKER_FILE),
            route_prefix: DEFAULT_ROUTE_PREFIX.to_string(),
            artifact_prefix: DEFAULT_ARTIFACT_PREFIX.to_string(),
            module_name: None,
            scan_depth: ScanDepth::default(),
            force: false,
            project_root,
        }
    }

    /// Resolves `path` against the project root unless it is already absolute.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }
}
