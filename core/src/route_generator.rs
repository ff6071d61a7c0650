//! # Route Generator
//!
//! Renders one registration file per handler type and manages the output
//! directory: stale artifacts are removed before the new set is written.
//!
//! All artifacts are rendered in memory before the directory is touched, so a
//! naming collision aborts the run with the previous artifacts intact. The
//! delete-then-write sequence itself is not atomic; a write failure midway
//! leaves a partial set until the next successful run.

use crate::error::{AppError, AppResult};
use crate::model::{HandlerAction, RouteModel};
use crate::strategies::RegistrationStrategy;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// A rendered registration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name inside the output directory.
    pub file_name: String,
    /// Full file contents.
    pub contents: String,
}

/// `<prefix><package>_<Type>.<ext>`
///
/// # Examples
/// ```
/// use routegen_core::model::HandlerAction;
/// use routegen_core::route_generator::artifact_file_name;
///
/// let action = HandlerAction {
///     import_path: "app/src/controllers/user".into(),
///     package_name: "user".into(),
///     handler_type_name: "UserController".into(),
///     base_path: String::new(),
///     methods: vec![],
/// };
/// assert_eq!(
///     artifact_file_name("commentsRouter_", &action, "go"),
///     "commentsRouter_user_UserController.go"
/// );
/// ```
pub fn artifact_file_name(
    artifact_prefix: &str,
    action: &HandlerAction,
    extension: &str,
) -> String {
    format!(
        "{}{}_{}.{}",
        artifact_prefix, action.package_name, action.handler_type_name, extension
    )
}

/// True when `file_name` follows the generated artifact naming convention.
pub fn is_generated_artifact(file_name: &str, artifact_prefix: &str, extension: &str) -> bool {
    file_name.len() > artifact_prefix.len() + extension.len() + 1
        && file_name.starts_with(artifact_prefix)
        && file_name
            .strip_suffix(extension)
            .is_some_and(|stem| stem.ends_with('.'))
}

/// Renders every handler of `model`.
///
/// Fails with `DuplicateArtifact` when two handlers map to one file name.
pub fn render_artifacts(
    model: &RouteModel,
    route_prefix: &str,
    artifact_prefix: &str,
    strategy: &impl RegistrationStrategy,
) -> AppResult<Vec<Artifact>> {
    let mut seen = HashSet::new();
    let mut artifacts = Vec::with_capacity(model.len());

    for action in &model.actions {
        let file_name = artifact_file_name(artifact_prefix, action, strategy.artifact_extension());
        if !seen.insert(file_name.clone()) {
            return Err(AppError::DuplicateArtifact { file_name });
        }
        artifacts.push(Artifact {
            contents: strategy.render(action, route_prefix),
            file_name,
        });
    }

    Ok(artifacts)
}

/// Creates the output directory if needed.
pub fn ensure_output_dir(output_dir: &Path) -> AppResult<()> {
    fs::create_dir_all(output_dir).map_err(|e| AppError::Write {
        path: output_dir.to_path_buf(),
        source: e,
    })
}

/// Deletes generated artifacts from `output_dir`, returning what was removed.
///
/// Only regular files matching the naming convention are touched.
pub fn cleanup(
    output_dir: &Path,
    artifact_prefix: &str,
    extension: &str,
) -> AppResult<Vec<PathBuf>> {
    if !output_dir.is_dir() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(output_dir).map_err(|e| AppError::FileRead {
        path: output_dir.to_path_buf(),
        source: e,
    })?;

    let mut removed = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| AppError::FileRead {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        let name = entry.file_name();
        if !is_file || !is_generated_artifact(&name.to_string_lossy(), artifact_prefix, extension) {
            continue;
        }

        fs::remove_file(&path).map_err(|e| AppError::Write {
            path: path.clone(),
            source: e,
        })?;
        tracing::debug!(file = ?path, "removed stale artifact");
        removed.push(path);
    }

    removed.sort();
    Ok(removed)
}

/// Writes `artifacts` into `output_dir`, returning the written paths.
pub fn write_artifacts(output_dir: &Path, artifacts: &[Artifact]) -> AppResult<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = output_dir.join(&artifact.file_name);
        fs::write(&path, &artifact.contents).map_err(|e| AppError::Write {
            path: path.clone(),
            source: e,
        })?;
        tracing::debug!(file = ?path, "wrote artifact");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RouteBinding;
    use crate::strategies::BeegoStrategy;
    use tempfile::tempdir;

    fn action(import_path: &str, package: &str, type_name: &str) -> HandlerAction {
        HandlerAction {
            import_path: import_path.into(),
            package_name: package.into(),
            handler_type_name: type_name.into(),
            base_path: "/x".into(),
            methods: vec![RouteBinding {
                http_method: "get".into(),
                sub_path: "/".into(),
                handler_func_name: "Get".into(),
            }],
        }
    }

    #[test]
    fn test_naming_convention_match() {
        let prefix = "commentsRouter_";
        assert!(is_generated_artifact("commentsRouter_user_A.go", prefix, "go"));
        assert!(!is_generated_artifact("commentsRouter_user_A.go.bak", prefix, "go"));
        assert!(!is_generated_artifact("my_commentsRouter_user_A.go", prefix, "go"));
        assert!(!is_generated_artifact("commentsRouter_.go", prefix, "go"));
        assert!(!is_generated_artifact("router.go", prefix, "go"));
        assert!(!is_generated_artifact("commentsRouter_user_Ago", prefix, "go"));
    }

    #[test]
    fn test_render_detects_collisions() {
        let model = RouteModel {
            actions: vec![
                action("app/src/controllers/admin", "admin", "UserController"),
                action("app/src/controllers/v2/admin", "admin", "UserController"),
            ],
        };
        let res = render_artifacts(&model, "/v1", "commentsRouter_", &BeegoStrategy::default());
        assert!(matches!(res, Err(AppError::DuplicateArtifact { .. })));
    }

    #[test]
    fn test_cleanup_scope() {
        let dir = tempdir().unwrap();
        let out = dir.path();
        fs::write(out.join("commentsRouter_user_A.go"), "stale").unwrap();
        fs::write(out.join("router.go"), "hand written").unwrap();
        fs::write(out.join("notes_commentsRouter_x.go"), "keep").unwrap();
        fs::create_dir(out.join("commentsRouter_dir.go")).unwrap();

        let removed = cleanup(out, "commentsRouter_", "go").unwrap();
        assert_eq!(removed, vec![out.join("commentsRouter_user_A.go")]);
        assert!(out.join("router.go").exists());
        assert!(out.join("notes_commentsRouter_x.go").exists());
        assert!(out.join("commentsRouter_dir.go").is_dir());
    }

    #[test]
    fn test_cleanup_missing_dir_is_noop() {
        let dir = tempdir().unwrap();
        assert!(cleanup(&dir.path().join("none"), "commentsRouter_", "go")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_write_artifacts() {
        let dir = tempdir().unwrap();
        let model = RouteModel {
            actions: vec![action("app/src/controllers/user", "user", "UserController")],
        };
        let artifacts =
            render_artifacts(&model, "/v1", "commentsRouter_", &BeegoStrategy::default()).unwrap();
        let written = write_artifacts(dir.path(), &artifacts).unwrap();
        assert_eq!(written, vec![dir.path().join("commentsRouter_user_UserController.go")]);
        let text = fs::read_to_string(&written[0]).unwrap();
        assert!(text.contains("beego.Router(\"/v1/x/\", &user.UserController{}, \"get:Get\")"));
    }
}
