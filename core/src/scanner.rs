//! # Source Scanner
//!
//! Walks the controllers tree and loads every candidate handler file.
//! Entries are visited in file-name order so that the resulting model, and
//! therefore its hash, does not depend on directory listing order.

use crate::config::ScanDepth;
use crate::directive::{ACTION_KEYWORD, ROUTER_KEYWORD};
use crate::error::{AppError, AppResult};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Extension of handler source files.
pub const SOURCE_EXTENSION: &str = "go";

/// A handler source file ready for extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Location on disk.
    pub path: PathBuf,
    /// Import path of the containing directory.
    pub import_path: String,
    /// Full file contents.
    pub contents: String,
}

/// Computes import paths from on-disk directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResolver {
    strip_prefix: PathBuf,
    module_name: Option<String>,
}

impl ImportResolver {
    /// Strips `strip_prefix` verbatim; optionally renames the first segment.
    pub fn new(strip_prefix: impl Into<PathBuf>, module_name: Option<String>) -> Self {
        Self {
            strip_prefix: strip_prefix.into(),
            module_name,
        }
    }

    /// Resolver for a project: paths start with the project directory name.
    ///
    /// A relative root such as `.` is canonicalized first so that it has a
    /// real directory name and parent.
    pub fn for_project(project_root: &Path, module_name: Option<String>) -> Self {
        let root = fs::canonicalize(project_root).unwrap_or_else(|_| project_root.to_path_buf());
        let parent = root.parent().unwrap_or(&root).to_path_buf();
        Self::new(parent, module_name)
    }

    /// Resolves the import path of `dir`.
    ///
    /// # Examples
    /// ```
    /// use routegen_core::scanner::ImportResolver;
    /// use std::path::Path;
    ///
    /// let module = Some("baseadmin".to_string());
    /// let resolver = ImportResolver::for_project(Path::new("/work/myapp"), module);
    /// let path = resolver.resolve(Path::new("/work/myapp/src/controllers/admin")).unwrap();
    /// assert_eq!(path, "baseadmin/src/controllers/admin");
    /// ```
    pub fn resolve(&self, dir: &Path) -> AppResult<String> {
        let canonical;
        let relative = match dir.strip_prefix(&self.strip_prefix) {
            Ok(relative) => relative,
            Err(_) => {
                canonical = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
                canonical.strip_prefix(&self.strip_prefix).unwrap_or(canonical.as_path())
            }
        };
        let normalized = relative.to_string_lossy().replace('\\', "/");
        let trimmed = normalized.trim_matches('/');

        let resolved = match (&self.module_name, trimmed.split_once('/')) {
            (Some(module), Some((_, rest))) => format!("{}/{}", module, rest),
            (Some(module), None) if !trimmed.is_empty() => module.clone(),
            _ => trimmed.to_string(),
        };

        if resolved.is_empty() {
            return Err(AppError::UnresolvedImportPath(dir.to_path_buf()));
        }
        Ok(resolved)
    }
}

/// Loads every handler file under `root` that mentions a directive keyword.
///
/// A missing `root` is fatal; so is any unreadable file.
pub fn scan(
    root: &Path,
    depth: ScanDepth,
    resolver: &ImportResolver,
) -> AppResult<Vec<SourceFile>> {
    if !root.is_dir() {
        return Err(AppError::MissingDirectory(root.to_path_buf()));
    }

    let max_depth = match depth {
        ScanDepth::Recursive => usize::MAX,
        ScanDepth::OneLevel => 2,
    };

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| AppError::FileRead {
            path: e.path().unwrap_or(root).to_path_buf(),
            source: e.into(),
        })?;

        if !is_candidate(&entry) {
            continue;
        }

        let path = entry.path();
        let contents = fs::read_to_string(path).map_err(|e| AppError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        if !contents.contains(ACTION_KEYWORD) && !contents.contains(ROUTER_KEYWORD) {
            tracing::debug!(file = ?path, "no directives, skipping");
            continue;
        }

        let dir = path.parent().unwrap_or(root);
        files.push(SourceFile {
            path: path.to_path_buf(),
            import_path: resolver.resolve(dir)?,
            contents,
        });
    }

    tracing::debug!(root = ?root, count = files.len(), "scanned handler sources");
    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn is_candidate(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    entry.file_type().is_file()
        && name.ends_with(&format!(".{}", SOURCE_EXTENSION))
        && !name.ends_with(&format!("_test.{}", SOURCE_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const HANDLER: &str = "package user\n\n// @action /users\ntype UserController struct {}\n";

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let dir = tempdir().unwrap();
        let resolver = ImportResolver::for_project(dir.path(), None);
        let res = scan(&dir.path().join("nope"), ScanDepth::Recursive, &resolver);
        assert!(matches!(res, Err(AppError::MissingDirectory(_))));
    }

    #[test]
    fn test_scan_filters_and_orders() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("app/src/controllers");
        write(&root.join("b.go"), HANDLER);
        write(&root.join("a.go"), HANDLER);
        write(&root.join("plain.go"), "package user\n");
        write(&root.join("a_test.go"), HANDLER);
        write(&root.join(".hidden.go"), HANDLER);
        write(&root.join("notes.txt"), HANDLER);
        write(&root.join(".git/x.go"), HANDLER);

        let resolver = ImportResolver::for_project(&dir.path().join("app"), None);
        let files = scan(&root, ScanDepth::Recursive, &resolver).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.go", "b.go"]);
        assert_eq!(files[0].import_path, "app/src/controllers");
    }

    #[test]
    fn test_one_level_depth() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("app/src/controllers");
        write(&root.join("top.go"), HANDLER);
        write(&root.join("admin/mid.go"), HANDLER);
        write(&root.join("admin/deep/low.go"), HANDLER);

        let resolver = ImportResolver::for_project(&dir.path().join("app"), None);
        let shallow = scan(&root, ScanDepth::OneLevel, &resolver).unwrap();
        assert_eq!(shallow.len(), 2);
        let deep = scan(&root, ScanDepth::Recursive, &resolver).unwrap();
        assert_eq!(deep.len(), 3);
        assert!(deep
            .iter()
            .any(|f| f.import_path == "app/src/controllers/admin/deep"));
    }

    #[test]
    fn test_relative_project_root() {
        let cwd = std::env::current_dir().unwrap();
        let project = cwd.file_name().unwrap().to_string_lossy().to_string();
        let resolver = ImportResolver::for_project(Path::new("."), None);
        assert_eq!(
            resolver.resolve(Path::new("./src")).unwrap(),
            format!("{}/src", project)
        );
    }

    #[test]
    fn test_unreadable_file_is_fatal() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("app/src/controllers");
        write(&root.join("a.go"), HANDLER);
        fs::write(root.join("b.go"), [0x2f, 0x2f, 0xff, 0xfe, 0x0a]).unwrap();

        let resolver = ImportResolver::for_project(&dir.path().join("app"), None);
        match scan(&root, ScanDepth::Recursive, &resolver) {
            Err(AppError::FileRead { path, .. }) => assert_eq!(path, root.join("b.go")),
            other => panic!("expected FileRead, got {:?}", other),
        }
    }

    #[test]
    fn test_resolver_normalizes_and_renames() {
        let resolver = ImportResolver::new("/work", Some("baseadmin".into()));
        assert_eq!(
            resolver.resolve(Path::new("/work/renamed/src/controllers")).unwrap(),
            "baseadmin/src/controllers"
        );
        assert_eq!(resolver.resolve(Path::new("/work/renamed")).unwrap(), "baseadmin");

        let plain = ImportResolver::new("/work", None);
        assert_eq!(plain.resolve(Path::new("/work/app/")).unwrap(), "app");
        assert!(matches!(
            plain.resolve(Path::new("/work")),
            Err(AppError::UnresolvedImportPath(_))
        ));
    }
}
