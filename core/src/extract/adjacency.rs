//! # Line-Adjacency Extraction
//!
//! Reads a file as flat lines. An `@action` line must be followed by a
//! `type Name struct {` line, and an `@router` line by a single-line
//! `func (r *Type) Name() {` line. Declaration lines are tokenized on
//! whitespace with an exact token count, so any other formatting is rejected.
//!
//! One handler per file: every route in the file binds to the file's action.

use crate::directive::{self, Directive};
use crate::error::{AppError, AppResult};
use crate::extract::{ActionDecl, DirectiveExtractor, FileDirectives, RouteDecl};
use crate::model::RouteBinding;
use crate::scanner::SourceFile;

const PACKAGE_KEYWORD: &str = "package";
const TYPE_KEYWORD: &str = "type";
const FUNC_KEYWORD: &str = "func";

/// `type Name struct {`
const TYPE_LINE_TOKENS: usize = 4;
/// `func (r *Type) Name() {`
const FUNC_LINE_TOKENS: usize = 5;

/// Line-adjacency strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdjacencyExtractor;

impl DirectiveExtractor for AdjacencyExtractor {
    fn name(&self) -> &'static str {
        "adjacency"
    }

    fn extract(&self, file: &SourceFile) -> AppResult<Option<FileDirectives>> {
        let lines: Vec<&str> = file.contents.lines().collect();
        let mismatch = |line: usize, reason: String| AppError::AdjacencyMismatch {
            path: file.path.clone(),
            line: line + 1,
            reason,
        };

        let mut package_name: Option<String> = None;
        let mut action: Option<ActionDecl> = None;
        let mut bindings = Vec::new();

        for (idx, raw) in lines.iter().enumerate() {
            let line = raw.trim();

            if package_name.is_none() && first_token(line) == Some(PACKAGE_KEYWORD) {
                package_name = line.split_whitespace().nth(1).map(str::to_string);
                continue;
            }

            if !line.starts_with("//") {
                continue;
            }

            let parsed = directive::parse_line(line).map_err(|reason| AppError::MalformedDirective {
                path: file.path.clone(),
                reason,
            })?;

            match parsed {
                None => {}
                Some(Directive::Action { base_path }) => {
                    if action.is_some() {
                        return Err(mismatch(idx, "more than one @action in file".into()));
                    }
                    let (decl_idx, decl) = next_declaration(&lines, idx);
                    let tokens = expect_tokens(decl, TYPE_KEYWORD, TYPE_LINE_TOKENS)
                        .map_err(|reason| mismatch(decl_idx, reason))?;
                    action = Some(ActionDecl {
                        type_name: tokens[1].to_string(),
                        base_path,
                    });
                }
                Some(Directive::Route {
                    sub_path,
                    http_method,
                }) => {
                    let decl = lines.get(idx + 1).map(|l| l.trim()).unwrap_or_default();
                    let tokens = expect_tokens(decl, FUNC_KEYWORD, FUNC_LINE_TOKENS)
                        .map_err(|reason| mismatch(idx + 1, reason))?;
                    bindings.push(RouteBinding {
                        http_method,
                        sub_path,
                        handler_func_name: tokens[3].replace(['(', ')'], ""),
                    });
                }
            }
        }

        let Some(action) = action else {
            if !bindings.is_empty() {
                tracing::debug!(file = ?file.path, "@router without @action, file skipped");
            }
            return Ok(None);
        };

        let package_name = package_name.ok_or_else(|| AppError::Parse {
            path: file.path.clone(),
            reason: "missing package clause".into(),
        })?;

        let routes = bindings
            .into_iter()
            .map(|binding| RouteDecl {
                receiver: action.type_name.clone(),
                binding,
            })
            .collect();

        Ok(Some(FileDirectives {
            path: file.path.clone(),
            package_name,
            import_path: file.import_path.clone(),
            actions: vec![action],
            routes,
        }))
    }
}

fn first_token(line: &str) -> Option<&str> {
    line.split_whitespace().next()
}

/// The first line after `idx` that is not itself a directive comment.
fn next_declaration<'a>(lines: &[&'a str], idx: usize) -> (usize, &'a str) {
    let mut next = idx + 1;
    while let Some(line) = lines.get(next) {
        let line = line.trim();
        let is_directive = line.starts_with("//")
            && directive::leading_keyword(directive::comment_body(line)).is_some();
        if !is_directive {
            return (next, line);
        }
        next += 1;
    }
    (next, "")
}

fn expect_tokens<'a>(line: &'a str, keyword: &str, count: usize) -> Result<Vec<&'a str>, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.first() != Some(&keyword) {
        return Err(format!("expected a '{}' declaration, found '{}'", keyword, line));
    }
    if tokens.len() != count {
        return Err(format!(
            "expected {} tokens in '{}', found {}",
            count,
            line,
            tokens.len()
        ));
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn extract(contents: &str) -> AppResult<Option<FileDirectives>> {
        AdjacencyExtractor.extract(&SourceFile {
            path: PathBuf::from("user.go"),
            import_path: "app/src/controllers/user".into(),
            contents: contents.into(),
        })
    }

    #[test]
    fn test_adjacent_directives() {
        let code = "package user\n\n// @action /users\ntype UserController struct {\n}\n\n\
                    // @router /:id [get]\nfunc (c *UserController) GetOne() {\n}\n";
        let out = extract(code).unwrap().unwrap();
        assert_eq!(out.package_name, "user");
        assert_eq!(out.actions[0].type_name, "UserController");
        assert_eq!(out.actions[0].base_path, "/users");
        assert_eq!(out.routes.len(), 1);
        assert_eq!(out.routes[0].receiver, "UserController");
        assert_eq!(out.routes[0].binding.handler_func_name, "GetOne");
        assert_eq!(out.routes[0].binding.http_method, "get");
    }

    #[test]
    fn test_file_without_action_yields_none() {
        let code = "package user\n\n// @router /x\nfunc (c *UserController) X() {\n}\n";
        assert_eq!(extract(code).unwrap(), None);
    }

    #[test]
    fn test_blank_line_after_route_is_rejected() {
        let code = "package user\n\n// @action /u\ntype U struct {\n}\n\n\
                    // @router /x\n\nfunc (c *U) X() {\n}\n";
        match extract(code) {
            Err(AppError::AdjacencyMismatch { line, .. }) => assert_eq!(line, 8),
            other => panic!("expected AdjacencyMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_token_count_mismatch() {
        let code = "package user\n\n// @action /u\ntype U struct{}\n";
        assert!(matches!(
            extract(code),
            Err(AppError::AdjacencyMismatch { line: 4, .. })
        ));

        let code = "package user\n\n// @action /u\ntype U struct {\n}\n\
                    // @router /x\nfunc (c *U) X(id int) {\n}\n";
        assert!(matches!(
            extract(code),
            Err(AppError::AdjacencyMismatch { line: 7, .. })
        ));
    }

    #[test]
    fn test_second_action_is_rejected() {
        let code =
            "package user\n// @action /a\ntype A struct {\n}\n// @action /b\ntype B struct {\n}\n";
        assert!(matches!(
            extract(code),
            Err(AppError::AdjacencyMismatch { .. })
        ));
    }

    #[test]
    fn test_malformed_directive() {
        let code =
            "package user\n// @action /a\ntype A struct {\n}\n// @router\nfunc (c *A) X() {\n}\n";
        assert!(matches!(
            extract(code),
            Err(AppError::MalformedDirective { .. })
        ));
    }
}
