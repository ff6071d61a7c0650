//! # Structural Extraction
//!
//! Parses a Go file with tree-sitter and reads directives from doc comments:
//! the contiguous comment group ending on the line directly above a type or
//! method declaration.
//!
//! Extraction is two-pass by construction. Action declarations and route
//! declarations are collected independently and joined by receiver type name
//! in [`crate::model::ModelBuilder`], so a method may precede its type.

use crate::directive::{self, Directive};
use crate::error::{AppError, AppResult};
use crate::extract::{ActionDecl, DirectiveExtractor, FileDirectives, RouteDecl};
use crate::model::RouteBinding;
use crate::scanner::SourceFile;
use std::path::Path;
use tree_sitter::{Node, Parser};

/// Declaration-tree strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralExtractor;

impl DirectiveExtractor for StructuralExtractor {
    fn name(&self) -> &'static str {
        "structural"
    }

    fn extract(&self, file: &SourceFile) -> AppResult<Option<FileDirectives>> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|e| parse_error(&file.path, e.to_string()))?;
        let tree = parser
            .parse(&file.contents, None)
            .ok_or_else(|| parse_error(&file.path, "parser returned no tree".into()))?;

        let root = tree.root_node();
        if root.has_error() {
            tracing::warn!(
                file = ?file.path,
                "source contains syntax errors, extracting what parsed"
            );
        }

        let mut walk = FileWalk::new(file);
        walk.visit_top_level(root)?;
        walk.finish()
    }
}

fn parse_error(path: &Path, reason: String) -> AppError {
    AppError::Parse {
        path: path.to_path_buf(),
        reason,
    }
}

fn node_text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    source.get(node.byte_range()).unwrap_or_default()
}

fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Tracks the comment group that may become the next declaration's doc.
#[derive(Default)]
struct DocGroup<'t> {
    comments: Vec<Node<'t>>,
}

impl<'t> DocGroup<'t> {
    fn push(&mut self, comment: Node<'t>) {
        if let Some(last) = self.comments.last() {
            // A blank line ends the group.
            if comment.start_position().row > last.end_position().row + 1 {
                self.comments.clear();
            }
        }
        self.comments.push(comment);
    }

    /// Takes the group if it ends directly above `decl`, clearing it either way.
    fn take_for(&mut self, decl: Node<'_>) -> Vec<Node<'t>> {
        let attached = self
            .comments
            .last()
            .is_some_and(|last| last.end_position().row + 1 == decl.start_position().row);
        let group = std::mem::take(&mut self.comments);
        if attached {
            group
        } else {
            Vec::new()
        }
    }

    fn clear(&mut self) {
        self.comments.clear();
    }
}

struct FileWalk<'f> {
    file: &'f SourceFile,
    package_name: Option<String>,
    actions: Vec<ActionDecl>,
    routes: Vec<RouteDecl>,
}

impl<'f> FileWalk<'f> {
    fn new(file: &'f SourceFile) -> Self {
        Self {
            file,
            package_name: None,
            actions: Vec::new(),
            routes: Vec::new(),
        }
    }

    fn source(&self) -> &'f str {
        &self.file.contents
    }

    fn visit_top_level(&mut self, root: Node<'_>) -> AppResult<()> {
        let mut docs = DocGroup::default();
        let mut prev_end_row: Option<usize> = None;
        let mut cursor = root.walk();

        for node in root.named_children(&mut cursor) {
            if node.kind() == "comment" {
                // Trailing comments belong to the declaration on their line.
                if prev_end_row != Some(node.start_position().row) {
                    docs.push(node);
                }
                continue;
            }

            match node.kind() {
                "package_clause" => {
                    self.package_name = node
                        .named_child(0)
                        .map(|n| node_text(n, self.source()).to_string());
                    docs.clear();
                }
                "type_declaration" => {
                    let doc = docs.take_for(node);
                    self.visit_type_declaration(node, &doc)?;
                }
                "method_declaration" => {
                    let doc = docs.take_for(node);
                    self.visit_method(node, &doc)?;
                }
                _ => docs.clear(),
            }
            prev_end_row = Some(node.end_position().row);
        }
        Ok(())
    }

    fn visit_type_declaration<'t>(
        &mut self,
        decl: Node<'t>,
        outer_doc: &[Node<'t>],
    ) -> AppResult<()> {
        let mut cursor = decl.walk();
        let children: Vec<Node<'t>> = decl.named_children(&mut cursor).collect();
        let specs = children.iter().filter(|n| n.kind() == "type_spec").count();
        let decl_row = decl.start_position().row;
        let grouped = specs > 1
            || children
                .iter()
                .any(|n| n.kind() == "type_spec" && n.start_position().row != decl_row);

        let mut docs = DocGroup::default();
        for node in children {
            match node.kind() {
                "comment" => docs.push(node),
                "type_spec" => {
                    let inner = docs.take_for(node);
                    let doc = if inner.is_empty() && !grouped {
                        outer_doc.to_vec()
                    } else {
                        inner
                    };
                    self.visit_type_spec(node, &doc)?;
                }
                _ => docs.clear(),
            }
        }
        Ok(())
    }

    fn visit_type_spec(&mut self, spec: Node<'_>, doc: &[Node<'_>]) -> AppResult<()> {
        let Some(name_node) = spec.child_by_field_name("name") else {
            return Ok(());
        };
        let type_name = node_text(name_node, self.source());

        let action = self.directives(doc)?.into_iter().find_map(|d| match d {
            Directive::Action { base_path } => Some(base_path),
            Directive::Route { .. } => None,
        });
        let Some(base_path) = action else {
            return Ok(());
        };

        if !is_exported(type_name) {
            tracing::warn!(
                file = ?self.file.path,
                handler = type_name,
                "@action on unexported type ignored"
            );
            return Ok(());
        }

        self.actions.push(ActionDecl {
            type_name: type_name.to_string(),
            base_path,
        });
        Ok(())
    }

    fn visit_method(&mut self, method: Node<'_>, doc: &[Node<'_>]) -> AppResult<()> {
        let bindings: Vec<(String, String)> = self
            .directives(doc)?
            .into_iter()
            .filter_map(|d| match d {
                Directive::Route {
                    sub_path,
                    http_method,
                } => Some((http_method, sub_path)),
                Directive::Action { .. } => None,
            })
            .collect();
        if bindings.is_empty() {
            return Ok(());
        }

        let func_name = method
            .child_by_field_name("name")
            .map(|n| node_text(n, self.source()))
            .unwrap_or_default();

        let Some(receiver) = pointer_receiver(method, self.source()) else {
            tracing::warn!(
                file = ?self.file.path,
                method = func_name,
                "@router on a non-pointer receiver ignored"
            );
            return Ok(());
        };

        if !is_exported(func_name) || !is_exported(receiver) {
            tracing::warn!(
                file = ?self.file.path,
                receiver = receiver,
                method = func_name,
                "@router on an unexported method or type ignored"
            );
            return Ok(());
        }

        for (http_method, sub_path) in bindings {
            self.routes.push(RouteDecl {
                receiver: receiver.to_string(),
                binding: RouteBinding {
                    http_method,
                    sub_path,
                    handler_func_name: func_name.to_string(),
                },
            });
        }
        Ok(())
    }

    fn directives(&self, doc: &[Node<'_>]) -> AppResult<Vec<Directive>> {
        let mut out = Vec::new();
        for comment in doc {
            let text = node_text(*comment, self.source());
            let parsed =
                directive::parse_comment(text).map_err(|reason| AppError::MalformedDirective {
                    path: self.file.path.clone(),
                    reason,
                })?;
            out.extend(parsed);
        }
        Ok(out)
    }

    fn finish(self) -> AppResult<Option<FileDirectives>> {
        if self.actions.is_empty() && self.routes.is_empty() {
            return Ok(None);
        }
        let package_name = self
            .package_name
            .filter(|p| !p.is_empty())
            .ok_or_else(|| parse_error(&self.file.path, "missing package clause".into()))?;

        Ok(Some(FileDirectives {
            path: self.file.path.clone(),
            package_name,
            import_path: self.file.import_path.clone(),
            actions: self.actions,
            routes: self.routes,
        }))
    }
}

/// Type name of a `*T` (or `*T[P]`) receiver; `None` for value receivers.
fn pointer_receiver<'a>(method: Node<'_>, source: &'a str) -> Option<&'a str> {
    let receiver = method.child_by_field_name("receiver")?;
    let mut cursor = receiver.walk();
    let param = receiver
        .named_children(&mut cursor)
        .find(|n| n.kind() == "parameter_declaration")?;
    let ty = param.child_by_field_name("type")?;
    if ty.kind() != "pointer_type" {
        return None;
    }
    let inner = ty.named_child(0)?;
    match inner.kind() {
        "type_identifier" => Some(node_text(inner, source)),
        "generic_type" => inner
            .child_by_field_name("type")
            .map(|n| node_text(n, source)),
        _ => None,
    }
}
