//! # Route Model
//!
//! The canonical in-memory description of every handler type and its route
//! bindings. Rebuilt from scratch on each run; only its hash outlives it.

use crate::error::{AppError, AppResult};
use crate::extract::FileDirectives;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// One handler method carrying a route directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteBinding {
    /// Lower-cased verb list (`get`, `get,post`).
    pub http_method: String,
    /// Path appended to the handler's base path.
    pub sub_path: String,
    /// Name of the handler method.
    pub handler_func_name: String,
}

impl RouteBinding {
    /// The `method:Func` spec passed to the framework.
    pub fn binding_spec(&self) -> String {
        format!("{}:{}", self.http_method, self.handler_func_name)
    }
}

/// One discovered handler type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerAction {
    /// Import location of the handler's package.
    pub import_path: String,
    /// Declared package name.
    pub package_name: String,
    /// Name of the handler type.
    pub handler_type_name: String,
    /// Route prefix from the action directive (may be empty).
    pub base_path: String,
    /// Bindings in discovery order.
    pub methods: Vec<RouteBinding>,
}

impl HandlerAction {
    /// Effective route for `binding`: `prefix + base_path + sub_path`, no normalization.
    ///
    /// # Examples
    /// ```
    /// use routegen_core::model::{HandlerAction, RouteBinding};
    ///
    /// let binding = RouteBinding {
    ///     http_method: "get".into(),
    ///     sub_path: "/:id".into(),
    ///     handler_func_name: "GetOne".into(),
    /// };
    /// let action = HandlerAction {
    ///     import_path: "app/src/controllers/user".into(),
    ///     package_name: "user".into(),
    ///     handler_type_name: "UserController".into(),
    ///     base_path: "/users".into(),
    ///     methods: vec![binding.clone()],
    /// };
    /// assert_eq!(action.effective_route("/v1", &binding), "/v1/users/:id");
    /// ```
    pub fn effective_route(&self, prefix: &str, binding: &RouteBinding) -> String {
        format!("{}{}{}", prefix, self.base_path, binding.sub_path)
    }

    /// `package.Type`, as referenced from generated code.
    pub fn qualified_type(&self) -> String {
        format!("{}.{}", self.package_name, self.handler_type_name)
    }
}

/// The full set of retained handler types, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RouteModel {
    /// Handlers with at least one binding.
    pub actions: Vec<HandlerAction>,
}

impl RouteModel {
    /// Number of retained handlers.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// True when nothing needs registering.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Total number of route bindings across all handlers.
    pub fn binding_count(&self) -> usize {
        self.actions.iter().map(|a| a.methods.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct HandlerKey {
    import_path: String,
    package_name: String,
    type_name: String,
}

#[derive(Debug)]
struct PendingHandler {
    action: HandlerAction,
    declared_in: Option<PathBuf>,
}

/// Merges per-file extraction records into a [`RouteModel`].
///
/// Handlers are keyed by import path, package and type name, so a type whose
/// methods live in several files of one package still yields one handler.
#[derive(Debug, Default)]
pub struct ModelBuilder {
    handlers: IndexMap<HandlerKey, PendingHandler>,
}

impl ModelBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one file's directives into the model.
    ///
    /// Actions are registered first so that routes resolve against them
    /// regardless of declaration order. A route whose receiver has no action
    /// directive still creates a handler, with an empty base path.
    pub fn add_file(&mut self, file: FileDirectives) -> AppResult<()> {
        if file.import_path.is_empty() {
            return Err(AppError::UnresolvedImportPath(file.path));
        }

        for decl in &file.actions {
            let key = self.key(&file, &decl.type_name);
            let pending = self.entry(key, &file, &decl.type_name);
            match &pending.declared_in {
                Some(first) if pending.action.base_path != decl.base_path => {
                    return Err(AppError::MalformedDirective {
                        path: file.path.clone(),
                        reason: format!(
                            "conflicting @action '{}' for {}, already declared as '{}' in {:?}",
                            decl.base_path, decl.type_name, pending.action.base_path, first
                        ),
                    });
                }
                Some(_) => {}
                None => {
                    pending.action.base_path = decl.base_path.clone();
                    pending.declared_in = Some(file.path.clone());
                }
            }
        }

        for decl in &file.routes {
            let key = self.key(&file, &decl.receiver);
            self.entry(key, &file, &decl.receiver)
                .action
                .methods
                .push(decl.binding.clone());
        }

        Ok(())
    }

    /// Finishes the model, dropping handlers without bindings.
    pub fn build(self) -> RouteModel {
        let mut actions = Vec::with_capacity(self.handlers.len());
        for (_, pending) in self.handlers {
            let action = pending.action;
            if action.methods.is_empty() {
                tracing::debug!(
                    handler = %action.qualified_type(),
                    "dropping handler without routes"
                );
                continue;
            }
            let mut seen = HashSet::new();
            for binding in &action.methods {
                if !seen.insert((&binding.http_method, &binding.sub_path)) {
                    tracing::warn!(
                        handler = %action.qualified_type(),
                        method = %binding.http_method,
                        sub_path = %binding.sub_path,
                        "duplicate route binding"
                    );
                }
            }
            actions.push(action);
        }
        RouteModel { actions }
    }

    fn key(&self, file: &FileDirectives, type_name: &str) -> HandlerKey {
        HandlerKey {
            import_path: file.import_path.clone(),
            package_name: file.package_name.clone(),
            type_name: type_name.to_string(),
        }
    }

    fn entry(
        &mut self,
        key: HandlerKey,
        file: &FileDirectives,
        type_name: &str,
    ) -> &mut PendingHandler {
        self.handlers.entry(key).or_insert_with(|| PendingHandler {
            action: HandlerAction {
                import_path: file.import_path.clone(),
                package_name: file.package_name.clone(),
                handler_type_name: type_name.to_string(),
                base_path: String::new(),
                methods: Vec::new(),
            },
            declared_in: None,
        })
    }
}

/// Builds a model from extraction records in one call.
pub fn build_model(files: impl IntoIterator<Item = FileDirectives>) -> AppResult<RouteModel> {
    let mut builder = ModelBuilder::new();
    for file in files {
        builder.add_file(file)?;
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{ActionDecl, RouteDecl};

    fn binding(method: &str, sub_path: &str, func: &str) -> RouteBinding {
        RouteBinding {
            http_method: method.into(),
            sub_path: sub_path.into(),
            handler_func_name: func.into(),
        }
    }

    fn file(name: &str, actions: Vec<ActionDecl>, routes: Vec<RouteDecl>) -> FileDirectives {
        FileDirectives {
            path: PathBuf::from(name),
            package_name: "user".into(),
            import_path: "app/src/controllers/user".into(),
            actions,
            routes,
        }
    }

    fn action(type_name: &str, base_path: &str) -> ActionDecl {
        ActionDecl {
            type_name: type_name.into(),
            base_path: base_path.into(),
        }
    }

    fn route(receiver: &str, b: RouteBinding) -> RouteDecl {
        RouteDecl {
            receiver: receiver.into(),
            binding: b,
        }
    }

    #[test]
    fn test_action_without_routes_is_dropped() {
        let model = build_model(vec![file(
            "a.go",
            vec![action("UserController", "/users"), action("Idle", "/idle")],
            vec![route("UserController", binding("get", "/:id", "GetOne"))],
        )])
        .unwrap();
        assert_eq!(model.len(), 1);
        assert_eq!(model.actions[0].handler_type_name, "UserController");
        assert_eq!(model.actions[0].base_path, "/users");
    }

    #[test]
    fn test_routes_resolve_regardless_of_order_and_file() {
        let first = file(
            "a.go",
            vec![],
            vec![route("UserController", binding("get", "/", "List"))],
        );
        let second = file(
            "b.go",
            vec![action("UserController", "/users")],
            vec![route("UserController", binding("post", "/", "Create"))],
        );
        let model = build_model(vec![first, second]).unwrap();
        assert_eq!(model.len(), 1);
        let handler = &model.actions[0];
        assert_eq!(handler.base_path, "/users");
        assert_eq!(
            handler.methods,
            vec![binding("get", "/", "List"), binding("post", "/", "Create")]
        );
    }

    #[test]
    fn test_route_without_action_gets_empty_base_path() {
        let model = build_model(vec![file(
            "a.go",
            vec![],
            vec![route("Health", binding("get", "/health", "Check"))],
        )])
        .unwrap();
        assert_eq!(model.actions[0].base_path, "");
    }

    #[test]
    fn test_conflicting_actions_are_rejected() {
        let res = build_model(vec![
            file("a.go", vec![action("UserController", "/users")], vec![]),
            file("b.go", vec![action("UserController", "/people")], vec![]),
        ]);
        match res {
            Err(AppError::MalformedDirective { path, reason }) => {
                assert_eq!(path, PathBuf::from("b.go"));
                assert!(reason.contains("conflicting"));
            }
            other => panic!("expected MalformedDirective, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_bindings_are_kept() {
        let model = build_model(vec![file(
            "a.go",
            vec![action("UserController", "/users")],
            vec![
                route("UserController", binding("get", "/", "List")),
                route("UserController", binding("get", "/", "ListAgain")),
            ],
        )])
        .unwrap();
        assert_eq!(model.binding_count(), 2);
    }

    #[test]
    fn test_empty_import_path_is_fatal() {
        let mut f = file("a.go", vec![], vec![]);
        f.import_path.clear();
        assert!(matches!(
            build_model(vec![f]),
            Err(AppError::UnresolvedImportPath(_))
        ));
    }
}
