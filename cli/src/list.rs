//! # List Command
//!
//! Prints the effective route table without touching generated files.

use crate::project::ProjectArgs;
use routegen_core::{build_route_model, AppError, AppResult, RouteModel};

/// Arguments for the list command.
#[derive(clap::Args, Debug, Clone)]
pub struct ListArgs {
    #[clap(flatten)]
    pub project: ProjectArgs,

    /// Print the route model as JSON instead of a table.
    #[clap(long)]
    pub json: bool,
}

/// Executes the listing.
pub fn execute(args: &ListArgs) -> AppResult<()> {
    let config = args.project.to_config()?;
    let extractor = args.project.extractor().build();
    let model = build_route_model(&config, extractor.as_ref())?;

    if args.json {
        let text = serde_json::to_string_pretty(&model)
            .map_err(|e| AppError::General(format!("Failed to encode route model: {}", e)))?;
        println!("{}", text);
    } else {
        for line in route_table(&model, &config.route_prefix) {
            println!("{}", line);
        }
    }
    Ok(())
}

/// One line per binding: `METHOD route -> package.Type.Func`.
fn route_table(model: &RouteModel, route_prefix: &str) -> Vec<String> {
    let mut lines = Vec::with_capacity(model.binding_count());
    for action in &model.actions {
        for binding in &action.methods {
            lines.push(format!(
                "{:<8} {} -> {}.{}",
                binding.http_method.to_uppercase(),
                action.effective_route(route_prefix, binding),
                action.qualified_type(),
                binding.handler_func_name
            ));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use routegen_core::{HandlerAction, RouteBinding};

    #[test]
    fn test_route_table_format() {
        let model = RouteModel {
            actions: vec![HandlerAction {
                import_path: "app/src/controllers/user".into(),
                package_name: "user".into(),
                handler_type_name: "UserController".into(),
                base_path: "/users".into(),
                methods: vec![RouteBinding {
                    http_method: "get".into(),
                    sub_path: "/:id".into(),
                    handler_func_name: "GetOne".into(),
                }],
            }],
        };
        assert_eq!(
            route_table(&model, "/v1"),
            vec!["GET      /v1/users/:id -> user.UserController.GetOne"]
        );
    }
}
