//! # Beego Strategy
//!
//! Emits `init()` functions calling `beego.Router(route, &pkg.Type{}, "verb:Func")`.

use crate::model::{HandlerAction, RouteBinding};
use crate::strategies::RegistrationStrategy;

/// Banner marking a file as generated.
pub const GENERATED_BANNER: &str = "// Code generated by routegen. DO NOT EDIT.";

/// Strategy for the beego framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeegoStrategy {
    /// Package clause of generated files.
    pub package: String,
    /// Import path of the registration entry point.
    pub framework_import: String,
}

impl Default for BeegoStrategy {
    fn default() -> Self {
        Self {
            package: "routers".into(),
            framework_import: "github.com/astaxie/beego".into(),
        }
    }
}

impl RegistrationStrategy for BeegoStrategy {
    fn fingerprint(&self) -> String {
        format!("beego|{}|{}", self.package, self.framework_import)
    }

    fn artifact_extension(&self) -> &'static str {
        "go"
    }

    fn file_header(&self) -> String {
        format!("{}\n\npackage {}\n\n", GENERATED_BANNER, self.package)
    }

    fn imports(&self, action: &HandlerAction) -> String {
        let last_segment = action.import_path.rsplit('/').next().unwrap_or_default();
        let handler_import = if last_segment == action.package_name {
            go_quote(&action.import_path)
        } else {
            format!("{} {}", action.package_name, go_quote(&action.import_path))
        };
        format!(
            "import (\n\t{}\n\t{}\n)\n",
            go_quote(&self.framework_import),
            handler_import
        )
    }

    fn registration_statement(
        &self,
        route: &str,
        action: &HandlerAction,
        binding: &RouteBinding,
    ) -> String {
        format!(
            "\tbeego.Router({}, &{}{{}}, {})\n",
            go_quote(route),
            action.qualified_type(),
            go_quote(&binding.binding_spec())
        )
    }

    fn initializer(&self, statements: &str) -> String {
        format!("func init() {{\n{}}}\n", statements)
    }
}

/// Go interpreted string literal for `s`.
fn go_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(import_path: &str) -> HandlerAction {
        HandlerAction {
            import_path: import_path.into(),
            package_name: "user".into(),
            handler_type_name: "UserController".into(),
            base_path: "/users".into(),
            methods: vec![RouteBinding {
                http_method: "get".into(),
                sub_path: "/:id".into(),
                handler_func_name: "GetOne".into(),
            }],
        }
    }

    #[test]
    fn test_render_full_file() {
        let code =
            BeegoStrategy::default().render(&action("baseadmin/src/controllers/user"), "/v1");
        let expected = r#"// Code generated by routegen. DO NOT EDIT.

package routers

import (
	"github.com/astaxie/beego"
	"baseadmin/src/controllers/user"
)

func init() {
	beego.Router("/v1/users/:id", &user.UserController{}, "get:GetOne")
}
"#;
        assert_eq!(code, expected);
    }

    #[test]
    fn test_alias_when_directory_differs_from_package() {
        let imports = BeegoStrategy::default().imports(&action("baseadmin/src/controllers/v2"));
        assert!(imports.contains("\tuser \"baseadmin/src/controllers/v2\"\n"));
    }

    #[test]
    fn test_fingerprint_tracks_settings() {
        let default = BeegoStrategy::default();
        let moved = BeegoStrategy {
            package: "api".into(),
            framework_import: "github.com/beego/beego/v2/server/web".into(),
        };
        assert_eq!(default.fingerprint(), "beego|routers|github.com/astaxie/beego");
        assert_ne!(default.fingerprint(), moved.fingerprint());
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(go_quote(r#"a"b\c"#), r#""a\"b\\c""#);
    }
}
