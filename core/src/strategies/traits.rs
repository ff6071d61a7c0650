//! # Registration Strategy Trait
//!
//! Defines the interface required to emit route registration files for a
//! specific web framework.

use crate::model::{HandlerAction, RouteBinding};

/// A strategy trait for decoupling framework-specific code generation.
///
/// Implementors define the file extension, header, imports and the
/// registration call; [`RegistrationStrategy::render`] assembles them.
pub trait RegistrationStrategy {
    /// Identity of every strategy setting that changes the rendered text.
    ///
    /// Part of the change fingerprint, so switching settings regenerates.
    fn fingerprint(&self) -> String;

    /// Extension of generated files, without the dot.
    fn artifact_extension(&self) -> &'static str;

    /// Everything before the import block (banner, package clause).
    fn file_header(&self) -> String;

    /// Import block for a handler's artifact.
    fn imports(&self, action: &HandlerAction) -> String;

    /// One registration statement.
    ///
    /// # Arguments
    ///
    /// * `route` - The effective route (prefix + base path + sub-path).
    /// * `action` - The owning handler type.
    /// * `binding` - The method binding.
    fn registration_statement(
        &self,
        route: &str,
        action: &HandlerAction,
        binding: &RouteBinding,
    ) -> String;

    /// Wraps the registration statements into the initializer block.
    fn initializer(&self, statements: &str) -> String;

    /// Renders a complete artifact for `action`.
    fn render(&self, action: &HandlerAction, route_prefix: &str) -> String {
        let mut statements = String::new();
        for binding in &action.methods {
            let route = action.effective_route(route_prefix, binding);
            statements.push_str(&self.registration_statement(&route, action, binding));
        }

        let mut out = self.file_header();
        out.push_str(&self.imports(action));
        out.push('\n');
        out.push_str(&self.initializer(&statements));
        out
    }
}
