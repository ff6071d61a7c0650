//! # Generate Command
//!
//! Scans handler sources and rewrites the router registration files when the
//! route model changed since the last run.

use crate::project::ProjectArgs;
use routegen_core::{generate_routes, AppResult, BeegoStrategy, FileHashStore, GenerationOutcome};

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    #[clap(flatten)]
    pub project: ProjectArgs,

    /// Regenerate even if the route model is unchanged.
    #[clap(long, env = "ROUTEGEN_FORCE")]
    pub force: bool,

    /// Package clause of generated files.
    #[clap(long, default_value = "routers")]
    pub router_package: String,

    /// Import path of the framework registration package.
    #[clap(long, default_value = "github.com/astaxie/beego")]
    pub framework_import: String,
}

/// Executes one generation pass.
pub fn execute(args: &GenerateArgs) -> AppResult<()> {
    let mut config = args.project.to_config()?;
    config.force = args.force;

    let extractor = args.project.extractor().build();
    let strategy = BeegoStrategy {
        package: args.router_package.clone(),
        framework_import: args.framework_import.clone(),
    };
    let store = FileHashStore::new(&config.marker_path);

    match generate_routes(&config, extractor.as_ref(), &strategy, &store)? {
        GenerationOutcome::Unchanged { .. } => println!("routers had no change"),
        GenerationOutcome::Generated {
            removed, written, ..
        } => {
            println!(
                "generate routers: {} written, {} removed in {:?}",
                written.len(),
                removed.len(),
                config.output_dir
            );
            for path in &written {
                println!("  -> {}", path.display());
            }
        }
    }
    Ok(())
}
