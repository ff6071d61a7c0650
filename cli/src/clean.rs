//! # Clean Command
//!
//! Removes generated routers and the change marker.

use crate::project::ProjectArgs;
use routegen_core::{clean_artifacts, AppResult, BeegoStrategy, FileHashStore};

/// Arguments for the clean command.
#[derive(clap::Args, Debug, Clone)]
pub struct CleanArgs {
    #[clap(flatten)]
    pub project: ProjectArgs,
}

/// Executes the cleanup.
pub fn execute(args: &CleanArgs) -> AppResult<()> {
    let config = args.project.to_config()?;
    let removed = clean_artifacts(&config, &BeegoStrategy::default())?;
    FileHashStore::new(&config.marker_path).clear()?;

    println!("removed {} generated router file(s)", removed.len());
    for path in &removed {
        println!("  -> {}", path.display());
    }
    Ok(())
}
