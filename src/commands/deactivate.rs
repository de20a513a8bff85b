//! Command: deactivate a package or a whole repository.
use anyhow::Result;

use crate::activation;
use crate::cli::GlobalOpts;
use crate::deploy::StowDeploy;
use crate::logging::Logger;
use crate::repository;

/// Run the deactivate command.
///
/// # Errors
///
/// Returns an error if the repository is unknown or deactivation fails.
pub fn run(
    global: &GlobalOpts,
    repo_name: &str,
    package: Option<&str>,
    log: &Logger,
) -> Result<()> {
    let (settings, vconf) = super::setup(global)?;
    let repo = repository::find_repository(&settings, repo_name)?;

    match package {
        Some(name) => {
            activation::deactivate_package(
                &settings,
                &vconf,
                &StowDeploy,
                &repo,
                name,
                log,
                global.dry_run,
            )?;
            Ok(())
        }
        None => {
            log.stage(&format!("Deactivating repository {repo_name}"));
            activation::deactivate_repo(&settings, &vconf, &StowDeploy, &repo, log, global.dry_run)
        }
    }
}
