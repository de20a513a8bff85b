//! Command: reconcile every package with the selected version.
use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::deploy::StowDeploy;
use crate::engine;
use crate::logging::Logger;

/// Run the refresh command.
///
/// # Errors
///
/// Returns an error if setup fails or any package fails to reconcile.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let (settings, vconf) = super::setup(global)?;
    log.stage(&format!("Refreshing packages (version: {})", vconf.version));
    engine::refresh(&settings, &vconf, &StowDeploy, log, global.dry_run)
}
