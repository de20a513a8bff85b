//! Command: toggle edit mode.
//!
//! While edit mode is on, active packages are stowed from their authored
//! source trees instead of their deployment trees, so edits show up in the
//! destination without a refresh. Toggling re-stows every active package
//! from the other tree.
use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::deploy::{self, Deploy, StowDeploy};
use crate::logging::Logger;
use crate::metadata::{PackageMeta, State};
use crate::repository;

/// Run the edit command.
///
/// # Errors
///
/// Returns an error if re-stowing an active package fails or the config
/// cannot be written; the flag is only persisted after all packages have
/// been moved.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let (settings, mut vconf) = super::setup(global)?;
    let enabling = !vconf.edit_mode;
    let deploy = StowDeploy;

    if global.dry_run {
        log.dry_run(&format!(
            "would turn edit mode {}",
            if enabling { "on" } else { "off" }
        ));
        return Ok(());
    }

    for repo in repository::repositories(&settings)? {
        for package in repo.packages()? {
            let meta = PackageMeta::load_or_default(package.path(), package.name())?;
            if meta.state != State::Active {
                continue;
            }
            let current = deploy::stow_source(&settings, vconf.edit_mode, &package);
            let next = deploy::stow_source(&settings, enabling, &package);
            if current == next {
                continue;
            }
            log.debug(&format!(
                "re-stowing {}: {} -> {}",
                package.qualified_name(),
                current.display(),
                next.display()
            ));
            deploy.remove(&current, &settings.target_dir)?;
            deploy.apply(&next, &settings.target_dir)?;
        }
    }

    vconf.edit_mode = enabling;
    vconf.save(&settings.data_root)?;
    log.info(&format!(
        "edit mode {}",
        if enabling { "enabled" } else { "disabled" }
    ));
    Ok(())
}
