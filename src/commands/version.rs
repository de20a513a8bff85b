//! Commands: print version information and switch the selected version.
use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::logging::Logger;

/// Print the sdss version and the currently selected package version.
///
/// # Errors
///
/// Returns an error if the version config cannot be read or created.
pub fn run(global: &GlobalOpts) -> Result<()> {
    let (_settings, vconf) = super::setup(global)?;
    println!("sdss {}", env!("CARGO_PKG_VERSION"));
    println!("selected version: {}", vconf.version);
    Ok(())
}

/// Switch the globally selected version tag.
///
/// Deployment trees are only migrated by a later refresh; this command just
/// rewrites the selection.
///
/// # Errors
///
/// Returns an error if `sdss.conf` cannot be read or written.
pub fn change(global: &GlobalOpts, new_version: &str, log: &Logger) -> Result<()> {
    let (settings, mut vconf) = super::setup(global)?;

    if vconf.version == new_version {
        log.info(&format!("version '{new_version}' is already selected"));
        return Ok(());
    }

    if global.dry_run {
        log.dry_run(&format!(
            "would switch version from '{}' to '{new_version}'",
            vconf.version
        ));
        return Ok(());
    }

    vconf.version = new_version.to_string();
    vconf.save(&settings.data_root)?;
    log.info(&format!(
        "selected version '{new_version}'; run refresh to migrate deployment trees"
    ));
    Ok(())
}
