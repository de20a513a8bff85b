//! Top-level subcommand orchestration.
pub mod activate;
pub mod clone;
pub mod deactivate;
pub mod edit;
pub mod list;
pub mod refresh;
pub mod version;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::{Settings, VersionConfig};

/// Resolve settings and load (or initialize) the global version config.
///
/// Every command starts with this pair; nothing else reads the environment
/// afterwards.
///
/// # Errors
///
/// Returns an error if the locations cannot be resolved or `sdss.conf`
/// cannot be read or created.
pub fn setup(global: &GlobalOpts) -> Result<(Settings, VersionConfig)> {
    let settings = Settings::resolve(global.data_dir.as_deref(), global.target_dir.as_deref())?;
    let vconf = VersionConfig::load_or_init(&settings.data_root)?;
    Ok((settings, vconf))
}
