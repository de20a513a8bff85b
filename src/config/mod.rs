//! Process configuration: filesystem locations and the persisted version
//! selection.
//!
//! All state is carried in explicit values ([`Settings`], [`VersionConfig`])
//! passed through component calls; nothing reads ambient globals after
//! startup.
pub mod version;

pub use version::VersionConfig;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

/// Resolved filesystem locations for one invocation.
///
/// Each location is independently overridable: CLI flag first, then
/// environment variable, then the platform default.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Root of the sdss state: `sdss.conf` and the `repos/` tree live here.
    pub data_root: PathBuf,
    /// Destination tree the symlink-farm tool links into (normally `$HOME`).
    pub target_dir: PathBuf,
    /// Optional parallel checkout used as the stow source while edit mode
    /// is enabled.
    pub edit_root: Option<PathBuf>,
}

impl Settings {
    /// Resolve settings from CLI overrides, environment, and defaults.
    ///
    /// Honors `SDSS_DATA_DIR`, `SDSS_TARGET_DIR`, and `SDSS_EDIT_DIR`.
    ///
    /// # Errors
    ///
    /// Returns an error if no data directory or home directory can be
    /// determined.
    pub fn resolve(data_dir: Option<&Path>, target_dir: Option<&Path>) -> Result<Self> {
        let data_root = data_dir
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os("SDSS_DATA_DIR").map(PathBuf::from))
            .or_else(|| dirs::data_dir().map(|d| d.join("sdss")))
            .context("cannot determine data directory; use --data-dir or SDSS_DATA_DIR")?;

        let target_dir = target_dir
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os("SDSS_TARGET_DIR").map(PathBuf::from))
            .or_else(dirs::home_dir)
            .context("cannot determine target directory; use --target-dir or SDSS_TARGET_DIR")?;

        let edit_root = std::env::var_os("SDSS_EDIT_DIR").map(PathBuf::from);

        Ok(Self {
            data_root,
            target_dir,
            edit_root,
        })
    }

    /// Directory holding all cloned repositories.
    #[must_use]
    pub fn repos_dir(&self) -> PathBuf {
        self.data_root.join("repos")
    }

    /// Path of the global `sdss.conf` file.
    #[must_use]
    pub fn conf_path(&self) -> PathBuf {
        self.data_root.join(version::CONF_FILE)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn explicit_overrides_win() {
        let settings = Settings::resolve(
            Some(Path::new("/tmp/sdss-data")),
            Some(Path::new("/tmp/sdss-home")),
        )
        .unwrap();
        assert_eq!(settings.data_root, PathBuf::from("/tmp/sdss-data"));
        assert_eq!(settings.target_dir, PathBuf::from("/tmp/sdss-home"));
    }

    #[test]
    fn repos_dir_is_under_data_root() {
        let settings = Settings::resolve(Some(Path::new("/data")), Some(Path::new("/home/u")))
            .unwrap();
        assert_eq!(settings.repos_dir(), PathBuf::from("/data/repos"));
    }

    #[test]
    fn conf_path_is_under_data_root() {
        let settings = Settings::resolve(Some(Path::new("/data")), Some(Path::new("/home/u")))
            .unwrap();
        assert_eq!(settings.conf_path(), PathBuf::from("/data/sdss.conf"));
    }
}
