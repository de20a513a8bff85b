//! The external symlink-farm collaborator.
//!
//! The engine only ever talks to the [`Deploy`] capability; the real adapter
//! shells out to GNU stow, and tests substitute [`test_support::FakeDeploy`].
//! The core never inspects destination-tree contents itself.

use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::error::DeployError;
use crate::exec;
use crate::repository::Package;

/// Symlink-farm operations consumed by the engine and the activation
/// controller.
///
/// `dir` is the package subdirectory to link from (normally the deployment
/// tree); `target` is the destination tree the links land in.
pub trait Deploy {
    /// Create destination-tree symlinks for `dir`.
    ///
    /// # Errors
    ///
    /// Returns a [`DeployError`] if the external tool fails.
    fn apply(&self, dir: &Path, target: &Path) -> Result<(), DeployError>;

    /// Remove destination-tree symlinks for `dir`.
    ///
    /// # Errors
    ///
    /// Returns a [`DeployError`] if the external tool fails.
    fn remove(&self, dir: &Path, target: &Path) -> Result<(), DeployError>;

    /// Re-link `dir` so the destination reflects its current contents.
    ///
    /// # Errors
    ///
    /// Returns a [`DeployError`] if the external tool fails.
    fn resync(&self, dir: &Path, target: &Path) -> Result<(), DeployError>;
}

/// Production adapter shelling out to GNU stow.
#[derive(Debug, Default)]
pub struct StowDeploy;

impl StowDeploy {
    fn invoke(action: &'static str, flag: &str, dir: &Path, target: &Path)
    -> Result<(), DeployError> {
        if !exec::which("stow") {
            return Err(DeployError::ToolNotFound);
        }
        let args = stow_args(flag, dir, target).ok_or_else(|| DeployError::Tool {
            action,
            dir: dir.to_path_buf(),
            message: "deploy directory has no parent".to_string(),
        })?;
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        let result = exec::run_unchecked("stow", &arg_refs).map_err(DeployError::Spawn)?;
        if result.success {
            Ok(())
        } else {
            Err(DeployError::Tool {
                action,
                dir: dir.to_path_buf(),
                message: result.stderr.trim().to_string(),
            })
        }
    }
}

impl Deploy for StowDeploy {
    fn apply(&self, dir: &Path, target: &Path) -> Result<(), DeployError> {
        Self::invoke("apply", "-S", dir, target)
    }

    fn remove(&self, dir: &Path, target: &Path) -> Result<(), DeployError> {
        Self::invoke("remove", "-D", dir, target)
    }

    fn resync(&self, dir: &Path, target: &Path) -> Result<(), DeployError> {
        Self::invoke("resync", "-R", dir, target)
    }
}

/// Build the stow argument list for linking `dir` into `target`.
///
/// Stow is pointed at the parent of `dir` (`-d`) and given the directory
/// name as the stow package, so `<pkg>/deploy` is linked as the package
/// `deploy` of `<pkg>`.
fn stow_args(flag: &str, dir: &Path, target: &Path) -> Option<Vec<String>> {
    let parent = dir.parent()?;
    let name = dir.file_name()?;
    Some(vec![
        "-d".to_string(),
        parent.display().to_string(),
        "-t".to_string(),
        target.display().to_string(),
        flag.to_string(),
        name.to_string_lossy().into_owned(),
    ])
}

/// The directory that gets stowed for `package`.
///
/// Normally the deployment tree; while edit mode is enabled the authored
/// source tree is linked directly (or its counterpart under the edit root,
/// when one is configured) so edits are live without a refresh.
#[must_use]
pub fn stow_source(settings: &Settings, edit_mode: bool, package: &Package) -> PathBuf {
    if edit_mode {
        settings.edit_root.as_ref().map_or_else(
            || package.data_dir(),
            |root| root.join(package.repo()).join(package.name()).join("data"),
        )
    } else {
        package.deploy_dir()
    }
}
