//! Version and type reconciliation: compute the desired deployment-tree
//! state from the entry list, then apply it.
//!
//! The two halves are deliberately separate: [`plan`] reads the entry list
//! and the source tree without touching anything, and [`apply`] executes the
//! queued mutations afterwards. Nothing is mutated while entries are still
//! being read.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use sha2::{Digest, Sha256};

use crate::logging::Logger;
use crate::metadata::{Entry, State, alternate_source};
use crate::repository::Package;

/// A single deferred deployment-tree mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Create a directory (and any missing ancestors); fine if it exists.
    EnsureDir {
        /// Absolute deployment-tree path.
        dest: PathBuf,
    },
    /// Remove a file; fine if it is already absent.
    RemoveFile {
        /// Absolute deployment-tree path.
        dest: PathBuf,
    },
    /// Recursively remove a directory; fine if it is already absent.
    RemoveTree {
        /// Absolute deployment-tree path.
        dest: PathBuf,
    },
    /// Copy a source file into the deployment tree, staging through a
    /// sibling temp file when the destination already exists.
    MaterializeFile {
        /// Absolute source-tree path.
        source: PathBuf,
        /// Absolute deployment-tree path.
        dest: PathBuf,
    },
}

impl Action {
    /// One-line human-readable form for dry-run and debug output.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::EnsureDir { dest } => format!("ensure dir {}", dest.display()),
            Self::RemoveFile { dest } => format!("remove {}", dest.display()),
            Self::RemoveTree { dest } => format!("remove tree {}", dest.display()),
            Self::MaterializeFile { source, dest } => {
                format!("copy {} -> {}", source.display(), dest.display())
            }
        }
    }
}

/// The reconciled entry list plus the mutations needed to make the
/// deployment tree match it.
#[derive(Debug)]
pub struct Plan {
    /// Entries with versions and types reconciled, in original order.
    pub entries: Vec<Entry>,
    /// Deferred mutations, in execution order.
    pub actions: Vec<Action>,
}

/// Map a package-relative source path to its absolute deployment-tree path
/// (the leading `data/` component is replaced by the deploy root).
fn deploy_path(package: &Package, source_rel: &Path) -> PathBuf {
    let rel = source_rel.strip_prefix("data").unwrap_or(source_rel);
    package.deploy_dir().join(rel)
}

/// Compute the reconciled entries and deferred actions for `package`.
///
/// Reads the source tree (existence and type checks only) and never mutates
/// anything. Per entry:
///
/// - `Alt` whose source is gone is left untouched. Otherwise the entry's
///   state is rewritten from the version comparison; the matching alternate
///   is materialized and a mismatched one has its deployment file removed —
///   unless the same logical path is claimed by the matching version, in
///   which case the staged replace performed by [`apply`] already covers the
///   transition without a window where the file is missing.
/// - `Dir`/`File` check source existence before type (a vanished source
///   always means plain removal), rewriting the entry when the source
///   changed type.
#[must_use]
pub fn plan(package: &Package, entries: &[Entry], current_version: &str) -> Plan {
    // Logical paths that the currently selected version will materialize.
    let claimed: HashSet<&Path> = entries
        .iter()
        .filter_map(|entry| match entry {
            Entry::Alt {
                logical, version, ..
            } if version == current_version
                && package.path().join(alternate_source(logical, version)).is_file() =>
            {
                Some(logical.as_path())
            }
            _ => None,
        })
        .collect();

    let mut out = Vec::with_capacity(entries.len());
    let mut actions = Vec::new();

    for entry in entries {
        match entry {
            Entry::Alt {
                logical, version, ..
            } => {
                let source = package.path().join(alternate_source(logical, version));
                if !source.is_file() {
                    out.push(entry.clone());
                    continue;
                }
                let dest = deploy_path(package, logical);
                if version == current_version {
                    actions.push(Action::MaterializeFile { source, dest });
                    out.push(Entry::Alt {
                        logical: logical.clone(),
                        version: version.clone(),
                        state: State::Active,
                    });
                } else {
                    if !claimed.contains(logical.as_path()) {
                        actions.push(Action::RemoveFile { dest });
                    }
                    out.push(Entry::Alt {
                        logical: logical.clone(),
                        version: version.clone(),
                        state: State::Inactive,
                    });
                }
            }
            Entry::Dir { path } => {
                let source = package.path().join(path);
                let dest = deploy_path(package, path);
                if !source.exists() {
                    actions.push(Action::RemoveTree { dest });
                    out.push(entry.clone());
                } else if source.is_file() {
                    actions.push(Action::RemoveTree { dest: dest.clone() });
                    actions.push(Action::MaterializeFile { source, dest });
                    out.push(Entry::File { path: path.clone() });
                } else {
                    actions.push(Action::EnsureDir { dest });
                    out.push(entry.clone());
                }
            }
            Entry::File { path } => {
                let source = package.path().join(path);
                let dest = deploy_path(package, path);
                if !source.exists() {
                    actions.push(Action::RemoveFile { dest });
                    out.push(entry.clone());
                } else if source.is_dir() {
                    actions.push(Action::RemoveFile { dest: dest.clone() });
                    actions.push(Action::EnsureDir { dest });
                    out.push(Entry::Dir { path: path.clone() });
                } else {
                    actions.push(Action::MaterializeFile { source, dest });
                    out.push(entry.clone());
                }
            }
        }
    }

    Plan {
        entries: out,
        actions,
    }
}

/// Execute the queued actions in order.
///
/// # Errors
///
/// The first filesystem failure aborts with the failing action's
/// description; the caller treats this as fatal for the current package.
pub fn apply(actions: &[Action], log: &Logger) -> Result<()> {
    for action in actions {
        execute(action, log).with_context(|| format!("failed to {}", action.describe()))?;
    }
    Ok(())
}

fn execute(action: &Action, log: &Logger) -> Result<()> {
    match action {
        Action::EnsureDir { dest } => {
            std::fs::create_dir_all(dest)?;
        }
        Action::RemoveFile { dest } => match std::fs::remove_file(dest) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            other => other?,
        },
        Action::RemoveTree { dest } => {
            if dest.symlink_metadata().is_ok() {
                std::fs::remove_dir_all(dest)?;
            }
        }
        Action::MaterializeFile { source, dest } => {
            materialize(source, dest, log)?;
        }
    }
    Ok(())
}

/// Copy `source` over `dest`.
///
/// An existing identical destination is left alone. An existing different
/// one is replaced by staging the copy to a sibling temp path and renaming,
/// so the destination path never goes missing while symlinks may still
/// point at it.
fn materialize(source: &Path, dest: &Path, log: &Logger) -> Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }

    if dest.is_file() {
        if files_identical(source, dest)? {
            log.debug(&format!("unchanged: {}", dest.display()));
            return Ok(());
        }
        // Sibling temp name keeps the rename on the same filesystem.
        let name = dest
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
        let tmp = dest.with_file_name(format!("{name}.sdss_tmp"));
        std::fs::copy(source, &tmp)
            .with_context(|| format!("copy {} to {}", source.display(), tmp.display()))?;
        if let Err(e) = std::fs::rename(&tmp, dest) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e)
                .with_context(|| format!("rename {} to {}", tmp.display(), dest.display()));
        }
        return Ok(());
    }

    std::fs::copy(source, dest)
        .with_context(|| format!("copy {} to {}", source.display(), dest.display()))?;
    Ok(())
}

/// Compare two files by SHA-256 digest.
fn files_identical(a: &Path, b: &Path) -> Result<bool> {
    Ok(file_digest(a)? == file_digest(b)?)
}

fn file_digest(path: &Path) -> Result<sha2::digest::Output<Sha256>> {
    let mut file =
        std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)
        .with_context(|| format!("hashing {}", path.display()))?;
    Ok(hasher.finalize())
}
