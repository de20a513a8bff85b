//! Repository and package enumeration under `<dataRoot>/repos`.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};

use crate::config::Settings;

/// A directory grouping multiple packages.
#[derive(Debug, Clone)]
pub struct Repository {
    name: String,
    path: PathBuf,
}

/// A package directory: source tree, deployment tree, and metadata.
#[derive(Debug, Clone)]
pub struct Package {
    repo: String,
    name: String,
    path: PathBuf,
}

impl Repository {
    /// Repository name (its directory name).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path of the repository directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All non-hidden package directories in this repository, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository directory cannot be read.
    pub fn packages(&self) -> Result<Vec<Package>> {
        Ok(visible_dirs(&self.path)?
            .into_iter()
            .map(|(name, path)| Package {
                repo: self.name.clone(),
                name,
                path,
            })
            .collect())
    }

    /// Look up a single package by name.
    ///
    /// # Errors
    ///
    /// Returns an error if no such package directory exists.
    pub fn package(&self, name: &str) -> Result<Package> {
        let path = self.path.join(name);
        if !path.is_dir() {
            bail!("no package '{name}' in repository '{}'", self.name);
        }
        Ok(Package {
            repo: self.name.clone(),
            name: name.to_string(),
            path,
        })
    }
}

impl Package {
    /// Package name (its directory name).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the repository this package belongs to.
    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// `repo/name` label used in log output.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.repo, self.name)
    }

    /// Absolute path of the package directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The authored source tree.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.path.join("data")
    }

    /// The materialized deployment tree.
    #[must_use]
    pub fn deploy_dir(&self) -> PathBuf {
        self.path.join("deploy")
    }
}

/// All non-hidden repositories under the data root, sorted by name.
///
/// An absent `repos/` directory yields an empty list (nothing cloned yet).
///
/// # Errors
///
/// Returns an error if the repos directory exists but cannot be read.
pub fn repositories(settings: &Settings) -> Result<Vec<Repository>> {
    let repos_dir = settings.repos_dir();
    if !repos_dir.is_dir() {
        return Ok(Vec::new());
    }
    Ok(visible_dirs(&repos_dir)?
        .into_iter()
        .map(|(name, path)| Repository { name, path })
        .collect())
}

/// Look up a single repository by name.
///
/// # Errors
///
/// Returns an error if no such repository directory exists.
pub fn find_repository(settings: &Settings, name: &str) -> Result<Repository> {
    let path = settings.repos_dir().join(name);
    if !path.is_dir() {
        bail!("no repository '{name}' under {}", settings.repos_dir().display());
    }
    Ok(Repository {
        name: name.to_string(),
        path,
    })
}

/// Immediate non-hidden subdirectories of `dir` as `(name, path)` pairs,
/// sorted by name.
fn visible_dirs(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut out = Vec::new();
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))?
    {
        let entry = entry.with_context(|| format!("reading entry in {}", dir.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || !entry.path().is_dir() {
            continue;
        }
        out.push((name, entry.path()));
    }
    out.sort();
    Ok(out)
}
