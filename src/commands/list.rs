//! Commands: list repositories and packages.
use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::metadata::PackageMeta;
use crate::repository;

/// Print every repository name, one per line.
///
/// # Errors
///
/// Returns an error if the repos directory cannot be read.
pub fn repos(global: &GlobalOpts) -> Result<()> {
    let (settings, _vconf) = super::setup(global)?;
    for repo in repository::repositories(&settings)? {
        println!("{}", repo.name());
    }
    Ok(())
}

/// Print every package of `repo_name` with its activation state.
///
/// # Errors
///
/// Returns an error if the repository is unknown or cannot be read.
pub fn packages(global: &GlobalOpts, repo_name: &str) -> Result<()> {
    let (settings, _vconf) = super::setup(global)?;
    let repo = repository::find_repository(&settings, repo_name)?;
    for package in repo.packages()? {
        let meta = PackageMeta::load_or_default(package.path(), package.name())?;
        println!("{} ({})", package.name(), meta.state);
    }
    Ok(())
}
