//! Command: clone a dotfiles repository into the repos directory.
use anyhow::{Context as _, Result, bail};

use crate::cli::GlobalOpts;
use crate::exec;
use crate::logging::Logger;

/// Run the clone command.
///
/// # Errors
///
/// Returns an error if the URL yields no repository name, the destination
/// already exists, or `git clone` fails.
pub fn run(global: &GlobalOpts, url: &str, log: &Logger) -> Result<()> {
    let (settings, _vconf) = super::setup(global)?;

    let name = repo_name_from_url(url)?;
    let dest = settings.repos_dir().join(&name);
    if dest.exists() {
        bail!("repository '{name}' already exists at {}", dest.display());
    }

    if global.dry_run {
        log.dry_run(&format!("would clone {url} into {}", dest.display()));
        return Ok(());
    }

    std::fs::create_dir_all(settings.repos_dir())
        .with_context(|| format!("creating {}", settings.repos_dir().display()))?;

    log.stage(&format!("Cloning {url}"));
    exec::run("git", &["clone", url, &dest.to_string_lossy()])?;
    log.info(&format!("cloned into {}", dest.display()));
    Ok(())
}

/// Derive the repository directory name from a clone URL.
///
/// Handles both URL-style (`https://host/user/repo.git`) and scp-style
/// (`git@host:user/repo.git`) remotes.
fn repo_name_from_url(url: &str) -> Result<String> {
    let trimmed = url.trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    let name = trimmed
        .rsplit(['/', ':'])
        .next()
        .unwrap_or_default();
    if name.is_empty() {
        bail!("cannot derive a repository name from '{url}'");
    }
    Ok(name.to_string())
}
