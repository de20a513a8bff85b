//! Toggling a package's active state through the deploy collaborator.
//!
//! The metadata `state` field is only rewritten after the external tool
//! reports success; a failed invocation leaves the package exactly as it
//! was.

use anyhow::{Result, bail};

use crate::config::{Settings, VersionConfig};
use crate::deploy::{self, Deploy};
use crate::logging::{Logger, Status};
use crate::metadata::{PackageMeta, State};
use crate::repository::Repository;

/// The two directions a package can be toggled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Activate,
    Deactivate,
}

impl Transition {
    const fn desired(self) -> State {
        match self {
            Self::Activate => State::Active,
            Self::Deactivate => State::Inactive,
        }
    }

    const fn verb(self) -> &'static str {
        match self {
            Self::Activate => "activated",
            Self::Deactivate => "deactivated",
        }
    }
}

/// Stow a single package into the destination tree and mark it active.
///
/// A package that is already active is reported and left alone.
///
/// # Errors
///
/// Returns an error if the package or its metadata cannot be read, or if
/// the deploy tool fails (in which case the state is not mutated).
pub fn activate_package(
    settings: &Settings,
    vconf: &VersionConfig,
    deploy: &dyn Deploy,
    repo: &Repository,
    name: &str,
    log: &Logger,
    dry_run: bool,
) -> Result<Status> {
    toggle_package(
        settings,
        vconf,
        deploy,
        repo,
        name,
        log,
        dry_run,
        Transition::Activate,
    )
}

/// Unstow a single package from the destination tree and mark it inactive.
///
/// # Errors
///
/// Same contract as [`activate_package`], in the opposite direction.
pub fn deactivate_package(
    settings: &Settings,
    vconf: &VersionConfig,
    deploy: &dyn Deploy,
    repo: &Repository,
    name: &str,
    log: &Logger,
    dry_run: bool,
) -> Result<Status> {
    toggle_package(
        settings,
        vconf,
        deploy,
        repo,
        name,
        log,
        dry_run,
        Transition::Deactivate,
    )
}

#[allow(clippy::too_many_arguments)]
fn toggle_package(
    settings: &Settings,
    vconf: &VersionConfig,
    deploy: &dyn Deploy,
    repo: &Repository,
    name: &str,
    log: &Logger,
    dry_run: bool,
    transition: Transition,
) -> Result<Status> {
    let package = repo.package(name)?;
    let label = package.qualified_name();
    let mut meta = PackageMeta::load_or_default(package.path(), package.name())?;

    if meta.state == transition.desired() {
        log.info(&format!("{label} is already {}", meta.state));
        return Ok(Status::Skipped);
    }

    let source = deploy::stow_source(settings, vconf.edit_mode, &package);
    if dry_run {
        log.dry_run(&format!(
            "would run stow {} for {} -> {}",
            if transition == Transition::Activate {
                "apply"
            } else {
                "remove"
            },
            source.display(),
            settings.target_dir.display()
        ));
        return Ok(Status::DryRun);
    }

    match transition {
        Transition::Activate => deploy.apply(&source, &settings.target_dir)?,
        Transition::Deactivate => deploy.remove(&source, &settings.target_dir)?,
    }

    meta.state = transition.desired();
    meta.save(package.path())?;
    log.info(&format!("{} {label}", transition.verb()));
    Ok(Status::Ok)
}

/// Toggle every package in `repo`, independently.
///
/// # Errors
///
/// Per-package failures are recorded and do not stop the fan-out; an error
/// is returned at the end if any package failed.
pub fn activate_repo(
    settings: &Settings,
    vconf: &VersionConfig,
    deploy: &dyn Deploy,
    repo: &Repository,
    log: &Logger,
    dry_run: bool,
) -> Result<()> {
    toggle_repo(settings, vconf, deploy, repo, log, dry_run, Transition::Activate)
}

/// Deactivating counterpart of [`activate_repo`].
///
/// # Errors
///
/// Same contract as [`activate_repo`].
pub fn deactivate_repo(
    settings: &Settings,
    vconf: &VersionConfig,
    deploy: &dyn Deploy,
    repo: &Repository,
    log: &Logger,
    dry_run: bool,
) -> Result<()> {
    toggle_repo(
        settings,
        vconf,
        deploy,
        repo,
        log,
        dry_run,
        Transition::Deactivate,
    )
}

fn toggle_repo(
    settings: &Settings,
    vconf: &VersionConfig,
    deploy: &dyn Deploy,
    repo: &Repository,
    log: &Logger,
    dry_run: bool,
    transition: Transition,
) -> Result<()> {
    for package in repo.packages()? {
        let label = package.qualified_name();
        let outcome = toggle_package(
            settings,
            vconf,
            deploy,
            repo,
            package.name(),
            log,
            dry_run,
            transition,
        );
        match outcome {
            Ok(status) => log.record(&label, status, None),
            Err(e) => {
                log.error(&format!("{label}: {e:#}"));
                log.record(&label, Status::Failed, Some(&format!("{e:#}")));
            }
        }
    }

    log.print_summary();

    let failures = log.failure_count();
    if failures > 0 {
        bail!("{failures} package(s) failed");
    }
    Ok(())
}
