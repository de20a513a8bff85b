//! The reconciliation engine.
//!
//! A refresh runs once per package: the discovery pass appends metadata
//! entries for new source-tree paths, the reconcile pass computes a
//! deferred-mutation plan from the entry list, and only then is the
//! deployment tree touched. A failure inside one package is reported and
//! the refresh moves on to the next.
pub mod discovery;
pub mod reconcile;

use anyhow::{Result, bail};

use crate::config::{Settings, VersionConfig};
use crate::deploy::{self, Deploy};
use crate::logging::{Logger, Status};
use crate::metadata::{PackageMeta, State};
use crate::repository::{self, Package};

/// Refresh every package of every repository under the data root.
///
/// # Errors
///
/// Individual package failures are recorded and do not stop the run; an
/// error is returned at the end if any package failed.
pub fn refresh(
    settings: &Settings,
    vconf: &VersionConfig,
    deploy: &dyn Deploy,
    log: &Logger,
    dry_run: bool,
) -> Result<()> {
    for repo in repository::repositories(settings)? {
        let packages = match repo.packages() {
            Ok(packages) => packages,
            Err(e) => {
                log.error(&format!("{}: {e:#}", repo.name()));
                log.record(repo.name(), Status::Failed, Some(&format!("{e:#}")));
                continue;
            }
        };
        for package in packages {
            let label = package.qualified_name();
            match refresh_package(settings, vconf, deploy, &package, log, dry_run) {
                Ok(status) => log.record(&label, status, None),
                Err(e) => {
                    log.error(&format!("{label}: {e:#}"));
                    log.record(&label, Status::Failed, Some(&format!("{e:#}")));
                }
            }
        }
    }

    log.print_summary();

    let failures = log.failure_count();
    if failures > 0 {
        bail!("{failures} package(s) failed to refresh");
    }
    Ok(())
}

/// Run both reconciliation passes for a single package.
fn refresh_package(
    settings: &Settings,
    vconf: &VersionConfig,
    deploy: &dyn Deploy,
    package: &Package,
    log: &Logger,
    dry_run: bool,
) -> Result<Status> {
    let mut meta = PackageMeta::load_or_default(package.path(), package.name())?;

    let discovered = discovery::discover(package, &meta.entries, &vconf.version)?;
    if !discovered.is_empty() {
        log.debug(&format!(
            "{}: discovered {} new entries",
            package.qualified_name(),
            discovered.len()
        ));
    }
    meta.entries.extend(discovered);

    let plan = reconcile::plan(package, &meta.entries, &vconf.version);

    if dry_run {
        for action in &plan.actions {
            log.dry_run(&format!("{}: {}", package.qualified_name(), action.describe()));
        }
        return Ok(Status::DryRun);
    }

    reconcile::apply(&plan.actions, log)?;

    meta.entries = plan.entries;
    meta.save(package.path())?;

    if meta.state == State::Active {
        let source = deploy::stow_source(settings, vconf.edit_mode, package);
        deploy.resync(&source, &settings.target_dir)?;
    }

    Ok(Status::Ok)
}
