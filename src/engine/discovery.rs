//! Discovery pass: walk a package's source tree and append entries for
//! paths the metadata does not know yet.
//!
//! This pass only ever adds entries; existing ones are neither removed nor
//! mutated, and a path already covered by the metadata is never added twice.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use walkdir::WalkDir;

use crate::metadata::{Entry, State, split_alternate};
use crate::repository::Package;

/// Walk the source tree of `package` and return entries for every path not
/// already present in `entries`.
///
/// New directories become [`Entry::Dir`], files carrying the
/// `<name>.<version>.sdss` suffix become [`Entry::Alt`] (active only when
/// their version matches `current_version`), and everything else becomes
/// [`Entry::File`]. Walk order is sorted so repeated runs produce identical
/// metadata.
///
/// # Errors
///
/// Returns an error if a directory in the source tree cannot be read.
pub fn discover(
    package: &Package,
    entries: &[Entry],
    current_version: &str,
) -> Result<Vec<Entry>> {
    let data_dir = package.data_dir();
    if !data_dir.is_dir() {
        return Ok(Vec::new());
    }

    let known: HashSet<PathBuf> = entries.iter().map(Entry::source_path).collect();
    let mut found = Vec::new();

    for item in WalkDir::new(&data_dir).min_depth(1).sort_by_file_name() {
        let item = item.with_context(|| format!("walking {}", data_dir.display()))?;
        let rel = item
            .path()
            .strip_prefix(package.path())
            .with_context(|| format!("path escapes package: {}", item.path().display()))?
            .to_path_buf();
        if known.contains(&rel) {
            continue;
        }

        if item.file_type().is_dir() {
            found.push(Entry::Dir { path: rel });
        } else if let Some((logical, version)) = item
            .file_name()
            .to_str()
            .and_then(split_alternate)
        {
            let state = if version == current_version {
                State::Active
            } else {
                State::Inactive
            };
            found.push(Entry::Alt {
                logical: rel.with_file_name(logical),
                version: version.to_string(),
                state,
            });
        } else {
            found.push(Entry::File { path: rel });
        }
    }

    Ok(found)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::engine::test_helpers::{TestInstall, write_file};

    #[test]
    fn discovers_dirs_files_and_alternates() {
        let install = TestInstall::new();
        let pkg = install.package("base", "vim");
        write_file(&pkg.data_dir().join("vimrc"), "set nocompatible");
        write_file(&pkg.data_dir().join("colors/dark.vim"), "hi Normal");
        write_file(&pkg.data_dir().join("gvimrc.work.sdss"), "work font");

        let found = discover(&pkg, &[], "default").unwrap();
        assert_eq!(
            found,
            vec![
                Entry::Dir {
                    path: PathBuf::from("data/colors"),
                },
                Entry::File {
                    path: PathBuf::from("data/colors/dark.vim"),
                },
                Entry::Alt {
                    logical: PathBuf::from("data/gvimrc"),
                    version: "work".to_string(),
                    state: State::Inactive,
                },
                Entry::File {
                    path: PathBuf::from("data/vimrc"),
                },
            ]
        );
    }

    #[test]
    fn alternate_matching_current_version_is_active() {
        let install = TestInstall::new();
        let pkg = install.package("base", "vim");
        write_file(&pkg.data_dir().join("gvimrc.work.sdss"), "work font");

        let found = discover(&pkg, &[], "work").unwrap();
        assert_eq!(
            found,
            vec![Entry::Alt {
                logical: PathBuf::from("data/gvimrc"),
                version: "work".to_string(),
                state: State::Active,
            }]
        );
    }

    #[test]
    fn known_paths_are_not_rediscovered() {
        let install = TestInstall::new();
        let pkg = install.package("base", "vim");
        write_file(&pkg.data_dir().join("vimrc"), "x");
        write_file(&pkg.data_dir().join("gvimrc.work.sdss"), "y");

        let first = discover(&pkg, &[], "default").unwrap();
        let second = discover(&pkg, &first, "default").unwrap();
        assert!(second.is_empty(), "second pass must add nothing: {second:?}");
    }

    #[test]
    fn missing_source_tree_yields_nothing() {
        let install = TestInstall::new();
        let pkg = install.bare_package("base", "empty");
        // no data/ directory at all
        let found = discover(&pkg, &[], "default").unwrap();
        assert!(found.is_empty());
    }
}
