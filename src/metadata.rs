//! Package metadata codec: the on-disk `sdss.data` entry list.
//!
//! One entry per known source-tree path, in a line-oriented `key=value`
//! format:
//!
//! ```text
//! name=vim
//! state=inactive
//! dir=data/colors
//! file=data/vimrc
//! alt.default.active=data/gvimrc
//! alt.work.inactive=data/gvimrc
//! ```
//!
//! Entry order is preserved across load/save. All paths are stored relative
//! to the package directory.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::MetadataError;

/// File name of the per-package metadata file.
pub const META_FILE: &str = "sdss.data";

/// Suffix marking a version-tagged alternate in the source tree
/// (`<logical>.<version>.sdss`).
pub const ALT_SUFFIX: &str = ".sdss";

/// Activation state shared by packages and versioned alternates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Deployed (package: stowed into the destination; alternate: the one
    /// materialized at its logical path).
    Active,
    /// Not deployed.
    Inactive,
}

impl State {
    /// The wire form used in `sdss.data`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Decode the wire form; `None` for anything else.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One known source-tree path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A directory mirrored 1:1 into the deployment tree.
    Dir {
        /// Path relative to the package directory.
        path: PathBuf,
    },
    /// A plain file copied into the deployment tree.
    File {
        /// Path relative to the package directory.
        path: PathBuf,
    },
    /// A version-tagged alternate for a logical path.
    Alt {
        /// The logical path (version suffix stripped), relative to the
        /// package directory.
        logical: PathBuf,
        /// The version tag carried in the source file name.
        version: String,
        /// Whether this alternate is the one currently materialized.
        state: State,
    },
}

impl Entry {
    /// The source-tree path this entry describes, relative to the package
    /// directory. For alternates this is the logical path with its version
    /// suffix restored.
    #[must_use]
    pub fn source_path(&self) -> PathBuf {
        match self {
            Self::Dir { path } | Self::File { path } => path.clone(),
            Self::Alt {
                logical, version, ..
            } => alternate_source(logical, version),
        }
    }

    /// Decode a single `key=value` pair; `None` if it is not a valid entry.
    fn decode(key: &str, value: &str) -> Option<Self> {
        if value.is_empty() {
            return None;
        }
        if let Some(rest) = key.strip_prefix("alt.") {
            let (version, state) = rest.rsplit_once('.')?;
            if version.is_empty() {
                return None;
            }
            return Some(Self::Alt {
                logical: PathBuf::from(value),
                version: version.to_string(),
                state: State::parse(state)?,
            });
        }
        match key {
            "dir" => Some(Self::Dir {
                path: PathBuf::from(value),
            }),
            "file" => Some(Self::File {
                path: PathBuf::from(value),
            }),
            _ => None,
        }
    }

    /// Encode as a `key=value` line (no trailing newline).
    fn encode(&self) -> String {
        match self {
            Self::Dir { path } => format!("dir={}", path.display()),
            Self::File { path } => format!("file={}", path.display()),
            Self::Alt {
                logical,
                version,
                state,
            } => format!("alt.{version}.{state}={}", logical.display()),
        }
    }
}

/// Reconstruct an alternate's source path from its logical path and version
/// (`data/gvimrc` + `work` → `data/gvimrc.work.sdss`).
#[must_use]
pub fn alternate_source(logical: &Path, version: &str) -> PathBuf {
    logical.file_name().map_or_else(
        || logical.to_path_buf(),
        |name| {
            logical.with_file_name(format!(
                "{}.{version}{ALT_SUFFIX}",
                name.to_string_lossy()
            ))
        },
    )
}

/// Split a source file name into `(logical name, version)` if it carries the
/// alternate suffix; `None` for plain file names.
#[must_use]
pub fn split_alternate(file_name: &str) -> Option<(&str, &str)> {
    let stem = file_name.strip_suffix(ALT_SUFFIX)?;
    let (logical, version) = stem.rsplit_once('.')?;
    if logical.is_empty() || version.is_empty() {
        return None;
    }
    Some((logical, version))
}

/// A package's persisted metadata: identity, activation state, and the
/// ordered entry list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMeta {
    /// Package name as recorded at initialization.
    pub name: String,
    /// Whether the package's deployment tree is stowed into the destination.
    pub state: State,
    /// Known source-tree paths, in declaration order.
    pub entries: Vec<Entry>,
}

impl PackageMeta {
    /// Load `sdss.data` from `package_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Io`] if the file cannot be read and
    /// [`MetadataError::Malformed`] on the first undecodable line.
    pub fn load(package_dir: &Path) -> Result<Self, MetadataError> {
        let path = package_dir.join(META_FILE);
        let content = std::fs::read_to_string(&path).map_err(|source| MetadataError::Io {
            op: "reading",
            file: path.clone(),
            source,
        })?;

        let mut meta = Self {
            name: String::new(),
            state: State::Inactive,
            entries: Vec::new(),
        };

        for (line_num, line) in content.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let malformed = || MetadataError::Malformed {
                file: path.clone(),
                line: line_num + 1,
                content: line.to_string(),
            };
            let (key, value) = line.split_once('=').ok_or_else(malformed)?;
            match key {
                "name" => meta.name = value.to_string(),
                "state" => meta.state = State::parse(value).ok_or_else(malformed)?,
                _ => meta.entries.push(Entry::decode(key, value).ok_or_else(malformed)?),
            }
        }

        Ok(meta)
    }

    /// Load `sdss.data`, or return a fresh inactive seed when the package
    /// has never been reconciled.
    ///
    /// The seed is not written here; it reaches disk through the caller's
    /// next [`save`](Self::save), which keeps dry runs side-effect free.
    ///
    /// # Errors
    ///
    /// Propagates [`MetadataError`] from loading an existing file.
    pub fn load_or_default(package_dir: &Path, name: &str) -> Result<Self, MetadataError> {
        if package_dir.join(META_FILE).is_file() {
            return Self::load(package_dir);
        }
        Ok(Self {
            name: name.to_string(),
            state: State::Inactive,
            entries: Vec::new(),
        })
    }

    /// Serialize back to `sdss.data`, staged to a sibling temp file and
    /// atomically renamed so an interrupted write never truncates the
    /// previous metadata.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Io`] if the temp file cannot be written or
    /// renamed.
    pub fn save(&self, package_dir: &Path) -> Result<(), MetadataError> {
        let path = package_dir.join(META_FILE);
        let tmp = package_dir.join(format!("{META_FILE}.tmp"));

        let mut content = format!("name={}\nstate={}\n", self.name, self.state);
        for entry in &self.entries {
            content.push_str(&entry.encode());
            content.push('\n');
        }

        let io_err = |source| MetadataError::Io {
            op: "writing",
            file: path.clone(),
            source,
        };
        std::fs::write(&tmp, content).map_err(io_err)?;
        std::fs::rename(&tmp, &path).map_err(io_err)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn sample_meta() -> PackageMeta {
        PackageMeta {
            name: "vim".to_string(),
            state: State::Inactive,
            entries: vec![
                Entry::Dir {
                    path: PathBuf::from("data/colors"),
                },
                Entry::File {
                    path: PathBuf::from("data/vimrc"),
                },
                Entry::Alt {
                    logical: PathBuf::from("data/gvimrc"),
                    version: "default".to_string(),
                    state: State::Active,
                },
                Entry::Alt {
                    logical: PathBuf::from("data/gvimrc"),
                    version: "work".to_string(),
                    state: State::Inactive,
                },
            ],
        }
    }

    #[test]
    fn save_load_round_trip_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let meta = sample_meta();
        meta.save(dir.path()).unwrap();

        let loaded = PackageMeta::load(dir.path()).unwrap();
        assert_eq!(loaded, meta);
    }

    #[test]
    fn save_writes_expected_lines() {
        let dir = tempfile::tempdir().unwrap();
        sample_meta().save(dir.path()).unwrap();

        let content = std::fs::read_to_string(dir.path().join(META_FILE)).unwrap();
        assert_eq!(
            content,
            "name=vim\n\
             state=inactive\n\
             dir=data/colors\n\
             file=data/vimrc\n\
             alt.default.active=data/gvimrc\n\
             alt.work.inactive=data/gvimrc\n"
        );
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        sample_meta().save(dir.path()).unwrap();
        assert!(!dir.path().join(format!("{META_FILE}.tmp")).exists());
    }

    #[test]
    fn load_or_default_seeds_inactive_package() {
        let dir = tempfile::tempdir().unwrap();
        let meta = PackageMeta::load_or_default(dir.path(), "zsh").unwrap();
        assert_eq!(meta.name, "zsh");
        assert_eq!(meta.state, State::Inactive);
        assert!(meta.entries.is_empty());
        assert!(
            !dir.path().join(META_FILE).exists(),
            "seed is only persisted by save()"
        );
    }

    #[test]
    fn load_or_default_reads_existing() {
        let dir = tempfile::tempdir().unwrap();
        let mut meta = sample_meta();
        meta.state = State::Active;
        meta.save(dir.path()).unwrap();

        let loaded = PackageMeta::load_or_default(dir.path(), "ignored").unwrap();
        assert_eq!(loaded.name, "vim");
        assert_eq!(loaded.state, State::Active);
    }

    #[test]
    fn malformed_line_reports_location() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(META_FILE),
            "name=x\nstate=inactive\nnot a line\n",
        )
        .unwrap();

        match PackageMeta::load(dir.path()) {
            Err(MetadataError::Malformed { line, content, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(content, "not a line");
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn unknown_key_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(META_FILE), "widget=data/x\n").unwrap();
        assert!(matches!(
            PackageMeta::load(dir.path()),
            Err(MetadataError::Malformed { .. })
        ));
    }

    #[test]
    fn bad_alt_state_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(META_FILE), "alt.work.enabled=data/x\n").unwrap();
        assert!(matches!(
            PackageMeta::load(dir.path()),
            Err(MetadataError::Malformed { .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            PackageMeta::load(dir.path()),
            Err(MetadataError::Io { .. })
        ));
    }

    #[test]
    fn version_may_contain_dots() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(META_FILE), "alt.v1.2.active=data/x\n").unwrap();
        let meta = PackageMeta::load(dir.path()).unwrap();
        match &meta.entries[..] {
            [Entry::Alt { version, state, .. }] => {
                assert_eq!(version, "v1.2");
                assert_eq!(*state, State::Active);
            }
            other => panic!("unexpected entries: {other:?}"),
        }
    }

    #[test]
    fn split_alternate_parses_name_and_version() {
        assert_eq!(
            split_alternate("greeting.work.sdss"),
            Some(("greeting", "work"))
        );
        assert_eq!(split_alternate("a.b.c.sdss"), Some(("a.b", "c")));
    }

    #[test]
    fn split_alternate_rejects_plain_names() {
        assert_eq!(split_alternate("greeting"), None);
        assert_eq!(split_alternate("greeting.sdss"), None);
        assert_eq!(split_alternate(".work.sdss"), None);
    }

    #[test]
    fn alternate_source_restores_suffix() {
        assert_eq!(
            alternate_source(Path::new("data/sub/greeting"), "work"),
            PathBuf::from("data/sub/greeting.work.sdss")
        );
    }

    #[test]
    fn entry_source_path_round_trips_through_split() {
        let entry = Entry::Alt {
            logical: PathBuf::from("data/greeting"),
            version: "work".to_string(),
            state: State::Inactive,
        };
        let source = entry.source_path();
        let name = source.file_name().unwrap().to_string_lossy().into_owned();
        assert_eq!(split_alternate(&name), Some(("greeting", "work")));
    }
}
