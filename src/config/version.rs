//! The global `sdss.conf` file: version selection and edit-mode flag.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};

/// File name of the global configuration inside the data root.
pub const CONF_FILE: &str = "sdss.conf";

/// Version tag written on first use.
pub const DEFAULT_VERSION: &str = "default";

/// Parsed contents of `sdss.conf`.
///
/// Line-oriented `key=value`. Keys other than `version` and `edit` are
/// preserved across rewrites so that a newer sdss does not destroy settings
/// an older one wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConfig {
    /// The globally selected version tag.
    pub version: String,
    /// Whether edit mode is enabled.
    pub edit_mode: bool,
    /// Unknown keys carried through verbatim.
    extra: Vec<(String, String)>,
}

impl Default for VersionConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            edit_mode: false,
            extra: Vec::new(),
        }
    }
}

impl VersionConfig {
    /// Load `sdss.conf` from `data_root`, creating it with defaults on
    /// first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, created, or parsed.
    pub fn load_or_init(data_root: &Path) -> Result<Self> {
        let path = conf_path(data_root);
        if !path.is_file() {
            let config = Self::default();
            config.save(data_root)?;
            return Ok(config);
        }

        let content =
            std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parse configuration content.
    ///
    /// # Errors
    ///
    /// Returns an error on a line without `=` or an invalid `edit` value.
    fn parse(content: &str) -> Result<Self> {
        let mut config = Self::default();
        for (line_num, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let Some((key, value)) = trimmed.split_once('=') else {
                bail!("invalid line {}: {}", line_num + 1, trimmed);
            };
            match key {
                "version" => config.version = value.to_string(),
                "edit" => {
                    config.edit_mode = match value {
                        "true" => true,
                        "false" => false,
                        other => bail!("invalid edit value at line {}: {}", line_num + 1, other),
                    };
                }
                _ => config.extra.push((key.to_string(), value.to_string())),
            }
        }
        Ok(config)
    }

    /// Write the configuration back to `data_root`, creating the directory
    /// if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, data_root: &Path) -> Result<()> {
        std::fs::create_dir_all(data_root)
            .with_context(|| format!("creating {}", data_root.display()))?;
        let path = conf_path(data_root);

        let mut content = format!("version={}\nedit={}\n", self.version, self.edit_mode);
        for (key, value) in &self.extra {
            content.push_str(&format!("{key}={value}\n"));
        }

        std::fs::write(&path, content).with_context(|| format!("writing {}", path.display()))
    }
}

fn conf_path(data_root: &Path) -> PathBuf {
    data_root.join(CONF_FILE)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn first_use_creates_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = VersionConfig::load_or_init(dir.path()).unwrap();
        assert_eq!(config.version, "default");
        assert!(!config.edit_mode);
        assert!(dir.path().join(CONF_FILE).is_file());
    }

    #[test]
    fn load_reads_stored_version() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONF_FILE), "version=work\nedit=true\n").unwrap();
        let config = VersionConfig::load_or_init(dir.path()).unwrap();
        assert_eq!(config.version, "work");
        assert!(config.edit_mode);
    }

    #[test]
    fn save_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = VersionConfig::load_or_init(dir.path()).unwrap();
        config.version = "laptop".to_string();
        config.save(dir.path()).unwrap();

        let reread = VersionConfig::load_or_init(dir.path()).unwrap();
        assert_eq!(reread.version, "laptop");
    }

    #[test]
    fn unknown_keys_survive_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONF_FILE),
            "version=default\nfuture_key=42\n",
        )
        .unwrap();
        let config = VersionConfig::load_or_init(dir.path()).unwrap();
        config.save(dir.path()).unwrap();

        let content = std::fs::read_to_string(dir.path().join(CONF_FILE)).unwrap();
        assert!(content.contains("future_key=42"));
    }

    #[test]
    fn comments_and_blank_lines_ignored() {
        let config = VersionConfig::parse("# comment\n\nversion=x\n").unwrap();
        assert_eq!(config.version, "x");
    }

    #[test]
    fn line_without_equals_is_rejected() {
        assert!(VersionConfig::parse("bogus\n").is_err());
    }

    #[test]
    fn invalid_edit_value_is_rejected() {
        assert!(VersionConfig::parse("edit=maybe\n").is_err());
    }
}
