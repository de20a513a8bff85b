use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the sdss setup manager.
#[derive(Parser, Debug)]
#[command(
    name = "sdss",
    about = "Stow-based dotfiles setup manager with versioned alternates",
    version
)]
pub struct Cli {
    /// The selected subcommand.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared across all subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Override the sdss data directory
    #[arg(long, global = true)]
    pub data_dir: Option<std::path::PathBuf>,

    /// Override the symlink destination directory
    #[arg(long, global = true)]
    pub target_dir: Option<std::path::PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Clone a dotfiles repository into the repos directory
    Clone {
        /// Git URL of the repository to clone
        url: String,
    },
    /// Activate a package, or every package in a repository
    Activate {
        /// Repository name
        repo: String,
        /// Package name; all packages in the repository when omitted
        package: Option<String>,
    },
    /// Deactivate a package, or every package in a repository
    Deactivate {
        /// Repository name
        repo: String,
        /// Package name; all packages in the repository when omitted
        package: Option<String>,
    },
    /// List packages in a repository
    Packages {
        /// Repository name
        repo: String,
    },
    /// List repositories
    Repos,
    /// Refresh package metadata and deployment trees
    Refresh,
    /// Switch the globally selected version
    ChangeVersion {
        /// The version tag to select
        version: String,
    },
    /// Toggle edit mode (stow source trees instead of deployment trees)
    Edit,
    /// Print version information
    Version,
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_refresh() {
        let cli = Cli::parse_from(["sdss", "refresh"]);
        assert!(matches!(cli.command, Command::Refresh));
    }

    #[test]
    fn parse_activate_package() {
        let cli = Cli::parse_from(["sdss", "activate", "base", "vim"]);
        match cli.command {
            Command::Activate { repo, package } => {
                assert_eq!(repo, "base");
                assert_eq!(package.as_deref(), Some("vim"));
            }
            _ => panic!("expected Activate"),
        }
    }

    #[test]
    fn parse_activate_repo() {
        let cli = Cli::parse_from(["sdss", "activate", "base"]);
        match cli.command {
            Command::Activate { repo, package } => {
                assert_eq!(repo, "base");
                assert!(package.is_none());
            }
            _ => panic!("expected Activate"),
        }
    }

    #[test]
    fn parse_deactivate_package() {
        let cli = Cli::parse_from(["sdss", "deactivate", "base", "zsh"]);
        match cli.command {
            Command::Deactivate { repo, package } => {
                assert_eq!(repo, "base");
                assert_eq!(package.as_deref(), Some("zsh"));
            }
            _ => panic!("expected Deactivate"),
        }
    }

    #[test]
    fn parse_change_version() {
        let cli = Cli::parse_from(["sdss", "change-version", "work"]);
        match cli.command {
            Command::ChangeVersion { version } => assert_eq!(version, "work"),
            _ => panic!("expected ChangeVersion"),
        }
    }

    #[test]
    fn parse_dry_run() {
        let cli = Cli::parse_from(["sdss", "-d", "refresh"]);
        assert!(cli.global.dry_run);
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::parse_from(["sdss", "-v", "refresh"]);
        assert!(cli.verbose);
    }

    #[test]
    fn parse_data_dir_override() {
        let cli = Cli::parse_from(["sdss", "--data-dir", "/tmp/sdss", "repos"]);
        assert_eq!(
            cli.global.data_dir,
            Some(std::path::PathBuf::from("/tmp/sdss"))
        );
    }

    #[test]
    fn parse_two_commands_is_usage_error() {
        let result = Cli::try_parse_from(["sdss", "refresh", "repos"]);
        assert!(result.is_err(), "extra positional command should not parse");
    }

    #[test]
    fn parse_no_command_is_usage_error() {
        let result = Cli::try_parse_from(["sdss"]);
        assert!(result.is_err(), "a command is required");
    }
}
