//! Domain-specific error types for the sdss engine.
//!
//! Internal modules return typed errors ([`MetadataError`], [`DeployError`])
//! while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise from reading or writing a package's `sdss.data` file.
#[derive(Error, Debug)]
pub enum MetadataError {
    /// A line could not be decoded into any known entry variant.
    ///
    /// Parsing stops at the first malformed line; the package is skipped
    /// rather than reconciled against guessed metadata.
    #[error("malformed entry in {} at line {}: {}", .file.display(), .line, .content)]
    Malformed {
        /// Path of the metadata file that failed to parse.
        file: PathBuf,
        /// 1-based line number of the offending line.
        line: usize,
        /// The raw line content.
        content: String,
    },

    /// An I/O error occurred while reading or writing the metadata file.
    #[error("{} {}: {}", .op, .file.display(), .source)]
    Io {
        /// Short description of the operation ("reading", "writing").
        op: &'static str,
        /// Path of the metadata file.
        file: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise from invoking the external symlink-farm tool.
#[derive(Error, Debug)]
pub enum DeployError {
    /// The stow binary is not available on `PATH`.
    #[error("stow is not available on PATH")]
    ToolNotFound,

    /// The tool was invoked but exited non-zero.
    #[error("stow {} failed for {}: {}", .action, .dir.display(), .message)]
    Tool {
        /// The deploy operation that failed ("apply", "remove", "resync").
        action: &'static str,
        /// The package subdirectory being stowed or unstowed.
        dir: PathBuf,
        /// Trimmed stderr from the tool.
        message: String,
    },

    /// The tool could not be spawned at all.
    #[error("failed to run stow: {0}")]
    Spawn(#[source] std::io::Error),
}
