use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Outcome of one recorded unit of work (a package refresh or activation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The operation completed successfully.
    Ok,
    /// The operation was skipped (e.g. already in the requested state).
    Skipped,
    /// The operation ran in dry-run mode.
    DryRun,
    /// The operation failed.
    Failed,
}

/// A recorded result for the end-of-run summary.
#[derive(Debug, Clone)]
struct SummaryEntry {
    name: String,
    status: Status,
    message: Option<String>,
}

/// Structured logger with dry-run awareness and summary collection.
///
/// All messages are always written to a persistent log file at
/// `$XDG_CACHE_HOME/sdss/sdss.log` (default `~/.cache/sdss/sdss.log`)
/// with timestamps and ANSI codes stripped, regardless of the verbose flag.
#[derive(Debug)]
pub struct Logger {
    verbose: bool,
    entries: std::cell::RefCell<Vec<SummaryEntry>>,
    log_file: Option<PathBuf>,
}

/// Return the log file path under `$XDG_CACHE_HOME/sdss/` (or `~/.cache/sdss/`).
fn log_file_path() -> Option<PathBuf> {
    let cache_dir = std::env::var("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".cache")
        });
    let dir = cache_dir.join("sdss");
    fs::create_dir_all(&dir).ok()?;
    Some(dir.join("sdss.log"))
}

/// Strip ANSI escape sequences from a string.
fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // Skip until 'm' (end of SGR sequence)
            for inner in chars.by_ref() {
                if inner == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

impl Logger {
    /// Create a logger, truncating the persistent log file for a fresh run.
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        let log_file = log_file_path();

        if let Some(ref path) = log_file {
            let header = format!(
                "==========================================\n\
                 sdss {} {}\n\
                 ==========================================\n",
                env!("CARGO_PKG_VERSION"),
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            );
            let _ = fs::write(path, header);
        }

        Self {
            verbose,
            entries: std::cell::RefCell::new(Vec::new()),
            log_file,
        }
    }

    /// Append a line to the persistent log file.
    fn write_to_file(&self, level: &str, msg: &str) {
        if let Some(ref path) = self.log_file
            && let Ok(mut f) = fs::OpenOptions::new().append(true).open(path)
        {
            let ts = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
            let clean = strip_ansi(msg);
            let _ = writeln!(f, "{ts} {level} {clean}");
        }
    }

    /// Return the log file path, if available.
    #[cfg(test)]
    fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Print an error message to stderr.
    pub fn error(&self, msg: &str) {
        eprintln!("\x1b[31mERROR\x1b[0m {msg}");
        self.write_to_file("ERR", msg);
    }

    /// Print a warning message to stderr.
    pub fn warn(&self, msg: &str) {
        eprintln!("\x1b[33mWARN\x1b[0m  {msg}");
        self.write_to_file("WRN", msg);
    }

    /// Print a stage header.
    pub fn stage(&self, msg: &str) {
        println!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m");
        self.write_to_file("STG", msg);
    }

    /// Print an informational message.
    pub fn info(&self, msg: &str) {
        println!("  {msg}");
        self.write_to_file("INF", msg);
    }

    /// Print a debug message (terminal output only when verbose).
    pub fn debug(&self, msg: &str) {
        if self.verbose {
            println!("  \x1b[2m{msg}\x1b[0m");
        }
        // Always log debug to file, even when not verbose on terminal
        self.write_to_file("DBG", msg);
    }

    /// Print a dry-run preview message.
    pub fn dry_run(&self, msg: &str) {
        println!("  \x1b[33m[DRY RUN]\x1b[0m {msg}");
        self.write_to_file("DRY", msg);
    }

    /// Record a per-package result for the summary.
    pub fn record(&self, name: &str, status: Status, message: Option<&str>) {
        self.entries.borrow_mut().push(SummaryEntry {
            name: name.to_string(),
            status,
            message: message.map(String::from),
        });
    }

    /// Number of recorded failures so far.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|e| e.status == Status::Failed)
            .count()
    }

    /// Print the summary of all recorded results.
    pub fn print_summary(&self) {
        let entries = self.entries.borrow();
        if entries.is_empty() {
            return;
        }

        println!();
        self.stage("Summary");

        let mut ok = 0u32;
        let mut skipped = 0u32;
        let mut dry_run = 0u32;
        let mut failed = 0u32;

        for entry in entries.iter() {
            let (icon, color) = match entry.status {
                Status::Ok => {
                    ok += 1;
                    ("✓", "\x1b[32m")
                }
                Status::Skipped => {
                    skipped += 1;
                    ("○", "\x1b[33m")
                }
                Status::DryRun => {
                    dry_run += 1;
                    ("~", "\x1b[33m")
                }
                Status::Failed => {
                    failed += 1;
                    ("✗", "\x1b[31m")
                }
            };

            let suffix = match &entry.message {
                Some(msg) => format!(" ({msg})"),
                None => String::new(),
            };

            let line = format!("{icon} {}{suffix}", entry.name);
            println!("  {color}{line}\x1b[0m");
            self.write_to_file("INF", &line);
        }

        println!();
        let total = ok + skipped + dry_run + failed;
        let totals = format!(
            "{total} packages: {ok} ok, {skipped} skipped, {dry_run} dry-run, {failed} failed"
        );
        println!(
            "  {total} packages: \x1b[32m{ok} ok\x1b[0m, \x1b[33m{skipped} skipped\x1b[0m, {dry_run} dry-run, \x1b[31m{failed} failed\x1b[0m"
        );
        self.write_to_file("INF", &totals);

        if let Some(path) = &self.log_file {
            println!("  \x1b[2mlog: {}\x1b[0m", path.display());
            self.write_to_file("INF", &format!("log: {}", path.display()));
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn logger_new() {
        let log = Logger::new(false);
        assert!(!log.verbose);
        assert!(log.entries.borrow().is_empty());
    }

    #[test]
    fn record_ok() {
        let log = Logger::new(false);
        log.record("base/vim", Status::Ok, None);
        let entries = log.entries.borrow();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "base/vim");
        assert_eq!(entries[0].status, Status::Ok);
    }

    #[test]
    fn record_with_message() {
        let log = Logger::new(false);
        log.record("base/zsh", Status::Skipped, Some("already active"));
        let entries = log.entries.borrow();
        assert_eq!(entries[0].message, Some("already active".to_string()));
    }

    #[test]
    fn failure_count_counts_only_failures() {
        let log = Logger::new(false);
        log.record("a", Status::Ok, None);
        log.record("b", Status::Failed, Some("boom"));
        log.record("c", Status::DryRun, None);
        assert_eq!(log.failure_count(), 1);
    }

    #[test]
    fn strip_ansi_removes_colors() {
        assert_eq!(strip_ansi("\x1b[31mERROR\x1b[0m hello"), "ERROR hello");
        assert_eq!(strip_ansi("no codes here"), "no codes here");
        assert_eq!(
            strip_ansi("\x1b[1;34m==>\x1b[0m \x1b[1mstage\x1b[0m"),
            "==> stage"
        );
    }

    #[test]
    fn log_file_is_created() {
        let log = Logger::new(false);
        if let Some(path) = log.log_path() {
            assert!(path.exists(), "log file should be created on Logger::new");
        }
    }
}
