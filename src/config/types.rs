//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::{JOURNAL_FILE_NAME, paths};

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Runtime configuration for the relocation engine.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root for engine state: journal and backups live under here
    pub data_dir: PathBuf,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// If true, print actions but do not modify the filesystem
    pub dry_run: bool,
    /// If true, preserve permissions and timestamps on the destination
    pub preserve_metadata: bool,
    /// File extensions the default ignore policy skips
    pub ignore_suffixes: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: paths::default_data_dir(),
            log_level: LogLevel::Normal,
            log_file: None,
            dry_run: false,
            preserve_metadata: false,
            ignore_suffixes: vec!["part".into(), "tmp".into(), "crdownload".into()],
        }
    }
}

impl Config {
    /// The journal file sits directly under the data directory.
    pub fn journal_path(&self) -> PathBuf {
        self.data_dir.join(JOURNAL_FILE_NAME)
    }

    /// Timestamped pre-move backups land here.
    pub fn backup_root(&self) -> PathBuf {
        self.data_dir.join("backup").join("file_backups")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loglevel_parses_aliases() {
        assert_eq!(LogLevel::parse("ERROR"), Some(LogLevel::Quiet));
        assert_eq!(LogLevel::parse("verbose"), Some(LogLevel::Info));
        assert_eq!(LogLevel::parse("trace"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("bogus"), None);
    }

    #[test]
    fn derived_paths_hang_off_data_dir() {
        let cfg = Config {
            data_dir: PathBuf::from("/var/lib/tidy_move"),
            ..Config::default()
        };
        assert_eq!(cfg.journal_path(), PathBuf::from("/var/lib/tidy_move/rollback_log"));
        assert_eq!(
            cfg.backup_root(),
            PathBuf::from("/var/lib/tidy_move/backup/file_backups")
        );
    }
}
