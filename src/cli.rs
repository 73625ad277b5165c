//! CLI definition and parsing.
//! Defines Args/subcommands and provides parse() for command-line handling.
//!
//! Notes:
//! - CLI flags override config.xml values.
//! - --debug is a shorthand for --log-level debug.

use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use tidy_move::config::{Config, LogLevel};

/// Move files transactionally with verify, timestamped backups and undo.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Move files transactionally (copy, verify, delete) with rollback")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Override the data directory (journal + backups).
    #[arg(long, global = true, value_hint = ValueHint::DirPath, help = "Override the data directory (journal + backups)")]
    pub data_dir: Option<PathBuf>,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, global = true, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        global = true,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, global = true, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Print where tidy_move will look for the config file, then exit.
    #[arg(long, global = true, help = "Print the config file location used by tidy_move and exit")]
    pub print_config: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Move a file with copy-verify-delete semantics.
    Move {
        #[arg(value_name = "SOURCE", value_hint = ValueHint::FilePath)]
        source: PathBuf,

        #[arg(value_name = "DESTINATION", value_hint = ValueHint::AnyPath)]
        destination: PathBuf,

        /// Show what would be done, but do not modify files/directories.
        #[arg(long, help = "Show what would be done, but do not modify files/directories")]
        dry_run: bool,

        /// Preserve permissions and timestamps on the destination; slower.
        #[arg(long, help = "Preserve permissions and timestamps on the destination; slower")]
        preserve_metadata: bool,
    },

    /// Inspect or replay the rollback journal.
    Rollback {
        #[command(subcommand)]
        action: RollbackAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum RollbackAction {
    /// Undo the most recent committed move.
    Last,
    /// Re-apply the most recently undone move.
    Redo,
    /// Print every recorded operation in order.
    List,
    /// Wipe both stacks and truncate the journal.
    Clear,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(dd) = &self.data_dir {
            cfg.data_dir = dd.clone();
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Command::Move {
            dry_run,
            preserve_metadata,
            ..
        } = &self.command
        {
            if *dry_run {
                cfg.dry_run = true;
            }
            if *preserve_metadata {
                cfg.preserve_metadata = true;
            }
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
