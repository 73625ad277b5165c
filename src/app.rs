//! Application orchestrator.
//! Loads/merges config, initializes logging, installs signal handlers,
//! validates the data directory, opens the rollback manager, and dispatches
//! the requested command.

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, bail};
use tracing::{debug, error};

use tidy_move::config::{config_file_path, load_settings, validate_and_normalize};
use tidy_move::output as out;
use tidy_move::{
    Config, MoveOutcome, RollbackManager, SuffixIgnore, TransactionalMover, reconcile, shutdown,
};

use crate::cli::{Args, Command, RollbackAction};
use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handle --print-config before logging init
    if args.print_config {
        if let Ok(cfg_env) = std::env::var("TIDY_MOVE_CONFIG") {
            out::print_info(&format!("Using TIDY_MOVE_CONFIG (explicit):\n  {}\n", cfg_env));
            out::print_info("To override, unset TIDY_MOVE_CONFIG or set it to another file.");
            return Ok(());
        }
        match config_file_path() {
            Some(p) => {
                out::print_info(&format!("Default tidy_move config path:\n  {}\n", p.display()));
                if p.exists() {
                    out::print_info("A config file already exists at that location.");
                } else {
                    out::print_info(
                        "No config file exists there yet. Run any command to create a template.",
                    );
                }
            }
            None => {
                out::print_error("Could not determine a default config path.");
            }
        }
        return Ok(());
    }

    // Build config: XML values first, CLI flags win.
    let mut cfg = Config::default();
    if let Some(settings) = load_settings() {
        settings.apply(&mut cfg);
    }
    args.apply_overrides(&mut cfg);

    // Initialize logging and capture the guard so we can drop it on signal
    let guard_opt = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json)
        .context("initialize logging")?;

    let guard_slot = Arc::new(Mutex::new(guard_opt));
    {
        let guard_slot = Arc::clone(&guard_slot);
        ctrlc::set_handler(move || {
            shutdown::request();
            out::print_warn("Received interrupt; shutting down gracefully...");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take(); // drop guard here to flush tracing_appender
            }
        })
        .expect("failed to install signal handler");
    }

    if shutdown::is_requested() {
        return Ok(());
    }

    debug!("Starting tidy_move: {:?}", args);

    // Main run (so we can drop guard after)
    let result = (|| -> Result<()> {
        validate_and_normalize(&mut cfg)?;
        let mut rollback = RollbackManager::open(&cfg)
            .map_err(|e| anyhow::anyhow!("open rollback journal: {e}"))?;

        match &args.command {
            Command::Move {
                source,
                destination,
                ..
            } => {
                if let Some(parent) = destination.parent() {
                    let _ = reconcile::clean_orphan_temps(parent);
                }

                let ignore = SuffixIgnore::new(cfg.ignore_suffixes.clone());
                let mover = TransactionalMover::new(&cfg, &ignore);
                let report = mover.move_file(source, destination, &mut rollback);

                match report.outcome {
                    MoveOutcome::Committed => {
                        out::print_user(&format!(
                            "Moved '{}' -> '{}'",
                            report.source.display(),
                            report.destination.display()
                        ));
                        Ok(())
                    }
                    MoveOutcome::Skipped => {
                        if cfg.dry_run {
                            out::print_info(&format!(
                                "Dry-run: would move '{}' -> '{}'",
                                source.display(),
                                destination.display()
                            ));
                        } else {
                            out::print_info(&format!(
                                "Skipped '{}' (matches ignore policy)",
                                source.display()
                            ));
                        }
                        Ok(())
                    }
                    MoveOutcome::VerificationFailed => {
                        error!(
                            source = %source.display(),
                            destination = %destination.display(),
                            "Move failed verification"
                        );
                        out::print_error(&format!(
                            "Move of '{}' failed verification; source left in place.",
                            source.display()
                        ));
                        bail!("move did not commit");
                    }
                    MoveOutcome::IoError => {
                        out::print_error(&format!(
                            "Move of '{}' failed; source left in place. See log for details.",
                            source.display()
                        ));
                        bail!("move did not commit");
                    }
                }
            }

            Command::Rollback { action } => match action {
                RollbackAction::Last => {
                    if rollback.undo_depth() == 0 {
                        out::print_info("Nothing to undo.");
                        Ok(())
                    } else if rollback.undo_last_operation() {
                        out::print_success("Last operation undone.");
                        Ok(())
                    } else {
                        out::print_error("Undo failed; see log for details.");
                        bail!("undo failed");
                    }
                }
                RollbackAction::Redo => {
                    if rollback.redo_depth() == 0 {
                        out::print_info("Nothing to redo.");
                        Ok(())
                    } else if rollback.redo_last_undone() {
                        out::print_success("Last undone operation re-applied.");
                        Ok(())
                    } else {
                        out::print_error("Redo failed; see log for details.");
                        bail!("redo failed");
                    }
                }
                RollbackAction::List => {
                    let ops = rollback.operations();
                    if ops.is_empty() {
                        out::print_info("Journal is empty.");
                    }
                    for op in ops {
                        out::print_user(&op.to_string());
                    }
                    Ok(())
                }
                RollbackAction::Clear => {
                    rollback.clear();
                    out::print_success("Rollback journal cleared.");
                    Ok(())
                }
            },
        }
    })();

    // Ensure logs are flushed before exit
    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }

    result
}
