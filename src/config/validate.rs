//! Config validation and normalization.
//! Ensures the data directory exists and is usable before the engine starts.

use std::fs;

use anyhow::{Context, Result, bail};
use tracing::{debug, error, info};

use crate::config::Config;

/// Validate the data directory: create it if missing, probe writability,
/// and canonicalize the path so journal/backup paths are stable.
pub fn validate_and_normalize(cfg: &mut Config) -> Result<()> {
    if cfg.data_dir.exists() && !cfg.data_dir.is_dir() {
        error!("Data dir exists but isn't a directory: {}", cfg.data_dir.display());
        bail!(
            "Data dir exists but isn't a directory: {}",
            cfg.data_dir.display()
        );
    }
    if !cfg.data_dir.exists() {
        fs::create_dir_all(&cfg.data_dir).with_context(|| {
            format!("Failed to create data directory '{}'", cfg.data_dir.display())
        })?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(&cfg.data_dir, fs::Permissions::from_mode(0o700));
        }
        info!("Created data directory: {}", cfg.data_dir.display());
    }

    // writability probe: create & remove a small temp file
    let probe = cfg
        .data_dir
        .join(format!(".tidy_move_probe_{}.tmp", std::process::id()));
    match fs::OpenOptions::new().create_new(true).write(true).open(&probe) {
        Ok(_) => {
            let _ = fs::remove_file(&probe);
            debug!("Data dir writable: {}", cfg.data_dir.display());
        }
        Err(e) => {
            error!("Cannot write to data dir '{}': {}", cfg.data_dir.display(), e);
            bail!(
                "Cannot write to data dir '{}': {}. Check directory permissions.",
                cfg.data_dir.display(),
                e
            );
        }
    }

    cfg.data_dir = fs::canonicalize(&cfg.data_dir).unwrap_or_else(|_| cfg.data_dir.clone());
    Ok(())
}
