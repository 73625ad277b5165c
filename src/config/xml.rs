//! XML configuration support.
//! - Loads settings from config.xml (quick_xml).
//! - Creates a secure template if missing (unless TIDY_MOVE_CONFIG is set).
//!
//! Notes:
//! - This module only reads/writes the config file; directory validation
//!   happens elsewhere.
//! - Unknown XML fields fail the load (deny_unknown_fields) so typos surface
//!   instead of being silently ignored.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use tracing::{debug, info};

use super::paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
use crate::config::types::{Config, LogLevel};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    data_dir: Option<String>,
    log_level: Option<String>,
    log_file: Option<String>,
    preserve_metadata: Option<bool>,
    /// Comma-separated extensions the ignore policy should skip
    ignore_suffixes: Option<String>,
}

/// Parsed optional settings; only fields present in the file are `Some`.
#[derive(Debug, Default)]
pub struct XmlSettings {
    pub data_dir: Option<PathBuf>,
    pub log_level: Option<LogLevel>,
    pub log_file: Option<PathBuf>,
    pub preserve_metadata: Option<bool>,
    pub ignore_suffixes: Option<Vec<String>>,
}

impl XmlSettings {
    /// Fold these settings into a Config; unset fields keep their value.
    pub fn apply(&self, cfg: &mut Config) {
        if let Some(ref d) = self.data_dir {
            cfg.data_dir = d.clone();
        }
        if let Some(ref l) = self.log_level {
            cfg.log_level = l.clone();
        }
        if let Some(ref f) = self.log_file {
            cfg.log_file = Some(f.clone());
        }
        if let Some(p) = self.preserve_metadata {
            cfg.preserve_metadata = p;
        }
        if let Some(ref s) = self.ignore_suffixes {
            cfg.ignore_suffixes = s.clone();
        }
    }
}

/// Effective config file path: TIDY_MOVE_CONFIG wins, else the platform default.
pub fn config_file_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("TIDY_MOVE_CONFIG") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Read settings from the effective config path.
/// Returns None when the file is missing or unparseable (logged); a template
/// is created at the default location on first run.
pub fn load_settings() -> Option<XmlSettings> {
    let env_set = env::var_os("TIDY_MOVE_CONFIG").is_some();
    let cfg_path = config_file_path()?;

    if !cfg_path.exists() {
        if !env_set {
            let _ = create_template_config(&cfg_path);
        }
        return None;
    }

    let content = fs::read_to_string(&cfg_path).ok()?;
    match parse_settings(&content) {
        Ok(settings) => Some(settings),
        Err(e) => {
            debug!(path = %cfg_path.display(), error = %e, "failed to parse config.xml");
            None
        }
    }
}

fn parse_settings(content: &str) -> Result<XmlSettings> {
    let parsed: XmlConfig = from_xml_str(content).context("parse config xml")?;

    Ok(XmlSettings {
        data_dir: parsed
            .data_dir
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from),
        log_level: parsed
            .log_level
            .as_deref()
            .and_then(|s| LogLevel::parse(s.trim())),
        log_file: parsed
            .log_file
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from),
        preserve_metadata: parsed.preserve_metadata,
        ignore_suffixes: parsed.ignore_suffixes.as_deref().map(|s| {
            s.split(',')
                .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect()
        }),
    })
}

/// Create the default template config file with conservative permissions
/// (dir 0700, file 0600 on Unix). Refuses symlinked ancestors.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        anyhow::bail!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(parent, fs::Permissions::from_mode(0o700));
        }
    }

    let content = format!(
        "<!--\n  tidy_move configuration (XML)\n\n  Fields:\n    data_dir           -> directory holding the rollback journal and backups\n    log_level          -> quiet | normal | info | debug\n    log_file           -> path to log file (optional; stdout/stderr still used)\n    preserve_metadata  -> true/false: copy permissions + timestamps to moved files\n    ignore_suffixes    -> comma-separated extensions the mover skips\n\n  Notes:\n    - CLI flags override XML values.\n    - Set TIDY_MOVE_CONFIG to use a different file.\n-->\n<config>\n  <data_dir>{}</data_dir>\n  <log_level>normal</log_level>\n  <log_file>{}</log_file>\n  <preserve_metadata>false</preserve_metadata>\n  <ignore_suffixes>part,tmp,crdownload</ignore_suffixes>\n</config>\n",
        super::paths::default_data_dir().display(),
        default_log_path().display(),
    );

    fs::write(path, content)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }

    info!("Created template config at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let xml = "<config>\n  <data_dir>/var/lib/tm</data_dir>\n  <log_level>debug</log_level>\n  <log_file>/tmp/tm.log</log_file>\n  <preserve_metadata>true</preserve_metadata>\n  <ignore_suffixes>part, .TMP ,crdownload</ignore_suffixes>\n</config>";
        let s = parse_settings(xml).unwrap();
        assert_eq!(s.data_dir, Some(PathBuf::from("/var/lib/tm")));
        assert_eq!(s.log_level, Some(LogLevel::Debug));
        assert_eq!(s.preserve_metadata, Some(true));
        assert_eq!(
            s.ignore_suffixes,
            Some(vec!["part".into(), "tmp".into(), "crdownload".into()])
        );
    }

    #[test]
    fn empty_fields_are_none() {
        let xml = "<config>\n  <data_dir>  </data_dir>\n  <log_file></log_file>\n</config>";
        let s = parse_settings(xml).unwrap();
        assert!(s.data_dir.is_none());
        assert!(s.log_file.is_none());
    }

    #[test]
    fn unknown_fields_fail_the_load() {
        let xml = "<config><data_base>/x</data_base></config>";
        assert!(parse_settings(xml).is_err());
    }

    #[test]
    fn apply_overrides_only_present_fields() {
        let mut cfg = Config::default();
        let before_level = cfg.log_level.clone();
        let s = XmlSettings {
            data_dir: Some(PathBuf::from("/custom")),
            ..XmlSettings::default()
        };
        s.apply(&mut cfg);
        assert_eq!(cfg.data_dir, PathBuf::from("/custom"));
        assert_eq!(cfg.log_level, before_level);
    }
}
