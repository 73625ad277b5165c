//! Config module (modularized).
//! Provides configuration types, default paths, XML loading, and validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel};
pub use validate::validate_and_normalize;
pub use xml::{XmlSettings, config_file_path, create_template_config, load_settings};

/// Journal file name under the data directory.
pub const JOURNAL_FILE_NAME: &str = "rollback_log";
