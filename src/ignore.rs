//! Ignore-list boundary.
//! The engine has no opinion on which files are off limits; it only consults
//! an [`IgnorePolicy`] before touching a source. The default implementation
//! skips in-progress download suffixes and the engine's own transient files.

use std::path::Path;

use tracing::debug;

use crate::utils::TEMP_PREFIX;

pub trait IgnorePolicy {
    fn should_ignore(&self, path: &Path) -> bool;
}

/// Extension-based ignore list, configurable via `Config::ignore_suffixes`.
#[derive(Debug, Clone)]
pub struct SuffixIgnore {
    suffixes: Vec<String>,
}

impl SuffixIgnore {
    pub fn new(suffixes: Vec<String>) -> Self {
        Self {
            suffixes: suffixes.into_iter().map(|s| s.to_ascii_lowercase()).collect(),
        }
    }
}

impl Default for SuffixIgnore {
    fn default() -> Self {
        Self::new(vec!["part".into(), "tmp".into(), "crdownload".into()])
    }
}

impl IgnorePolicy for SuffixIgnore {
    fn should_ignore(&self, path: &Path) -> bool {
        // Never relocate our own staged temp files.
        if let Some(name) = path.file_name().and_then(|s| s.to_str())
            && name.starts_with(TEMP_PREFIX)
        {
            debug!(path = %path.display(), "ignoring internal transient file");
            return true;
        }

        if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
            let ext = ext.to_ascii_lowercase();
            if self.suffixes.iter().any(|s| *s == ext) {
                debug!(path = %path.display(), ext, "ignoring by suffix");
                return true;
            }
        }
        false
    }
}

/// Policy that never ignores anything; useful for callers that filter upstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreNothing;

impl IgnorePolicy for IgnoreNothing {
    fn should_ignore(&self, _path: &Path) -> bool {
        false
    }
}
