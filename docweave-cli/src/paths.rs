//! Locations of docweave's local state.
//!
//! Everything lives in one state directory: `$DOCWEAVE_HOME` when set, `~/.docweave`
//! otherwise.

use std::env;
use std::path::PathBuf;

pub const HOME_ENV: &str = "DOCWEAVE_HOME";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePaths {
    root: PathBuf,
}

impl StatePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the state directory from the environment. `None` only when neither
    /// `$DOCWEAVE_HOME` nor a home directory is available.
    pub fn discover() -> Option<Self> {
        if let Some(root) = env::var_os(HOME_ENV).filter(|value| !value.is_empty()) {
            return Some(Self::new(root));
        }
        dirs::home_dir().map(|home| Self::new(home.join(".docweave")))
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    pub fn config(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    pub fn styles(&self) -> PathBuf {
        self.root.join("styles.json")
    }

    pub fn history(&self) -> PathBuf {
        self.root.join("history.json")
    }

    /// OAuth client secrets downloaded from the cloud console.
    pub fn credentials(&self) -> PathBuf {
        self.root.join("credentials.json")
    }

    pub fn token(&self) -> PathBuf {
        self.root.join("token.json")
    }
}
