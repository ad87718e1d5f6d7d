//! Shared configuration loader for the docweave toolchain.
//!
//! `defaults/docweave.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`DocweaveConfig`].
//!
//! Style overrides are plain JSON documents shaped like the `[style]` table. They are
//! merged key by key over whatever the TOML layers produced; a document that does not
//! fit the style schema is dropped as a whole and the rest of the configuration loads
//! as if it had never been given.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use docweave_babel::diagram::ImageFormat;
use docweave_babel::{PipelineError, StyleConfig};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_TOML: &str = include_str!("../defaults/docweave.default.toml");

/// Top-level configuration consumed by docweave applications.
#[derive(Debug, Clone, Deserialize)]
pub struct DocweaveConfig {
    pub style: StyleConfig,
    pub services: ServicesConfig,
    pub diagram: DiagramConfig,
    pub history: HistoryConfig,
}

/// Endpoints and HTTP knobs for the remote collaborators.
#[derive(Debug, Clone, Deserialize)]
pub struct ServicesConfig {
    pub drive_api: String,
    pub drive_upload_api: String,
    pub docs_api: String,
    pub oauth_auth_url: String,
    pub oauth_token_url: String,
    pub kroki_url: String,
    pub reader_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl ServicesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiagramConfig {
    pub format: String,
}

impl DiagramConfig {
    pub fn image_format(&self) -> Result<ImageFormat, PipelineError> {
        self.format.parse()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    pub list_limit: usize,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
    /// JSON documents already wrapped under `style`, applied in order at build time.
    style_overrides: Vec<String>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self {
            builder,
            style_overrides: Vec::new(),
        }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer a style override file. Absent, unreadable or non-object files are skipped.
    pub fn with_style_overrides(self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no style overrides");
            return self;
        }
        match fs::read_to_string(path) {
            Ok(text) => self.with_style_json(&text),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "could not read style overrides");
                self
            }
        }
    }

    /// Layer style overrides given as a JSON object shaped like the `[style]` table.
    pub fn with_style_json(mut self, json: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(json) {
            Ok(value @ serde_json::Value::Object(_)) => {
                let wrapped = serde_json::json!({ "style": value });
                self.style_overrides.push(wrapped.to_string());
            }
            Ok(_) => warn!("style overrides must be a JSON object, ignoring"),
            Err(err) => warn!(error = %err, "style overrides are not valid JSON, ignoring"),
        }
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<DocweaveConfig, ConfigError> {
        if self.style_overrides.is_empty() {
            return self.builder.build()?.try_deserialize();
        }

        let mut layered = self.builder.clone();
        for json in &self.style_overrides {
            layered = layered.add_source(File::from_str(json, FileFormat::Json));
        }
        match layered.build().and_then(Config::try_deserialize) {
            Ok(config) => Ok(config),
            Err(err) => {
                warn!(error = %err, "style overrides do not fit the style schema, ignoring");
                self.builder.build()?.try_deserialize()
            }
        }
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<DocweaveConfig, ConfigError> {
    Loader::new().build()
}
