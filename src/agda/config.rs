//! Configuration loading
//!
//! `defaults/lagda.default.toml` is embedded into the binary so that docs and runtime
//! behavior stay in sync. A site may carry its own `lagda.toml`; an explicit
//! `--config` file and command-line flags win over both.
//!
//! Precedence, lowest first: embedded defaults, `<root>/lagda.toml`, the explicit
//! file, then per-key overrides.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../../defaults/lagda.default.toml");

/// Name of the per-site configuration file picked up by [`Loader::with_site`].
pub const SITE_CONFIG: &str = "lagda.toml";

/// Top-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LagdaConfig {
    pub render: RenderConfig,
    pub highlight: HighlightConfig,
}

/// How literate pages are staged and handed to Agda.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub agda: String,
    pub stage_dir: PathBuf,
    pub html_dir: String,
    pub highlight: String,
    pub stdlib_root: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HighlightConfig {
    pub coalesce: bool,
    pub wrap_pre: bool,
}

/// Builds a [`LagdaConfig`] from the embedded defaults and whatever the user supplies.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Pick up `lagda.toml` from a site root if there is one.
    pub fn with_site(self, root: impl AsRef<Path>) -> Self {
        self.layer(root.as_ref().join(SITE_CONFIG), false)
    }

    /// Layer a file the user asked for by name; a missing file is an error.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref().to_path_buf(), true)
    }

    /// Use another Agda executable.
    pub fn with_agda(self, agda: Option<&str>) -> Result<Self, ConfigError> {
        self.override_with("render.agda", agda)
    }

    /// Point rewritten library links somewhere else.
    pub fn with_stdlib_root(self, root: Option<&str>) -> Result<Self, ConfigError> {
        self.override_with("render.stdlib_root", root)
    }

    pub fn build(self) -> Result<LagdaConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }

    fn layer(mut self, path: PathBuf, required: bool) -> Self {
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    fn override_with(mut self, key: &str, value: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(value) = value {
            self.builder = self.builder.set_override(key, value)?;
        }
        Ok(self)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults alone.
pub fn load_defaults() -> Result<LagdaConfig, ConfigError> {
    Loader::new().build()
}
