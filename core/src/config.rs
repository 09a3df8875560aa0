//! Layered runtime configuration
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML file
//! (`river.toml` in the working directory, `RIVER_CONFIG_PATH`, or an explicit
//! path), `RIVER_*` environment variables (a `.env` file is loaded first), and
//! finally overrides set on the [`ConfigBuilder`].

use anyhow::{bail, Context, Result};
use config::{Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::interpreter::DEFAULT_MAX_STEPS;

const DEFAULT_CONFIG_FILE: &str = "river.toml";
const ENV_PREFIX: &str = "RIVER";
const CONFIG_PATH_VAR: &str = "RIVER_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Execution-step budget shared by the whole run
    pub max_steps: usize,
    /// Only accept program files ending in `.rv`
    pub require_extension: bool,
    /// Print the journey trace and final streams after a run
    pub show_trace: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            require_extension: true,
            show_trace: false,
        }
    }
}

impl Config {
    /// Load from defaults, file and environment with no overrides
    pub fn load() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    fn validate(&self) -> Result<()> {
        if self.max_steps == 0 {
            bail!("max_steps must be at least 1");
        }
        Ok(())
    }
}

/// Collects overrides before the layered load
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config_path: Option<PathBuf>,
    max_steps: Option<usize>,
    require_extension: Option<bool>,
    show_trace: Option<bool>,
    read_env: bool,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            config_path: None,
            max_steps: None,
            require_extension: None,
            show_trace: None,
            read_env: true,
        }
    }
}

impl ConfigBuilder {
    /// Explicit config file; it must exist when given
    pub fn config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    pub fn max_steps(mut self, max_steps: Option<usize>) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn require_extension(mut self, require: Option<bool>) -> Self {
        self.require_extension = require;
        self
    }

    pub fn show_trace(mut self, show: Option<bool>) -> Self {
        self.show_trace = show;
        self
    }

    /// Skip `.env` and `RIVER_*` variables (including `RIVER_CONFIG_PATH`)
    pub fn ignore_env(mut self) -> Self {
        self.read_env = false;
        self
    }

    pub fn build(self) -> Result<Config> {
        if self.read_env {
            dotenvy::dotenv().ok();
        }

        let defaults = Config::default();
        let mut builder = config::Config::builder()
            .set_default("max_steps", defaults.max_steps as i64)?
            .set_default("require_extension", defaults.require_extension)?
            .set_default("show_trace", defaults.show_trace)?;

        let explicit_path = self.config_path.clone().or_else(|| {
            self.read_env
                .then(|| std::env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from))
                .flatten()
        });
        builder = match &explicit_path {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file not found: {}", path.display());
                }
                builder.add_source(File::from(path.as_path()).format(FileFormat::Toml))
            }
            None => builder.add_source(
                File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false),
            ),
        };

        if self.read_env {
            builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));
        }

        if let Some(max_steps) = self.max_steps {
            builder = builder.set_override("max_steps", max_steps as i64)?;
        }
        if let Some(require) = self.require_extension {
            builder = builder.set_override("require_extension", require)?;
        }
        if let Some(show) = self.show_trace {
            builder = builder.set_override("show_trace", show)?;
        }

        let config: Config = builder
            .build()
            .context("Failed to read configuration sources")?
            .try_deserialize()
            .context("Invalid configuration")?;
        config.validate()?;

        tracing::debug!(?config, source = ?explicit_path, "configuration loaded");
        Ok(config)
    }
}
