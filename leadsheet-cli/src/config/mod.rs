//! Configuration
//!
//! Read from TOML (`--config <path>` or `<config dir>/leadsheet/config.toml`),
//! then overridden from the environment. Every field has a default, so an
//! empty or missing file is a valid configuration.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ingest::Dialect;
use crate::pipeline::IngestionSettings;
use crate::records::metrics::DEFAULT_WINDOW;
use crate::services::inference::{Classifier, DEFAULT_SAMPLE_SIZE, Role, RoleOverride, RoleProfile};

pub const ENV_SOURCE_URL: &str = "LEADSHEET_SOURCE_URL";
pub const ENV_ENABLED: &str = "LEADSHEET_ENABLED";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Spreadsheet link; ingestion is idle without one
    pub source_url: Option<String>,
    pub enabled: bool,
    /// Data rows sampled per column when scoring content
    pub sample_size: usize,
    /// Most recent rows kept by the metrics builder
    pub metrics_window: usize,
    pub request_timeout_secs: u64,
    pub dialect: Dialect,
    pub classifier: Classifier,
    pub roles: RoleOverrides,
}

/// Keyword overrides per profile, keyed by role name (`[roles.leads.name]`)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RoleOverrides {
    pub leads: HashMap<Role, RoleOverride>,
    pub metrics: HashMap<Role, RoleOverride>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_url: None,
            enabled: true,
            sample_size: DEFAULT_SAMPLE_SIZE,
            metrics_window: DEFAULT_WINDOW,
            request_timeout_secs: 30,
            dialect: Dialect::default(),
            classifier: Classifier::default(),
            roles: RoleOverrides::default(),
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when it exists, then
    /// apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    log::debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML")
    }

    /// `<config dir>/leadsheet/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("leadsheet").join("config.toml"))
    }

    /// Apply `LEADSHEET_*` overrides using `lookup` to read variables
    pub fn apply_overrides<L>(&mut self, lookup: L) -> Result<()>
    where
        L: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_SOURCE_URL) {
            log::debug!("{} overrides source_url", ENV_SOURCE_URL);
            self.source_url = Some(url);
        }
        if let Some(value) = lookup(ENV_ENABLED) {
            self.enabled = parse_flag(&value)
                .with_context(|| format!("Invalid value for {}", ENV_ENABLED))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_size == 0 {
            bail!("sample_size must be at least 1");
        }
        if self.metrics_window == 0 {
            bail!("metrics_window must be at least 1");
        }
        if self.dialect.delimiter == self.dialect.quote {
            bail!(
                "dialect delimiter and quote must differ (both are {:?})",
                self.dialect.delimiter
            );
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn settings(&self) -> IngestionSettings {
        IngestionSettings {
            source: self.source_url.clone(),
            enabled: self.enabled,
            dialect: self.dialect,
        }
    }

    pub fn lead_profile(&self) -> RoleProfile {
        RoleProfile::leads()
            .with_sample_size(self.sample_size)
            .with_classifier(self.classifier.clone())
            .with_overrides(&self.roles.leads)
    }

    pub fn metrics_profile(&self) -> RoleProfile {
        RoleProfile::metrics()
            .with_sample_size(self.sample_size)
            .with_classifier(self.classifier.clone())
            .with_overrides(&self.roles.metrics)
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected true or false, got '{}'", other),
    }
}
