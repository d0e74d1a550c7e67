//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. CONFIG_FILE environment variable
//! 3. Default: config/dev.toml
//!
//! The classification thresholds are deliberately NOT configurable; they
//! are fixed constants of the domain and live in `domain::measurement`.

use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

/// Row failure policy for batch runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnError {
    /// Drop the bad row, capture it in the reject log, keep going
    Skip,
    /// Fail the whole run on the first bad row
    Abort,
}

impl OnError {
    pub fn as_str(&self) -> &'static str {
        match self {
            OnError::Skip => "skip",
            OnError::Abort => "abort",
        }
    }
}

impl std::str::FromStr for OnError {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip" => Ok(OnError::Skip),
            "abort" => Ok(OnError::Abort),
            other => Err(format!("unknown on-error policy '{}' (expected skip or abort)", other)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Unique site identifier (e.g., "depot-7", "line-b")
    #[serde(default = "default_site_id")]
    pub id: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self { id: default_site_id() }
    }
}

fn default_site_id() -> String {
    "sorter".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    /// What to do when a row fails validation
    #[serde(default = "default_on_error")]
    pub on_error: OnError,
    /// Field delimiter of the input and output tables
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Directory for the JSONL reject capture
    #[serde(default = "default_reject_dir")]
    pub reject_dir: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            on_error: default_on_error(),
            delimiter: default_delimiter(),
            reject_dir: default_reject_dir(),
        }
    }
}

fn default_on_error() -> OnError {
    OnError::Skip
}

fn default_delimiter() -> char {
    ','
}

fn default_reject_dir() -> String {
    "logs".to_string()
}

/// Initial field values shown by the interactive form
#[derive(Debug, Clone, Deserialize)]
pub struct FormConfig {
    #[serde(default = "default_form_dimension_cm")]
    pub width: f64,
    #[serde(default = "default_form_dimension_cm")]
    pub height: f64,
    #[serde(default = "default_form_dimension_cm")]
    pub length: f64,
    #[serde(default = "default_form_mass_kg")]
    pub mass: f64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            width: default_form_dimension_cm(),
            height: default_form_dimension_cm(),
            length: default_form_dimension_cm(),
            mass: default_form_mass_kg(),
        }
    }
}

fn default_form_dimension_cm() -> f64 {
    50.0
}

fn default_form_mass_kg() -> f64 {
    10.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub form: FormConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    site_id: String,
    batch_on_error: OnError,
    batch_delimiter: char,
    batch_reject_dir: String,
    form_width_cm: f64,
    form_height_cm: f64,
    form_length_cm: f64,
    form_mass_kg: f64,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_id: default_site_id(),
            batch_on_error: default_on_error(),
            batch_delimiter: default_delimiter(),
            batch_reject_dir: default_reject_dir(),
            form_width_cm: default_form_dimension_cm(),
            form_height_cm: default_form_dimension_cm(),
            form_length_cm: default_form_dimension_cm(),
            form_mass_kg: default_form_mass_kg(),
            config_file: "default".to_string(),
        }
    }
}

impl Config {
    /// Determine config file path from args or environment
    pub fn resolve_config_path(args: &[String]) -> String {
        // Check for --config argument
        for (i, arg) in args.iter().enumerate() {
            if arg == "--config" {
                if let Some(path) = args.get(i + 1) {
                    return path.clone();
                }
            }
            if let Some(path) = arg.strip_prefix("--config=") {
                return path.to_string();
            }
        }

        // Check CONFIG_FILE environment variable
        if let Ok(path) = env::var("CONFIG_FILE") {
            return path;
        }

        // Default to dev.toml
        "config/dev.toml".to_string()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(Self {
            site_id: toml_config.site.id,
            batch_on_error: toml_config.batch.on_error,
            batch_delimiter: toml_config.batch.delimiter,
            batch_reject_dir: toml_config.batch.reject_dir,
            form_width_cm: toml_config.form.width,
            form_height_cm: toml_config.form.height,
            form_length_cm: toml_config.form.length,
            form_mass_kg: toml_config.form.mass,
            config_file: path.display().to_string(),
        })
    }

    /// Load configuration - resolves the path from args/env, falls back to
    /// defaults if the file is missing or malformed
    pub fn load(args: &[String]) -> Self {
        Self::load_from_path(&Self::resolve_config_path(args))
    }

    /// Load configuration from a specific path, falling back to defaults
    pub fn load_from_path(path: &str) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    // Getters for all config fields
    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    pub fn batch_on_error(&self) -> OnError {
        self.batch_on_error
    }

    pub fn batch_delimiter(&self) -> char {
        self.batch_delimiter
    }

    pub fn batch_reject_dir(&self) -> &str {
        &self.batch_reject_dir
    }

    pub fn form_width_cm(&self) -> f64 {
        self.form_width_cm
    }

    pub fn form_height_cm(&self) -> f64 {
        self.form_height_cm
    }

    pub fn form_length_cm(&self) -> f64 {
        self.form_length_cm
    }

    pub fn form_mass_kg(&self) -> f64 {
        self.form_mass_kg
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Builder method to override the row failure policy (CLI flag)
    pub fn with_on_error(mut self, on_error: OnError) -> Self {
        self.batch_on_error = on_error;
        self
    }

    /// Builder method to override the reject log directory
    pub fn with_reject_dir(mut self, dir: impl Into<String>) -> Self {
        self.batch_reject_dir = dir.into();
        self
    }
}
