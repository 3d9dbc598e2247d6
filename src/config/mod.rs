//! Run configuration
//!
//! Built once at startup and passed by reference into every component.
//! Sources, lowest to highest precedence:
//!
//! 1. Built-in defaults
//! 2. Optional JSON config file (a missing file is not an error)
//! 3. Environment variables
//! 4. CLI overrides (applied by the caller)

mod errors;

pub use errors::{ConfigError, ConfigResult};

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::observability::Severity;

/// Comma-separated target list
pub const ENV_DATABASES: &str = "RELCHECK_DATABASES";
/// Directory holding target databases
pub const ENV_DATA_DIR: &str = "RELCHECK_DATA_DIR";
/// Minimum log severity
pub const ENV_LOG: &str = "RELCHECK_LOG";
/// Generative fallback flag
pub const ENV_USE_LLM: &str = "USE_LLM";
/// Generative backend credential
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// Generative model identifier
pub const ENV_OPENAI_MODEL: &str = "OPENAI_MODEL";
/// Generative backend base URL
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Generative backend settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiSettings {
    /// API key; generation falls back to rules without it
    pub api_key: Option<String>,
    /// Model identifier
    pub model: String,
    /// API base URL, without trailing slash
    pub base_url: String,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Complete run configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Ordered target identifiers; read-only once loaded
    pub targets: Vec<String>,
    /// Directory holding target databases
    pub data_dir: PathBuf,
    /// Whether to try the generative backend first
    pub use_llm: bool,
    /// Generative backend settings
    pub openai: OpenAiSettings,
    /// Report output directory
    pub out_dir: PathBuf,
    /// Minimum log severity
    pub log_level: Severity,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            data_dir: PathBuf::from("."),
            use_llm: true,
            openai: OpenAiSettings::default(),
            out_dir: PathBuf::from("reports"),
            log_level: Severity::Info,
        }
    }
}

/// Target list as written in a config file: `"a, b"` or `["a", "b"]`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TargetSpec {
    List(Vec<String>),
    Csv(String),
}

/// On-disk config file layout. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    databases: Option<TargetSpec>,
    #[serde(default)]
    data_dir: Option<PathBuf>,
    #[serde(default)]
    use_llm: Option<bool>,
    #[serde(default)]
    openai_api_key: Option<String>,
    #[serde(default)]
    openai_model: Option<String>,
    #[serde(default)]
    openai_base_url: Option<String>,
    #[serde(default)]
    out_dir: Option<PathBuf>,
    #[serde(default)]
    log_level: Option<String>,
}

impl Config {
    /// Load from an optional file, then apply the process environment
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load from a JSON file over the defaults
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parse config JSON over the defaults
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let file: ConfigFile = serde_json::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;

        let mut config = Self::default();
        if let Some(spec) = file.databases {
            config.targets = match spec {
                TargetSpec::List(items) => clean_targets(items.iter().map(String::as_str)),
                TargetSpec::Csv(csv) => parse_targets(&csv),
            };
        }
        if let Some(dir) = file.data_dir {
            config.data_dir = dir;
        }
        if let Some(flag) = file.use_llm {
            config.use_llm = flag;
        }
        if let Some(key) = file.openai_api_key {
            config.openai.api_key = non_blank(key);
        }
        if let Some(model) = file.openai_model {
            config.openai.model = model;
        }
        if let Some(url) = file.openai_base_url {
            config.openai.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(dir) = file.out_dir {
            config.out_dir = dir;
        }
        if let Some(level) = file.log_level {
            config.log_level = parse_level("log_level", &level)?;
        }
        Ok(config)
    }

    /// Apply environment overrides through a lookup function
    pub fn apply_env<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(csv) = lookup(ENV_DATABASES) {
            self.targets = parse_targets(&csv);
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(flag) = lookup(ENV_USE_LLM) {
            self.use_llm = flag.trim().eq_ignore_ascii_case("true");
        }
        if let Some(key) = lookup(ENV_OPENAI_API_KEY) {
            self.openai.api_key = non_blank(key);
        }
        if let Some(model) = lookup(ENV_OPENAI_MODEL) {
            self.openai.model = model;
        }
        if let Some(url) = lookup(ENV_OPENAI_BASE_URL) {
            self.openai.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(level) = lookup(ENV_LOG) {
            self.log_level = parse_level(ENV_LOG, &level)?;
        }
        Ok(())
    }

    /// Replace the target list with a single target
    pub fn with_target(mut self, target: Option<String>) -> Self {
        if let Some(target) = target {
            self.targets = parse_targets(&target);
        }
        self
    }

    /// Whether at least one target is configured
    pub fn has_targets(&self) -> bool {
        !self.targets.is_empty()
    }
}

/// Split a comma-separated target list: trimmed, empties dropped, order kept.
pub fn parse_targets(csv: &str) -> Vec<String> {
    clean_targets(csv.split(','))
}

fn clean_targets<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    items
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_level(key: &'static str, value: &str) -> ConfigResult<Severity> {
    value
        .parse()
        .map_err(|message| ConfigError::InvalidValue { key, message })
}
