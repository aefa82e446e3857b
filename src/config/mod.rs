//! Runtime configuration.
//!
//! Every field is resolved through [`resolve_first`] over the same layer
//! order: CLI flags, then `~/.commitra.toml`, then environment variables,
//! then the built-in default.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::llm::types::DEFAULT_TIMEOUT_MS;
use crate::providers::AnthropicStrategy;

pub const CONFIG_FILE_NAME: &str = ".commitra.toml";
pub const DEFAULT_PROVIDER: &str = "groq";
pub const DEFAULT_GENERATE: u32 = 1;
pub const DEFAULT_LOCALE: &str = "en";

const PROXY_ENV_VARS: [&str; 4] = ["https_proxy", "HTTPS_PROXY", "http_proxy", "HTTP_PROXY"];

/// Return the first present value, in source order.
pub fn resolve_first<T, I>(sources: I) -> Option<T>
where
    I: IntoIterator<Item = Option<T>>,
{
    sources.into_iter().flatten().next()
}

/// One source of configuration values. Absent fields defer to lower layers.
///
/// The same shape serves the CLI overrides, the config file and the
/// environment. File keys for secrets use their environment variable names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConfigLayer {
    pub provider: Option<String>,
    pub model: Option<String>,
    #[serde(rename = "OPENAI_API_KEY")]
    pub openai_api_key: Option<String>,
    #[serde(rename = "GROQ_API_KEY")]
    pub groq_api_key: Option<String>,
    #[serde(rename = "ANTHROPIC_API_KEY")]
    pub anthropic_api_key: Option<String>,
    #[serde(rename = "LOCAL_MODEL_URL")]
    pub local_model_url: Option<String>,
    pub timeout: Option<u64>,
    pub proxy: Option<String>,
    pub generate: Option<u32>,
    pub locale: Option<String>,
    pub anthropic_strategy: Option<String>,
}

impl ConfigLayer {
    /// Read a TOML config file. A missing file is an empty layer.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "config file not found");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::ParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    /// Read the process environment.
    ///
    /// Empty variables count as unset; unparseable numbers are logged and
    /// skipped so the next layer applies.
    pub fn from_env() -> Self {
        Self {
            provider: env_string("COMMITRA_PROVIDER"),
            model: env_string("COMMITRA_MODEL"),
            openai_api_key: env_string("OPENAI_API_KEY"),
            groq_api_key: env_string("GROQ_API_KEY"),
            anthropic_api_key: env_string("ANTHROPIC_API_KEY"),
            local_model_url: env_string("LOCAL_MODEL_URL"),
            timeout: env_number("COMMITRA_TIMEOUT"),
            proxy: resolve_first(PROXY_ENV_VARS.iter().map(|name| env_string(name))),
            generate: env_number("COMMITRA_GENERATE"),
            locale: env_string("COMMITRA_LOCALE"),
            anthropic_strategy: env_string("COMMITRA_ANTHROPIC_STRATEGY"),
        }
    }
}

fn env_string(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_number<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env_string(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring invalid {name} value: {raw}");
            None
        }
    }
}

/// Default config file location: `~/.commitra.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILE_NAME))
}

/// Fully resolved configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub provider: String,
    pub model: Option<String>,
    pub openai_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub local_model_url: Option<String>,
    pub timeout_ms: u64,
    pub proxy: Option<String>,
    /// Number of commit suggestions requested.
    pub generate: u32,
    pub locale: String,
    pub anthropic_strategy: AnthropicStrategy,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            model: None,
            openai_api_key: None,
            groq_api_key: None,
            anthropic_api_key: None,
            local_model_url: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            proxy: None,
            generate: DEFAULT_GENERATE,
            locale: DEFAULT_LOCALE.to_string(),
            anthropic_strategy: AnthropicStrategy::default(),
        }
    }
}

impl RuntimeConfig {
    /// Merge layers, highest precedence first, over the built-in defaults.
    pub fn from_layers(layers: &[ConfigLayer]) -> Result<Self, ConfigError> {
        let pick = |field: fn(&ConfigLayer) -> Option<String>| {
            resolve_first(layers.iter().map(field))
        };
        let defaults = Self::default();

        let anthropic_strategy = match pick(|l| l.anthropic_strategy.clone()) {
            Some(raw) => raw.parse::<AnthropicStrategy>().map_err(|_| ConfigError::InvalidValue {
                key: "anthropic_strategy",
                value: raw,
            })?,
            None => defaults.anthropic_strategy,
        };

        Ok(Self {
            provider: pick(|l| l.provider.clone()).unwrap_or(defaults.provider),
            model: pick(|l| l.model.clone()),
            openai_api_key: pick(|l| l.openai_api_key.clone()),
            groq_api_key: pick(|l| l.groq_api_key.clone()),
            anthropic_api_key: pick(|l| l.anthropic_api_key.clone()),
            local_model_url: pick(|l| l.local_model_url.clone()),
            timeout_ms: resolve_first(layers.iter().map(|l| l.timeout))
                .unwrap_or(defaults.timeout_ms),
            proxy: pick(|l| l.proxy.clone()),
            generate: resolve_first(layers.iter().map(|l| l.generate))
                .unwrap_or(defaults.generate),
            locale: pick(|l| l.locale.clone()).unwrap_or(defaults.locale),
            anthropic_strategy,
        })
    }

    /// Resolve from CLI overrides, the config file (if any) and the environment.
    pub fn load(cli: ConfigLayer, config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match config_path {
            Some(path) => ConfigLayer::from_file(path)?,
            None => ConfigLayer::default(),
        };
        Self::from_layers(&[cli, file, ConfigLayer::from_env()])
    }
}
