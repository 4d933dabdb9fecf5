use crate::app::CommandKind;
use crate::error::GgptError;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MAX_DIFF_LENGTH: usize = 5000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 90;
pub const TEMPERATURE: f64 = 0.3;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const MODEL_ENV: &str = "GGPT_MODEL";

/// Values given explicitly on the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub model: Option<String>,
}

/// Final resolved configuration for ggpt.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub model: String,
    pub api_base_url: String,
    pub max_diff_length: usize,
    pub max_tokens: Option<u32>,
    pub timeout: Duration,
    pub temperature: f64,
}

impl Config {
    /// Build the final config from CLI flags, environment, TOML file, and defaults.
    ///
    /// Precedence:
    ///   1. CLI flags (`--api-key`, `--model`)
    ///   2. Env vars `OPENAI_API_KEY`, `GGPT_MODEL`
    ///   3. TOML `~/.config/ggpt.toml`
    ///   4. Hardcoded defaults
    pub fn from_sources(overrides: &Overrides, command: CommandKind) -> Result<Self, GgptError> {
        let file_cfg = load_file_config().unwrap_or_default();
        Self::resolve(overrides, |name| env::var(name).ok(), file_cfg, command)
    }

    /// Pure resolution step behind [`Config::from_sources`].
    pub fn resolve<F>(
        overrides: &Overrides,
        env_lookup: F,
        file_cfg: FileConfig,
        command: CommandKind,
    ) -> Result<Self, GgptError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |v: String| if v.trim().is_empty() { None } else { Some(v) };

        let openai_api_key = overrides
            .api_key
            .clone()
            .and_then(non_blank)
            .or_else(|| env_lookup(API_KEY_ENV).and_then(non_blank))
            .or_else(|| file_cfg.openai_api_key.and_then(non_blank))
            .ok_or_else(|| GgptError::MissingCredential {
                command: command.as_str().to_string(),
            })?;

        let model = overrides
            .model
            .clone()
            .and_then(non_blank)
            .or_else(|| env_lookup(MODEL_ENV).and_then(non_blank))
            .or_else(|| file_cfg.model.and_then(non_blank))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let api_base_url = file_cfg
            .api_base_url
            .and_then(non_blank)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        // A zero timeout would fail every request.
        let timeout_secs = match file_cfg.timeout_secs {
            Some(0) => {
                log::warn!("Ignoring timeout_secs = 0, using {DEFAULT_TIMEOUT_SECS}");
                DEFAULT_TIMEOUT_SECS
            }
            Some(secs) => secs,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            openai_api_key,
            model,
            api_base_url,
            max_diff_length: file_cfg.max_diff_length.unwrap_or(DEFAULT_MAX_DIFF_LENGTH),
            max_tokens: file_cfg.max_tokens,
            timeout: Duration::from_secs(timeout_secs),
            temperature: TEMPERATURE,
        })
    }
}

/// Optional settings read from `~/.config/ggpt.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub openai_api_key: Option<String>,
    pub model: Option<String>,
    pub api_base_url: Option<String>,
    pub max_diff_length: Option<usize>,
    pub max_tokens: Option<u32>,
    pub timeout_secs: Option<u64>,
}

/// Return `~/.config/ggpt.toml`
fn config_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".config").join("ggpt.toml"))
}

fn load_file_config() -> Option<FileConfig> {
    let path = config_path()?;
    if !path.exists() {
        return None;
    }

    let data = match fs::read_to_string(&path) {
        Ok(data) => data,
        Err(e) => {
            log::warn!("Ignoring {}: {e}", path.display());
            return None;
        }
    };

    parse_file_config(&data)
        .map_err(|e| log::warn!("Ignoring {}: {e}", path.display()))
        .ok()
}

fn parse_file_config(data: &str) -> Result<FileConfig, toml::de::Error> {
    toml::from_str::<FileConfig>(data)
}
