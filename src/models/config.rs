use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the optional config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "solvehook.toml";

/// Environment variable holding the webhook secret
pub const SECRET_ENV: &str = "SECRET_KEY";

/// Environment variable holding the LLM provider token
pub const LLM_TOKEN_ENV: &str = "AIPIPE_TOKEN";

/// Configuration loaded from solvehook.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub artifact: ArtifactConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
}

/// Webhook listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Chat-completion provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Chat completions endpoint
    #[serde(default = "default_llm_url")]
    pub url: String,
    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,
    /// Completion token budget
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Timeout in seconds for the completion request
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            url: default_llm_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_llm_url() -> String {
    "https://aipipe.org/openrouter/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "openai/gpt-4.1-nano".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_timeout() -> u64 {
    120
}

/// Where the generated program is written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
    #[serde(default = "default_artifact_path")]
    pub path: PathBuf,
    /// Remove a markdown fence wrapped around the whole completion
    #[serde(default)]
    pub strip_code_fences: bool,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            path: default_artifact_path(),
            strip_code_fences: false,
        }
    }
}

fn default_artifact_path() -> PathBuf {
    PathBuf::from("generated_script.py")
}

/// How the generated program is launched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Program used to run the artifact. Empty means run the artifact itself.
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            working_dir: None,
        }
    }
}

fn default_interpreter() -> String {
    "python3".to_string()
}

impl Config {
    /// Load config from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e))?;
        toml::from_str(&contents).map_err(|e| ConfigError::ParseError(path.to_path_buf(), e))
    }

    /// Try to load config from solvehook.toml in the given directory
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge CLI overrides into the config
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(h) = overrides.host {
            self.server.host = h;
        }
        if let Some(p) = overrides.port {
            self.server.port = p;
        }
        if let Some(m) = overrides.model {
            self.llm.model = m;
        }
        if let Some(u) = overrides.llm_url {
            self.llm.url = u;
        }
        if let Some(t) = overrides.timeout {
            self.llm.timeout_seconds = t;
        }
        if let Some(i) = overrides.interpreter {
            self.execution.interpreter = i;
        }
        self
    }
}

/// Values supplied on the command line that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub model: Option<String>,
    pub llm_url: Option<String>,
    pub timeout: Option<u64>,
    pub interpreter: Option<String>,
}

/// Process-lifetime credentials, read once from the environment
#[derive(Clone)]
pub struct Secrets {
    /// Shared secret every webhook caller must present
    pub webhook_secret: String,
    /// Bearer token for the completion provider, also handed to generated programs
    pub llm_token: String,
}

impl Secrets {
    pub fn new(webhook_secret: impl Into<String>, llm_token: impl Into<String>) -> Self {
        Self {
            webhook_secret: webhook_secret.into(),
            llm_token: llm_token.into(),
        }
    }

    /// Read both secrets using the given lookup (normally `std::env::var`)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| match lookup(name) {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(ConfigError::MissingEnv(name.to_string())),
        };
        Ok(Self {
            webhook_secret: read(SECRET_ENV)?,
            llm_token: read(LLM_TOKEN_ENV)?,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("webhook_secret", &"<redacted>")
            .field("llm_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(PathBuf, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(PathBuf, toml::de::Error),
    #[error("Environment variable {0} is not set")]
    MissingEnv(String),
}
