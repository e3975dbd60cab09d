use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "rally.toml",
    "config/rally.toml",
    "crates/config/rally.toml",
    "../rally.toml",
    "../config/rally.toml",
    "../crates/config/rally.toml",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub summarizer: SummarizerConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 7070,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://rally.db".to_string(),
            max_connections: 10,
        }
    }
}

/// Bearer token settings shared with the authentication service that issues
/// the tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "AuthConfig::default_secret")]
    pub jwt_secret: String,
    #[serde(default = "AuthConfig::default_issuer")]
    pub issuer: String,
    #[serde(default = "AuthConfig::default_audience")]
    pub audience: String,
    #[serde(default = "AuthConfig::default_token_ttl")]
    pub token_ttl_seconds: u64,
}

impl AuthConfig {
    fn default_secret() -> String {
        "development-secret-change-me".to_string()
    }

    fn default_issuer() -> String {
        "rally".to_string()
    }

    fn default_audience() -> String {
        "rally-users".to_string()
    }

    const fn default_token_ttl() -> u64 {
        86_400
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: Self::default_secret(),
            issuer: Self::default_issuer(),
            audience: Self::default_audience(),
            token_ttl_seconds: Self::default_token_ttl(),
        }
    }
}

/// Settings for the OpenAI-compatible completion endpoint used to summarize
/// event chatrooms.
///
/// ```
/// use rally_config::SummarizerConfig;
///
/// let summarizer = SummarizerConfig::default();
/// assert_eq!(summarizer.base_url, "https://api.openai.com/v1");
/// assert_eq!(summarizer.max_tokens, 150);
/// assert!(summarizer.api_key.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "SummarizerConfig::default_base_url")]
    pub base_url: String,
    #[serde(default = "SummarizerConfig::default_model")]
    pub model: String,
    #[serde(default = "SummarizerConfig::default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "SummarizerConfig::default_temperature")]
    pub temperature: f32,
    #[serde(default = "SummarizerConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default)]
    pub referer: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl SummarizerConfig {
    fn default_base_url() -> String {
        "https://api.openai.com/v1".to_string()
    }

    fn default_model() -> String {
        "gpt-4o-mini".to_string()
    }

    const fn default_max_tokens() -> u32 {
        150
    }

    const fn default_temperature() -> f32 {
        0.7
    }

    const fn default_request_timeout() -> u64 {
        30
    }

    /// Configured key, falling back to `OPENAI_API_KEY`.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: Self::default_base_url(),
            model: Self::default_model(),
            max_tokens: Self::default_max_tokens(),
            temperature: Self::default_temperature(),
            request_timeout_seconds: Self::default_request_timeout(),
            referer: None,
            title: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "EmailConfig::default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "EmailConfig::default_sender")]
    pub sender: String,
    #[serde(default = "EmailConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl EmailConfig {
    fn default_api_url() -> String {
        "http://127.0.0.1:8025/api/send".to_string()
    }

    fn default_sender() -> String {
        "Rally Events <no-reply@rally.local>".to_string()
    }

    const fn default_request_timeout() -> u64 {
        10
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: Self::default_api_url(),
            api_key: None,
            sender: Self::default_sender(),
            request_timeout_seconds: Self::default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "NotificationConfig::default_delivery_timeout")]
    pub delivery_timeout_seconds: u64,
}

impl NotificationConfig {
    const fn default_delivery_timeout() -> u64 {
        60
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            delivery_timeout_seconds: Self::default_delivery_timeout(),
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use rally_config::load;
///
/// std::env::remove_var("RALLY_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let mut builder = config::Config::builder()
        .set_default("http.address", defaults.http.address.clone())?
        .set_default("http.port", i64::from(defaults.http.port))?
        .set_default("database.url", defaults.database.url.clone())?
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )?
        .set_default("summarizer.base_url", defaults.summarizer.base_url.clone())?
        .set_default("summarizer.model", defaults.summarizer.model.clone())?;

    let environment_overrides = config::Environment::with_prefix("RALLY").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("RALLY_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via RALLY_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    if config.auth.jwt_secret == AuthConfig::default_secret() {
        tracing::warn!("using the built-in development jwt secret");
    }

    debug!(?config, "loaded backend configuration");
    Ok(config)
}
