use crate::models::ChatRef;
use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub system_channel: SystemChannelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// 系统频道使用单独的 bot 检查成员身份（该 bot 是系统频道管理员）
    #[serde(default)]
    pub system_bot_token: Option<String>,
    /// 用于生成 Mini App 参与链接
    #[serde(default)]
    pub bot_username: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// 单次成员/助力检查的超时 (毫秒)，超时按未满足处理
    #[serde(default = "default_check_timeout_ms")]
    pub check_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemChannelConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub link: String,
    #[serde(default = "default_system_channel_title")]
    pub title: String,
}

impl Default for SystemChannelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            id: 0,
            link: String::new(),
            title: default_system_channel_title(),
        }
    }
}

impl SystemChannelConfig {
    /// 开启时作为额外的成员检查频道
    pub fn chat_ref(&self) -> Option<ChatRef> {
        self.enabled.then(|| ChatRef {
            id: self.id,
            title: self.title.clone(),
            link: self.link.clone(),
            photo: String::new(),
            is_system: true,
        })
    }
}

fn default_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_check_timeout_ms() -> u64 {
    5000
}

fn default_system_channel_title() -> String {
    "System Channel".to_string()
}

impl Config {
    pub fn from_toml() -> anyhow::Result<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let mut config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => Self::parse(&config_str)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Self::from_env_defaults()?,
            Err(e) => {
                return Err(anyhow!("Failed to read config file {config_path}: {e}"));
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        config.apply_env_overrides();

        Ok(config)
    }

    pub fn parse(config_str: &str) -> anyhow::Result<Self> {
        toml::from_str(config_str).context("Failed to parse config file")
    }

    fn from_env_defaults() -> anyhow::Result<Self> {
        fn get_env(name: &str) -> Option<String> {
            env::var(name).ok()
        }
        fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
            env::var(name)
                .ok()
                .and_then(|v| v.parse::<T>().ok())
                .unwrap_or(default)
        }

        // 数据库 URL 在无配置文件时必须提供
        let database_url = get_env("DATABASE_URL")
            .ok_or_else(|| anyhow!("DATABASE_URL is not set and no config.toml was found"))?;

        Ok(Config {
            server: ServerConfig {
                host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: get_env_parse("SERVER_PORT", 8080u16),
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
            },
            telegram: TelegramConfig {
                bot_token: get_env("TELEGRAM_BOT_TOKEN").unwrap_or_default(),
                system_bot_token: get_env("TELEGRAM_SYSTEM_BOT_TOKEN"),
                bot_username: get_env("TELEGRAM_BOT_USERNAME").unwrap_or_default(),
                api_base_url: get_env("TELEGRAM_API_BASE_URL")
                    .unwrap_or_else(default_api_base_url),
                check_timeout_ms: get_env_parse(
                    "TELEGRAM_CHECK_TIMEOUT_MS",
                    default_check_timeout_ms(),
                ),
            },
            system_channel: SystemChannelConfig {
                enabled: get_env_parse("SYSTEM_CHANNEL_ENABLED", false),
                id: get_env_parse("SYSTEM_CHANNEL_ID", 0i64),
                link: get_env("SYSTEM_CHANNEL_LINK").unwrap_or_default(),
                title: default_system_channel_title(),
            },
        })
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            self.database.max_connections = mc;
        }
        if let Ok(v) = env::var("TELEGRAM_BOT_TOKEN") {
            self.telegram.bot_token = v;
        }
        if let Ok(v) = env::var("TELEGRAM_SYSTEM_BOT_TOKEN") {
            self.telegram.system_bot_token = Some(v);
        }
        if let Ok(v) = env::var("TELEGRAM_BOT_USERNAME") {
            self.telegram.bot_username = v;
        }
        if let Ok(v) = env::var("TELEGRAM_API_BASE_URL") {
            self.telegram.api_base_url = v;
        }
        if let Ok(v) = env::var("TELEGRAM_CHECK_TIMEOUT_MS")
            && let Ok(ms) = v.parse()
        {
            self.telegram.check_timeout_ms = ms;
        }

        // System channel
        if let Ok(v) = env::var("SYSTEM_CHANNEL_ENABLED")
            && let Ok(b) = v.parse()
        {
            self.system_channel.enabled = b;
        }
        if let Ok(v) = env::var("SYSTEM_CHANNEL_ID")
            && let Ok(id) = v.parse()
        {
            self.system_channel.id = id;
        }
        if let Ok(v) = env::var("SYSTEM_CHANNEL_LINK") {
            self.system_channel.link = v;
        }
    }
}
