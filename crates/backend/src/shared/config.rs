use contracts::dashboards::d400_sales_summary::ReportSettings;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

static CONFIG: OnceCell<Config> = OnceCell::new();

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub frontend: FrontendConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Удалённый API с записями продаж
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct UpstreamConfig {
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Bearer-токен, если API его требует
    #[serde(default)]
    pub api_token: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ReportConfig {
    pub title: String,
    pub organization: String,
    #[serde(default)]
    pub currency: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FrontendConfig {
    pub dist_dir: String,
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: default_timeout_secs(),
            api_token: None,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        let settings = ReportSettings::default();
        Self {
            title: settings.title,
            organization: settings.organization,
            currency: settings.currency,
        }
    }
}

impl From<&ReportConfig> for ReportSettings {
    fn from(config: &ReportConfig) -> Self {
        Self {
            title: config.title.clone(),
            organization: config.organization.clone(),
            currency: config.currency.clone(),
        }
    }
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            dist_dir: "dist".to_string(),
        }
    }
}

impl Config {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("Invalid server address '{}': {}", addr, e))
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000

[upstream]
url = ""
timeout_secs = 60

[report]
title = "Tobacco Sales Report"
organization = "Tobacco Trading Association"
currency = "USD"

[frontend]
dist_dir = "dist"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                return load_from_path(&config_path);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

pub fn load_from_path(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))?;
    Ok(config)
}

/// Загружает конфигурацию один раз на процесс
pub fn init() -> anyhow::Result<&'static Config> {
    let config = load_config()?;
    Ok(CONFIG.get_or_init(|| config))
}

/// Текущая конфигурация (встроенная по умолчанию, если `init` не вызывался)
pub fn get() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}

/// Resolves relative paths relative to the executable directory
pub fn resolve_path(path_str: &str) -> PathBuf {
    let path = Path::new(path_str);

    if path.is_absolute() {
        return path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let resolved = exe_dir.join(path);
            if resolved.exists() {
                return resolved;
            }
        }
    }

    // Fallback: relative to the current directory
    PathBuf::from(path_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_section_maps_to_settings() {
        let config: Config = toml::from_str(
            r#"
            [report]
            title = "Marondera Auction"
            organization = "Floor Co-op"
            currency = "ZWG"
            "#,
        )
        .unwrap();
        let settings = ReportSettings::from(&config.report);
        assert_eq!(settings.title, "Marondera Auction");
        assert_eq!(settings.organization, "Floor Co-op");
        assert_eq!(settings.currency, "ZWG");
        assert_eq!(
            ReportSettings::from(&ReportConfig::default()),
            ReportSettings::default()
        );
    }

    #[test]
    fn test_default_config_loads() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [upstream]
            url = "https://api.example.org/sales"
            api_token = "secret"
            "#,
        )
        .unwrap();
        assert_eq!(config.upstream.url, "https://api.example.org/sales");
        assert_eq!(config.upstream.timeout_secs, 60);
        assert_eq!(config.upstream.api_token.as_deref(), Some("secret"));
        assert_eq!(config.report, ReportConfig::default());
    }

    #[test]
    fn test_socket_addr() {
        let config = Config::default();
        assert_eq!(config.socket_addr().unwrap().port(), 3000);

        let mut bad = Config::default();
        bad.server.host = "not a host".to_string();
        assert!(bad.socket_addr().is_err());
    }

    #[test]
    fn test_resolve_absolute_path() {
        let abs = if cfg!(windows) { "C:\\data\\dist" } else { "/srv/dist" };
        assert_eq!(resolve_path(abs), PathBuf::from(abs));
    }
}
