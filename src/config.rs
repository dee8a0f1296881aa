use std::env;
use std::net::SocketAddr;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://netls.db?mode=rwc";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Mount point of the API, `/v1` puts resources under `/v1/netls`.
    pub api_prefix: String,
    pub default_page_size: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
    #[error("{0} is not a valid listen address")]
    Address(String),
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_owned())
}

fn parsed<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        _ => Ok(default),
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let default_page_size = parsed("DEFAULT_PAGE_SIZE", 10u64)?;
        if default_page_size == 0 {
            return Err(ConfigError::Invalid {
                name: "DEFAULT_PAGE_SIZE",
                value: "0".to_owned(),
            });
        }

        Ok(Self {
            database_url: var_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            host: var_or("HOST", "0.0.0.0"),
            port: parsed("PORT", 8000)?,
            api_prefix: var_or("API_PREFIX", "/v1"),
            default_page_size,
        })
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::Address(addr))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            host: "0.0.0.0".to_owned(),
            port: 8000,
            api_prefix: "/v1".to_owned(),
            default_page_size: 10,
        }
    }
}
