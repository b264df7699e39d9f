//! Configuration management for web service
//!
//! Supports loading configuration from environment variables with fallback to defaults.

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";
pub const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub rate_limit_per_minute: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            allowed_origins: parse_origins(DEFAULT_ALLOWED_ORIGINS),
            rate_limit_per_minute: DEFAULT_RATE_LIMIT_PER_MINUTE,
        }
    }
}

impl ServerConfig {
    /// Load from environment variables
    ///
    /// Environment variables:
    /// - `APP_HOST`: Bind address (default: 127.0.0.1)
    /// - `APP_PORT`: Bind port (default: 8080)
    /// - `CORS_ALLOWED_ORIGINS`: Comma-separated origins
    /// - `PREPACK_RATE_LIMIT_PER_MINUTE`: Prepack requests per client per minute (default: 20)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            host: non_empty("APP_HOST")
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: non_empty("APP_PORT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_PORT),
            allowed_origins: parse_origins(
                &non_empty("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string()),
            ),
            rate_limit_per_minute: non_empty("PREPACK_RATE_LIMIT_PER_MINUTE")
                .and_then(|v| v.trim().parse().ok())
                .filter(|limit| *limit > 0)
                .unwrap_or(DEFAULT_RATE_LIMIT_PER_MINUTE),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
