//! Server configuration

use crate::BoxError;

/// Default priority country for order listings
pub const DEFAULT_PRIORITY_COUNTRY: &str = "Estonia";

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database URL: `postgres://...` or `sqlite:...`
    pub database_url: String,
    /// Maximum pooled database connections
    pub db_max_connections: u32,
    /// HTTP port
    pub http_port: u16,
    /// Optional path prefix for every route (e.g. `api` → `/api/orders`)
    pub api_prefix: String,
    /// Country whose orders are listed first
    pub priority_country: String,
    /// Allowed CORS origin (`*` for any)
    pub cors_origin: String,
    /// Log level used when RUST_LOG is not set
    pub log_level: String,
    /// Directory for daily rolling log files (stdout only when unset)
    pub log_dir: Option<String>,
    /// Environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BoxError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Self {
            database_url: var("DATABASE_URL").unwrap_or_else(|| "sqlite:orders.db".into()),
            db_max_connections: parse_or(var("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", 5)?,
            http_port: parse_or(var("HTTP_PORT"), "HTTP_PORT", 3000)?,
            api_prefix: var("API_PREFIX")
                .map(|p| p.trim_matches('/').to_string())
                .unwrap_or_default(),
            priority_country: var("PRIORITY_COUNTRY")
                .unwrap_or_else(|| DEFAULT_PRIORITY_COUNTRY.into()),
            cors_origin: var("CORS_ORIGIN").unwrap_or_else(|| "*".into()),
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: var("LOG_DIR"),
            environment: var("ENVIRONMENT").unwrap_or_else(|| "development".into()),
        })
    }

    /// Route prefix with a leading slash, or empty
    pub fn route_prefix(&self) -> String {
        if self.api_prefix.is_empty() {
            String::new()
        } else {
            format!("/{}", self.api_prefix)
        }
    }
}

/// A value that is present but malformed is an error, not a silent default
fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    name: &str,
    default: T,
) -> Result<T, BoxError> {
    match value {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| format!("{name} has an invalid value: {v}").into()),
        None => Ok(default),
    }
}
