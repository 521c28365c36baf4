use std::net::IpAddr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub default_locale: String,
    pub default_limit: i64,
    pub max_limit: i64,
    pub media_url: String,
    pub media_timeout: Duration,
    pub api_token: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let media_url = env_required("FORMDESK_MEDIA_URL")?;

        let host: IpAddr = env_or("FORMDESK_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid FORMDESK_HOST: {e}"))?;

        let port: u16 = env_or("FORMDESK_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid FORMDESK_PORT: {e}"))?;

        let log_level = env_or("FORMDESK_LOG_LEVEL", "info");
        let default_locale = env_or("FORMDESK_DEFAULT_LOCALE", "en");

        let default_limit: i64 = env_or("FORMDESK_DEFAULT_LIMIT", "20")
            .parse()
            .map_err(|e| format!("Invalid FORMDESK_DEFAULT_LIMIT: {e}"))?;

        let max_limit: i64 = env_or("FORMDESK_MAX_LIMIT", "500")
            .parse()
            .map_err(|e| format!("Invalid FORMDESK_MAX_LIMIT: {e}"))?;

        if default_limit < 1 || max_limit < default_limit {
            return Err(format!(
                "FORMDESK_DEFAULT_LIMIT must be between 1 and FORMDESK_MAX_LIMIT ({max_limit})"
            ));
        }

        let media_timeout_secs: u64 = env_or("FORMDESK_MEDIA_TIMEOUT_SECS", "10")
            .parse()
            .map_err(|e| format!("Invalid FORMDESK_MEDIA_TIMEOUT_SECS: {e}"))?;

        let api_token = std::env::var("FORMDESK_API_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());

        Ok(Config {
            database_url,
            host,
            port,
            log_level,
            default_locale,
            default_limit,
            max_limit,
            media_url,
            media_timeout: Duration::from_secs(media_timeout_secs),
            api_token,
        })
    }

    /// Clamp a requested page size into `1..=max_limit`.
    pub fn page_limit(&self, requested: Option<i64>) -> i64 {
        requested
            .filter(|l| *l > 0)
            .unwrap_or(self.default_limit)
            .min(self.max_limit)
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
