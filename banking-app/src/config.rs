//! Configuration loading from environment.

use std::env;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    /// Key accepted on `/api/admin/*`.
    pub admin_api_key: String,
    pub rate_limit_per_minute: u32,
    /// Attempts per deposit/withdrawal/status change before reporting a conflict.
    pub max_attempts: u32,
    /// OTLP collector for span export; tracing stays local when unset.
    pub otlp_endpoint: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("PORT must be a port number: {}", e))?;

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let admin_api_key = lookup("ADMIN_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("ADMIN_API_KEY environment variable is required"))?;

        let rate_limit_per_minute = lookup("RATE_LIMIT_PER_MINUTE")
            .unwrap_or_else(|| "100".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("RATE_LIMIT_PER_MINUTE must be a number: {}", e))?;

        let max_attempts: u32 = lookup("TRANSACTION_MAX_ATTEMPTS")
            .unwrap_or_else(|| banking_hex::DEFAULT_MAX_ATTEMPTS.to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("TRANSACTION_MAX_ATTEMPTS must be a number: {}", e))?;
        if max_attempts == 0 {
            anyhow::bail!("TRANSACTION_MAX_ATTEMPTS must be at least 1");
        }

        let otlp_endpoint = lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|s| !s.is_empty());

        Ok(Self {
            port,
            database_url,
            admin_api_key,
            rate_limit_per_minute,
            max_attempts,
            otlp_endpoint,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DATABASE_URL", "sqlite::memory:"),
        ("ADMIN_API_KEY", "admin"),
    ];

    #[test]
    fn test_defaults() {
        let config = load(&REQUIRED).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.rate_limit_per_minute, 100);
        assert_eq!(config.max_attempts, 3);
        assert!(config.otlp_endpoint.is_none());
    }

    #[test]
    fn test_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("PORT", "8080"),
            ("RATE_LIMIT_PER_MINUTE", "5"),
            ("TRANSACTION_MAX_ATTEMPTS", "7"),
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://localhost:4317"),
        ]);

        let config = load(&vars).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.rate_limit_per_minute, 5);
        assert_eq!(config.max_attempts, 7);
        assert_eq!(config.otlp_endpoint.as_deref(), Some("http://localhost:4317"));
    }

    #[test]
    fn test_missing_required() {
        assert!(load(&[("ADMIN_API_KEY", "admin")]).is_err());
        assert!(load(&[("DATABASE_URL", "sqlite::memory:")]).is_err());
        assert!(load(&[("DATABASE_URL", "sqlite::memory:"), ("ADMIN_API_KEY", " ")]).is_err());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("TRANSACTION_MAX_ATTEMPTS", "0"));

        assert!(load(&vars).is_err());
    }
}
