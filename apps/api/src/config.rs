use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// Only `PORT` and `RUST_LOG` have hard defaults; the Redis store and the remote
/// sync backend are optional and fall back to in-process storage / local-only mode.
#[derive(Debug, Clone)]
pub struct Config {
    /// Redis connection string for the durable key-value store. `None` → in-memory store.
    pub redis_url: Option<String>,
    /// Prefix for every Redis hash holding a storage scope.
    pub store_namespace: String,
    /// Postgres connection string for the optional remote profile/feedback tables.
    pub database_url: Option<String>,
    /// Emails that receive the admin flag when they register.
    pub admin_emails: Vec<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            redis_url: optional_env("REDIS_URL"),
            store_namespace: optional_env("STORE_NAMESPACE")
                .unwrap_or_else(|| "portfolio".to_string()),
            database_url: optional_env("DATABASE_URL"),
            admin_emails: parse_list(&std::env::var("ADMIN_EMAILS").unwrap_or_default()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Case-insensitive membership check against `ADMIN_EMAILS`.
    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails
            .iter()
            .any(|admin| admin.eq_ignore_ascii_case(email.trim()))
    }
}

/// Reads an env var, treating empty strings as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Splits a comma-separated list, dropping blanks.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
impl Config {
    /// Local-only configuration used by unit tests.
    pub fn for_tests(admin_emails: &[&str]) -> Self {
        Config {
            redis_url: None,
            store_namespace: "portfolio-test".to_string(),
            database_url: None,
            admin_emails: admin_emails.iter().map(|s| s.to_lowercase()).collect(),
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_trims_and_lowercases() {
        assert_eq!(
            parse_list(" Admin@Example.com, ,ops@example.com "),
            vec!["admin@example.com", "ops@example.com"]
        );
    }

    #[test]
    fn test_parse_list_empty() {
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn test_is_admin_email_ignores_case() {
        let config = Config::for_tests(&["admin@example.com"]);
        assert!(config.is_admin_email("ADMIN@example.com "));
        assert!(!config.is_admin_email("user@example.com"));
    }
}
