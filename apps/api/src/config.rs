use anyhow::{bail, Context, Result};

/// Which chat responder the service runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMode {
    /// Database-backed classification, extraction and lookups.
    Live,
    /// Canned per-intent replies; used when no store is configured.
    Demo,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub token_secret: String,
    /// `None` means issued tokens never expire.
    pub token_ttl_hours: Option<i64>,
    pub port: u16,
    pub rust_log: String,
    pub cors_origins: Vec<String>,
    pub chat_mode: ChatMode,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let database_url = optional_env("DATABASE_URL");
        let chat_mode = match optional_env("CHAT_MODE") {
            Some(mode) => parse_chat_mode(&mode)?,
            None if database_url.is_some() => ChatMode::Live,
            None => ChatMode::Demo,
        };

        Ok(Config {
            database_url,
            token_secret: require_env("TOKEN_SECRET")?,
            token_ttl_hours: optional_env("TOKEN_TTL_HOURS")
                .map(|v| parse_ttl_hours(&v))
                .transpose()?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            cors_origins: parse_origins(
                &std::env::var("CORS_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string()),
            ),
            chat_mode,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Upper bound for `TOKEN_TTL_HOURS`: ten years.
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365 * 10;

fn parse_ttl_hours(raw: &str) -> Result<i64> {
    let hours = raw
        .trim()
        .parse::<i64>()
        .context("TOKEN_TTL_HOURS must be a whole number of hours")?;
    if !(1..=MAX_TOKEN_TTL_HOURS).contains(&hours) {
        bail!("TOKEN_TTL_HOURS must be between 1 and {MAX_TOKEN_TTL_HOURS}, got {hours}");
    }
    Ok(hours)
}

fn parse_chat_mode(raw: &str) -> Result<ChatMode> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "live" => Ok(ChatMode::Live),
        "demo" => Ok(ChatMode::Demo),
        other => bail!("CHAT_MODE must be 'live' or 'demo', got '{other}'"),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_mode_accepts_both_modes() {
        assert_eq!(parse_chat_mode("live").unwrap(), ChatMode::Live);
        assert_eq!(parse_chat_mode(" DEMO ").unwrap(), ChatMode::Demo);
    }

    #[test]
    fn test_parse_chat_mode_rejects_unknown() {
        assert!(parse_chat_mode("offline").is_err());
    }

    #[test]
    fn test_parse_ttl_hours_accepts_range() {
        assert_eq!(parse_ttl_hours(" 24 ").unwrap(), 24);
        assert_eq!(parse_ttl_hours("87600").unwrap(), MAX_TOKEN_TTL_HOURS);
    }

    #[test]
    fn test_parse_ttl_hours_rejects_out_of_range_and_garbage() {
        assert!(parse_ttl_hours("0").is_err());
        assert!(parse_ttl_hours("-5").is_err());
        assert!(parse_ttl_hours("87601").is_err());
        assert!(parse_ttl_hours("9223372036854775807").is_err());
        assert!(parse_ttl_hours("a day").is_err());
    }

    #[test]
    fn test_parse_origins_trims_and_drops_empty() {
        let origins = parse_origins("http://a.test, http://b.test ,,");
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }
}
