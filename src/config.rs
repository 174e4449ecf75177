use std::env;
use std::path::PathBuf;

use crate::utils::error::{AppError, AppResult};

const DEV_TOKEN_SECRET: &str = "default-secret-change-me";
/// One hour up to one year.
const TOKEN_TTL_RANGE: std::ops::RangeInclusive<i64> = 1..=8760;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub auth: AuthSettings,
    /// Empty means any origin.
    pub cors_origins: Vec<String>,
    pub ping_message: String,
    pub seed_demo_users: bool,
}

/// Token and password settings shared by the auth service and middleware.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub token_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            token_secret: DEV_TOKEN_SECRET.to_string(),
            token_ttl_hours: 24,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        dotenv::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_var("PORT", 3000u16)?;
        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        let token_secret = env::var("TOKEN_SECRET").unwrap_or_else(|_| {
            log::warn!("⚠️  TOKEN_SECRET not set, using the development secret");
            DEV_TOKEN_SECRET.to_string()
        });
        let auth = AuthSettings {
            token_secret,
            token_ttl_hours: token_ttl_hours(parse_var("TOKEN_TTL_HOURS", 24i64)?)?,
            bcrypt_cost: parse_var("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        };

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|v| split_list(&v))
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            data_dir,
            auth,
            cors_origins,
            ping_message: env::var("PING_MESSAGE").unwrap_or_else(|_| "ping".to_string()),
            seed_demo_users: parse_var("SEED_DEMO_USERS", true)?,
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> AppResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| AppError::Internal(format!("Invalid {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

fn token_ttl_hours(hours: i64) -> AppResult<i64> {
    if TOKEN_TTL_RANGE.contains(&hours) {
        Ok(hours)
    } else {
        Err(AppError::Internal(format!(
            "Invalid TOKEN_TTL_HOURS: {} (expected {} to {})",
            hours,
            TOKEN_TTL_RANGE.start(),
            TOKEN_TTL_RANGE.end()
        )))
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_drops_blanks() {
        assert_eq!(
            split_list(" http://localhost:3000, ,http://127.0.0.1:8080 "),
            vec!["http://localhost:3000".to_string(), "http://127.0.0.1:8080".to_string()]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_parse_var_defaults_and_rejects_garbage() {
        assert_eq!(parse_var("DONATION_HUB_TEST_UNSET_VAR", 7u16).unwrap(), 7);

        env::set_var("DONATION_HUB_TEST_BAD_PORT", "eighty");
        assert!(parse_var("DONATION_HUB_TEST_BAD_PORT", 80u16).is_err());
        env::remove_var("DONATION_HUB_TEST_BAD_PORT");
    }

    #[test]
    fn test_token_ttl_hours_range() {
        assert_eq!(token_ttl_hours(24).unwrap(), 24);
        assert_eq!(token_ttl_hours(8760).unwrap(), 8760);
        assert!(token_ttl_hours(0).is_err());
        assert!(token_ttl_hours(-5).is_err());
        assert!(token_ttl_hours(i64::MAX).is_err());
    }
}
