use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8000";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    /// `None` when unset or blank. Generation calls fail at request time.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub gemini_timeout_secs: u64,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            gemini_timeout_secs: 120,
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let defaults = Self::default();
        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", &defaults.server_address),
            gemini_api_key: env::var("GEMINI_API_KEY")
                .ok()
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            gemini_model: get_env_or("GEMINI_MODEL", &defaults.gemini_model),
            gemini_base_url: get_env_or("GEMINI_BASE_URL", &defaults.gemini_base_url)
                .trim_end_matches('/')
                .to_string(),
            gemini_timeout_secs: get_env_parse_or(
                "GEMINI_TIMEOUT_SECS",
                defaults.gemini_timeout_secs,
            )?,
            max_upload_bytes: get_env_parse_or("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
        })
    }
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_falls_back_to_default_when_unset() {
        let value: u64 = get_env_parse_or("ASSESSMENT_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn parse_rejects_garbage() {
        env::set_var("ASSESSMENT_TEST_BAD_NUMBER", "forty-two");
        let err = get_env_parse_or::<u64>("ASSESSMENT_TEST_BAD_NUMBER", 1).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("ASSESSMENT_TEST_BAD_NUMBER")));
    }

    #[test]
    fn defaults_match_documented_values() {
        let cfg = Config::default();
        assert_eq!(cfg.server_address, "127.0.0.1:8000");
        assert_eq!(cfg.gemini_model, "gemini-2.0-flash");
        assert!(cfg.gemini_api_key.is_none());
        assert_eq!(cfg.max_upload_bytes, 52_428_800);
    }
}
