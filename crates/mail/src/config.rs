//! Configuration loading for the digest
//!
//! [`DigestConfig`] is read once at startup from the process environment (a
//! `.env` file is honoured) and passed to whatever needs it.
//!
//! [`GmailCredentials`] supports loading the OAuth client from (in order of
//! priority):
//! 1. JSON file (Google Cloud Console format)
//! 2. Runtime environment variables (fallback)

use anyhow::{Context, Result};
use chrono::Duration;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::digest::summarize::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::error::DigestError;

/// OAuth client secret filename in the config directory
const CREDENTIALS_FILE: &str = "credentials.json";

/// Cached token filename in the config directory
const TOKEN_FILE: &str = "gmail-tokens.json";

/// Run daily at 06:00
pub const DEFAULT_SCHEDULE: &str = "0 6 * * *";

/// Everything a digest run and the scheduler need to know
#[derive(Debug, Clone, PartialEq)]
pub struct DigestConfig {
    /// Address the digest is sent to
    pub destination: String,
    /// Days of sent mail to summarize
    pub lookback_days: u32,
    /// Cron expression for the scheduler
    pub schedule: String,
    /// Pinged after every scheduled run, if set
    pub heartbeat_url: Option<String>,
    /// Link to Superhuman threads instead of Gmail
    pub superhuman_links: bool,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: String,
    /// Cached OAuth token
    pub token_path: PathBuf,
    /// OAuth client secret (Google Cloud Console JSON)
    pub credentials_path: PathBuf,
}

impl DigestConfig {
    /// Load from the process environment, after reading `.env` if present
    pub fn from_env() -> Result<Self> {
        // A missing .env file is normal
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let destination = get("DIGEST_DESTINATION").context("DIGEST_DESTINATION is not set")?;
        let openai_api_key = get("OPENAI_API_KEY").context("OPENAI_API_KEY is not set")?;

        let lookback_days = match get("DIGEST_DAYS") {
            Some(raw) => parse_days(&raw)?,
            None => 1,
        };

        let heartbeat_url = match get("HEARTBEAT_URL") {
            Some(raw) => {
                url::Url::parse(&raw).map_err(|e| DigestError::InvalidConfig {
                    key: "HEARTBEAT_URL",
                    reason: e.to_string(),
                })?;
                Some(raw)
            }
            None => None,
        };

        let superhuman_links = match get("DIGEST_SUPERHUMAN") {
            Some(raw) => parse_bool("DIGEST_SUPERHUMAN", &raw)?,
            None => false,
        };

        let token_path = match get("DIGEST_TOKEN_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_path(TOKEN_FILE)?,
        };
        let credentials_path = match get("DIGEST_CREDENTIALS_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_path(CREDENTIALS_FILE)?,
        };

        Ok(Self {
            destination,
            lookback_days,
            schedule: get("SCHEDULE").unwrap_or_else(|| DEFAULT_SCHEDULE.to_string()),
            heartbeat_url,
            superhuman_links,
            openai_api_key,
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            openai_base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            token_path,
            credentials_path,
        })
    }

    /// Lookback window as a duration
    pub fn lookback(&self) -> Duration {
        Duration::days(i64::from(self.lookback_days))
    }
}

fn default_path(filename: &str) -> Result<PathBuf> {
    config::config_path(filename).context("Could not determine config directory")
}

fn parse_days(raw: &str) -> Result<u32, DigestError> {
    match raw.parse::<u32>() {
        Ok(days) if days > 0 => Ok(days),
        _ => Err(DigestError::InvalidConfig {
            key: "DIGEST_DAYS",
            reason: format!("expected a positive number of days, got {raw:?}"),
        }),
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, DigestError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(DigestError::InvalidConfig {
            key,
            reason: format!("expected a boolean, got {raw:?}"),
        }),
    }
}

/// OAuth credentials for Gmail API access
#[derive(Debug, Clone)]
pub struct GmailCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Google Cloud Console credential file format (installed app)
#[derive(Deserialize)]
struct GoogleCredentialFile {
    installed: Option<InstalledCredentials>,
    web: Option<InstalledCredentials>,
}

#[derive(Deserialize)]
struct InstalledCredentials {
    client_id: String,
    client_secret: String,
}

impl GmailCredentials {
    /// Load credentials from `path` if it exists, else from the environment
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::from_file(path);
        }
        Self::from_env()
    }

    /// Load credentials from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let creds: GoogleCredentialFile = config::load_json_file(path)?;
        Self::from_credential_file(creds)
    }

    /// Parse credentials from a GoogleCredentialFile
    fn from_credential_file(creds: GoogleCredentialFile) -> Result<Self> {
        // Support both "installed" (desktop) and "web" credential types
        let installed = creds
            .installed
            .or(creds.web)
            .context("Credentials file missing 'installed' or 'web' section")?;

        Ok(Self {
            client_id: installed.client_id,
            client_secret: installed.client_secret,
        })
    }

    /// Parse credentials from JSON string (Google Cloud Console format)
    pub fn from_json(json: &str) -> Result<Self> {
        let creds: GoogleCredentialFile =
            serde_json::from_str(json).context("Failed to parse credentials JSON")?;
        Self::from_credential_file(creds)
    }

    /// Load credentials from environment variables
    pub fn from_env() -> Result<Self> {
        let client_id = std::env::var("GMAIL_CLIENT_ID")
            .context("GMAIL_CLIENT_ID environment variable not set")?;
        let client_secret = std::env::var("GMAIL_CLIENT_SECRET")
            .context("GMAIL_CLIENT_SECRET environment variable not set")?;

        Ok(Self {
            client_id,
            client_secret,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DIGEST_DESTINATION", "digest@example.com"),
        ("OPENAI_API_KEY", "sk-test"),
    ];

    #[test]
    fn test_defaults() {
        let config = DigestConfig::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.destination, "digest@example.com");
        assert_eq!(config.lookback_days, 1);
        assert_eq!(config.lookback(), Duration::days(1));
        assert_eq!(config.schedule, "0 6 * * *");
        assert_eq!(config.heartbeat_url, None);
        assert!(!config.superhuman_links);
        assert_eq!(config.openai_model, "gpt-4o");
        assert_eq!(config.openai_base_url, "https://api.openai.com/v1");
        assert!(config.token_path.ends_with("gmail-tokens.json"));
        assert!(config.credentials_path.ends_with("credentials.json"));
    }

    #[test]
    fn test_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("DIGEST_DAYS", "3"),
            ("SCHEDULE", "30 7 * * *"),
            ("HEARTBEAT_URL", "https://hc-ping.com/abc"),
            ("DIGEST_SUPERHUMAN", "Yes"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
            ("DIGEST_TOKEN_PATH", "/data/token.json"),
            ("DIGEST_CREDENTIALS_PATH", "/data/credentials.json"),
        ]);
        let config = DigestConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.lookback_days, 3);
        assert_eq!(config.schedule, "30 7 * * *");
        assert_eq!(config.heartbeat_url.as_deref(), Some("https://hc-ping.com/abc"));
        assert!(config.superhuman_links);
        assert_eq!(config.openai_model, "gpt-4o-mini");
        assert_eq!(config.token_path, PathBuf::from("/data/token.json"));
        assert_eq!(config.credentials_path, PathBuf::from("/data/credentials.json"));
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([("HEARTBEAT_URL", ""), ("SCHEDULE", "  ")]);
        let config = DigestConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.heartbeat_url, None);
        assert_eq!(config.schedule, DEFAULT_SCHEDULE);
    }

    #[test]
    fn test_missing_destination_fails() {
        let err = DigestConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "k")])).unwrap_err();
        assert!(err.to_string().contains("DIGEST_DESTINATION"));
    }

    #[test]
    fn test_invalid_values_fail() {
        for (key, value) in [
            ("DIGEST_DAYS", "0"),
            ("DIGEST_DAYS", "two"),
            ("DIGEST_SUPERHUMAN", "maybe"),
            ("HEARTBEAT_URL", "not a url"),
        ] {
            let mut pairs = REQUIRED.to_vec();
            pairs.push((key, value));
            let err = DigestConfig::from_lookup(lookup(&pairs)).unwrap_err();
            assert!(
                matches!(err.downcast_ref::<DigestError>(), Some(DigestError::InvalidConfig { .. })),
                "{key}={value} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_installed_credentials() {
        let json = r#"{
            "installed": {
                "client_id": "test-client-id.apps.googleusercontent.com",
                "client_secret": "test-secret",
                "auth_uri": "https://accounts.google.com/o/oauth2/auth",
                "token_uri": "https://oauth2.googleapis.com/token"
            }
        }"#;

        let creds = GmailCredentials::from_json(json).unwrap();
        assert_eq!(creds.client_id, "test-client-id.apps.googleusercontent.com");
        assert_eq!(creds.client_secret, "test-secret");
    }

    #[test]
    fn test_parse_web_credentials() {
        let json = r#"{
            "web": {
                "client_id": "web-client-id.apps.googleusercontent.com",
                "client_secret": "web-secret"
            }
        }"#;

        let creds = GmailCredentials::from_json(json).unwrap();
        assert_eq!(creds.client_id, "web-client-id.apps.googleusercontent.com");
        assert_eq!(creds.client_secret, "web-secret");
    }

    #[test]
    fn test_credentials_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("credentials.json");
        std::fs::write(&path, r#"{"installed":{"client_id":"a","client_secret":"b"}}"#).unwrap();
        let creds = GmailCredentials::load(&path).unwrap();
        assert_eq!(creds.client_id, "a");
    }

    #[test]
    fn test_invalid_json() {
        let json = r#"{ "other": {} }"#;
        assert!(GmailCredentials::from_json(json).is_err());
    }
}
