use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

use crate::common::ConversationContext;

pub const DEFAULT_CONFIG_PATH: &str = "config/help_chat.json";
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server_url: String,
    pub poll_interval_ms: u64,
    pub request_timeout_ms: Option<u64>,
    pub help_id: Option<i64>,
    pub me: Option<String>,
    pub peer: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            request_timeout_ms: None,
            help_id: None,
            me: None,
            peer: None,
        }
    }
}

/// Values given on the command line; each one wins over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub server_url: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub help_id: Option<i64>,
    pub me: Option<String>,
    pub peer: Option<String>,
}

/// Everything the client needs, validated once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub poll_interval: Duration,
    pub request_timeout: Option<Duration>,
    pub context: ConversationContext,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing `{0}`; pass it on the command line or set it in the config file")]
    Missing(&'static str),

    #[error("`{0}` must not be blank")]
    Blank(&'static str),

    #[error("invalid server url `{url}`: {reason}")]
    InvalidServerUrl { url: String, reason: String },

    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

pub fn resolve(config: AppConfig, overrides: Overrides) -> Result<Settings, ConfigError> {
    let server_url = overrides.server_url.unwrap_or(config.server_url);
    if let Err(err) = Url::parse(&server_url) {
        return Err(ConfigError::InvalidServerUrl {
            url: server_url,
            reason: err.to_string(),
        });
    }

    let poll_interval_ms = overrides.poll_interval_ms.unwrap_or(config.poll_interval_ms);
    if poll_interval_ms == 0 {
        return Err(ConfigError::ZeroPollInterval);
    }

    let help_id = overrides
        .help_id
        .or(config.help_id)
        .ok_or(ConfigError::Missing("help_id"))?;
    let me = participant("me", overrides.me.or(config.me))?;
    let peer = participant("peer", overrides.peer.or(config.peer))?;

    Ok(Settings {
        server_url,
        poll_interval: Duration::from_millis(poll_interval_ms),
        request_timeout: config.request_timeout_ms.map(Duration::from_millis),
        context: ConversationContext { help_id, me, peer },
    })
}

fn participant(field: &'static str, value: Option<String>) -> Result<String, ConfigError> {
    let value = value.ok_or(ConfigError::Missing(field))?;
    if value.trim().is_empty() {
        return Err(ConfigError::Blank(field));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn full_config() -> AppConfig {
        AppConfig {
            help_id: Some(12),
            me: Some("alice".to_string()),
            peer: Some("bob".to_string()),
            ..AppConfig::default()
        }
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        assert_eq!(load_config(path.to_str().unwrap()), AppConfig::default());
    }

    #[test]
    fn unparsable_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        assert_eq!(
            load_config(file.path().to_str().unwrap()),
            AppConfig::default()
        );
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"help_id": 4, "me": "alice", "peer": "bob"}}"#).unwrap();

        let config = load_config(file.path().to_str().unwrap());
        assert_eq!(config.help_id, Some(4));
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
    }

    #[test]
    fn resolve_uses_file_values() {
        let settings = resolve(full_config(), Overrides::default()).unwrap();

        assert_eq!(settings.poll_interval, Duration::from_secs(2));
        assert_eq!(settings.request_timeout, None);
        assert_eq!(
            settings.context,
            ConversationContext {
                help_id: 12,
                me: "alice".to_string(),
                peer: "bob".to_string(),
            }
        );
    }

    #[test]
    fn command_line_wins_over_file() {
        let overrides = Overrides {
            server_url: Some("http://chat.local:8080".to_string()),
            poll_interval_ms: Some(500),
            help_id: Some(99),
            me: Some("carol".to_string()),
            peer: None,
        };
        let settings = resolve(full_config(), overrides).unwrap();

        assert_eq!(settings.server_url, "http://chat.local:8080");
        assert_eq!(settings.poll_interval, Duration::from_millis(500));
        assert_eq!(settings.context.help_id, 99);
        assert_eq!(settings.context.me, "carol");
        assert_eq!(settings.context.peer, "bob");
    }

    #[test]
    fn context_fields_are_required() {
        let err = resolve(AppConfig::default(), Overrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("help_id")));

        let config = AppConfig {
            peer: Some("   ".to_string()),
            ..full_config()
        };
        let err = resolve(config, Overrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Blank("peer")));
    }

    #[test]
    fn rejects_bad_url_and_zero_interval() {
        let config = AppConfig {
            server_url: "not a url".to_string(),
            ..full_config()
        };
        assert!(matches!(
            resolve(config, Overrides::default()),
            Err(ConfigError::InvalidServerUrl { .. })
        ));

        let config = AppConfig {
            poll_interval_ms: 0,
            ..full_config()
        };
        assert!(matches!(
            resolve(config, Overrides::default()),
            Err(ConfigError::ZeroPollInterval)
        ));
    }
}
