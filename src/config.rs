use leptos::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::refresh::BackgroundErrors;

pub const DEFAULT_REFRESH_SECS: u64 = 30;

/// How widgets refresh in the background. Shared by every widget on the
/// page so the error policy is the same everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSettings {
    pub interval_secs: u64,
    pub background_errors: BackgroundErrors,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_REFRESH_SECS,
            background_errors: BackgroundErrors::Suppress,
        }
    }
}

impl RefreshSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),
    #[error("Invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Server-side settings, read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    /// Origin of the dashboard API, e.g. `http://localhost:8000`.
    pub backend_url: String,
    pub refresh: RefreshSettings,
}

impl ServerSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend_url = get("BACKEND_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("BACKEND_URL"))?
            .trim_end_matches('/')
            .to_string();

        let interval_secs = match get("REFRESH_INTERVAL_SECS") {
            None => DEFAULT_REFRESH_SECS,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(0) => {
                    return Err(ConfigError::Invalid {
                        var: "REFRESH_INTERVAL_SECS",
                        value: raw,
                        reason: "must be greater than zero".to_string(),
                    })
                }
                Ok(secs) => secs,
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        var: "REFRESH_INTERVAL_SECS",
                        value: raw,
                        reason: e.to_string(),
                    })
                }
            },
        };

        let background_errors = match get("BACKGROUND_ERRORS") {
            None => BackgroundErrors::default(),
            Some(raw) => raw.parse().map_err(|reason| ConfigError::Invalid {
                var: "BACKGROUND_ERRORS",
                value: raw.clone(),
                reason,
            })?,
        };

        Ok(Self {
            backend_url,
            refresh: RefreshSettings {
                interval_secs,
                background_errors,
            },
        })
    }
}

#[server(GetRefreshSettings, "/rpc")]
pub async fn get_refresh_settings() -> Result<RefreshSettings, ServerFnError> {
    use crate::state::AppState;

    let state = use_context::<AppState>()
        .ok_or_else(|| ServerFnError::new("app state not found"))?;
    Ok(state.settings.refresh)
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

    #[test]
    fn test_defaults() {
        let settings = ServerSettings::from_lookup(lookup(&[("BACKEND_URL", "http://api:8000/")])).unwrap();
        assert_eq!(settings.backend_url, "http://api:8000");
        assert_eq!(settings.refresh, RefreshSettings::default());
        assert_eq!(settings.refresh.interval(), Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let settings = ServerSettings::from_lookup(lookup(&[
            ("BACKEND_URL", "http://api:8000"),
            ("REFRESH_INTERVAL_SECS", "120"),
            ("BACKGROUND_ERRORS", "surface"),
        ]))
        .unwrap();
        assert_eq!(settings.refresh.interval_secs, 120);
        assert_eq!(settings.refresh.background_errors, BackgroundErrors::Surface);
    }

    #[test]
    fn test_missing_backend() {
        assert_eq!(
            ServerSettings::from_lookup(lookup(&[])),
            Err(ConfigError::Missing("BACKEND_URL"))
        );
    }

    #[test]
    fn test_invalid_values() {
        let zero = ServerSettings::from_lookup(lookup(&[
            ("BACKEND_URL", "http://api"),
            ("REFRESH_INTERVAL_SECS", "0"),
        ]));
        assert!(matches!(zero, Err(ConfigError::Invalid { var: "REFRESH_INTERVAL_SECS", .. })));

        let policy = ServerSettings::from_lookup(lookup(&[
            ("BACKEND_URL", "http://api"),
            ("BACKGROUND_ERRORS", "loud"),
        ]));
        assert!(matches!(policy, Err(ConfigError::Invalid { var: "BACKGROUND_ERRORS", .. })));
    }
}
