// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Client configuration.
//!
//! Settings are layered, later sources overriding earlier ones:
//!
//! 1. Built-in defaults (`timeout = 30`, `max_retries = 3`).
//! 2. `config.toml` in the platform configuration directory, if present:
//!    - Linux: `~/.config/rspace-client/config.toml`
//!    - macOS: `~/Library/Application Support/com.ResearchSpace.rspace-client/config.toml`
//!    - Windows: `C:\Users\<User>\AppData\Roaming\ResearchSpace\rspace-client\config\config.toml`
//! 3. Environment variables `RSPACE_URL`, `RSPACE_API_KEY`, `RSPACE_TIMEOUT`
//!    and `RSPACE_MAX_RETRIES`.
//!
//! ```toml
//! url = "https://rspace.example.org"
//! api_key = "abcdefghijklmnop"
//! timeout = 60
//! ```

use crate::Error;
use config::{Config, Environment, File, FileFormat};
use directories::ProjectDirs;
use log::debug;
use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 3;

#[derive(Default)]
struct Overrides<'a> {
    url: Option<&'a str>,
    api_key: Option<&'a str>,
}

#[derive(Deserialize)]
struct RawConfig {
    url: Option<String>,
    api_key: Option<String>,
    timeout: u64,
    max_retries: u32,
}

/// Connection settings for [`Client`][crate::Client].
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server base URL, for example `https://rspace.example.org`.
    pub url: String,
    /// API key sent in the `apiKey` header.
    pub api_key: String,
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Retries per request for transient failures.
    pub max_retries: u32,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl ClientConfig {
    /// Settings for `url` and `api_key` with default timeout and retries.
    pub fn new(url: &str, api_key: &str) -> Self {
        ClientConfig {
            url: url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
            timeout: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Loads settings from the default configuration file and the
    /// environment.
    pub fn load() -> Result<Self, Error> {
        Self::load_overriding(None, None)
    }

    /// Loads settings like [`load`][Self::load], with `url` and `api_key`
    /// taking precedence over every other source when given. Either value
    /// may fill a setting missing from the file and environment.
    pub fn load_overriding(url: Option<&str>, api_key: Option<&str>) -> Result<Self, Error> {
        Self::load_with(
            Self::default_path().as_deref(),
            Environment::with_prefix("RSPACE"),
            Overrides { url, api_key },
        )
    }

    /// Loads settings from `path` and the environment.
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        Self::load_with(
            Some(path),
            Environment::with_prefix("RSPACE"),
            Overrides::default(),
        )
    }

    /// Location of the user's `config.toml`, if a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "ResearchSpace", "rspace-client")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    fn load_with(
        path: Option<&Path>,
        env: Environment,
        overrides: Overrides<'_>,
    ) -> Result<Self, Error> {
        let mut builder = Config::builder()
            .set_default("timeout", DEFAULT_TIMEOUT_SECS as i64)?
            .set_default("max_retries", i64::from(DEFAULT_MAX_RETRIES))?;
        if let Some(path) = path {
            debug!("Reading configuration from {:?}", path);
            builder = builder
                .add_source(File::new(&path.to_string_lossy(), FileFormat::Toml).required(false));
        }
        let raw: RawConfig = builder
            .add_source(env.try_parsing(true))
            .set_override_option("url", overrides.url)?
            .set_override_option("api_key", overrides.api_key)?
            .build()?
            .try_deserialize()?;

        let url = raw
            .url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| config::ConfigError::NotFound("url".to_string()))?;
        url::Url::parse(&url)?;
        let api_key = raw
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| config::ConfigError::NotFound("api_key".to_string()))?;

        Ok(ClientConfig {
            timeout: raw.timeout,
            max_retries: raw.max_retries,
            ..ClientConfig::new(&url, &api_key)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("RSPACE").source(Some(vars))
    }

    #[test]
    fn test_environment_only() {
        let config = ClientConfig::load_with(
            None,
            env(&[
                ("RSPACE_URL", "https://rspace.example.org/"),
                ("RSPACE_API_KEY", "secret"),
            ]),
            Overrides::default(),
        )
        .unwrap();
        assert_eq!(config.url, "https://rspace.example.org");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.timeout, 30);
        assert_eq!(config.max_retries, 3);
        assert!(!format!("{:?}", config).contains("secret"));
    }

    #[test]
    fn test_file_overridden_by_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "url = \"https://file.example.org\"\napi_key = \"from-file\"\ntimeout = 90\n",
        )
        .unwrap();

        let config = ClientConfig::load_with(
            Some(&path),
            env(&[("RSPACE_API_KEY", "from-env"), ("RSPACE_MAX_RETRIES", "7")]),
            Overrides::default(),
        )
        .unwrap();
        assert_eq!(config.url, "https://file.example.org");
        assert_eq!(config.api_key, "from-env");
        assert_eq!(config.timeout, 90);
        assert_eq!(config.timeout_duration(), Duration::from_secs(90));
        assert_eq!(config.max_retries, 7);
    }

    #[test]
    fn test_missing_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load_with(
            Some(&dir.path().join("absent.toml")),
            env(&[("RSPACE_URL", "http://localhost:8080"), ("RSPACE_API_KEY", "k")]),
            Overrides::default(),
        )
        .unwrap();
        assert_eq!(config.url, "http://localhost:8080");
    }

    #[test]
    fn test_missing_credentials() {
        let err = ClientConfig::load_with(
            None,
            env(&[("RSPACE_URL", "http://localhost")]),
            Overrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));

        let err = ClientConfig::load_with(
            None,
            env(&[("RSPACE_API_KEY", "k")]),
            Overrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));

        let err = ClientConfig::load_with(
            None,
            env(&[("RSPACE_URL", "not a url"), ("RSPACE_API_KEY", "k")]),
            Overrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::UrlParseError(_)));
    }

    #[test]
    fn test_overrides_fill_missing_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_key = \"from-file\"\n").unwrap();

        let config = ClientConfig::load_with(
            Some(&path),
            env(&[]),
            Overrides {
                url: Some("http://127.0.0.1:9"),
                api_key: None,
            },
        )
        .unwrap();
        assert_eq!(config.url, "http://127.0.0.1:9");
        assert_eq!(config.api_key, "from-file");

        let config = ClientConfig::load_with(
            Some(&path),
            env(&[("RSPACE_URL", "https://env.example.org")]),
            Overrides {
                url: Some("https://flag.example.org"),
                api_key: Some("from-flag"),
            },
        )
        .unwrap();
        assert_eq!(config.url, "https://flag.example.org");
        assert_eq!(config.api_key, "from-flag");
    }
}
