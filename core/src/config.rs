//! Application configuration
//!
//! Loaded from a TOML document. Every section has defaults so an empty file
//! parses; only the backend URL and anon key must be supplied before use.

use std::time::Duration;

use passport_types::IdentityMode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::map::PlaneBounds;
use crate::serde_defaults::*;

/// Errors during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration")]
    Parse(#[from] toml::de::Error),

    #[error("backend url is not configured")]
    MissingBackendUrl,

    #[error("backend anon key is not configured")]
    MissingAnonKey,

    #[error("invalid backend url '{url}'")]
    InvalidBackendUrl { url: String },

    #[error("map bounds must have positive spans")]
    InvalidMapBounds,
}

// ─────────────────────────────────────────────────────────────────────────────
// Sections
// ─────────────────────────────────────────────────────────────────────────────

/// Hosted backend endpoint and public (anon) API key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub anon_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Pause after a QR code that matches no venue before decoding resumes
    #[serde(default = "default_resume_delay_ms")]
    pub resume_delay_ms: u64,
    /// Camera facing-mode hint passed to the media device request
    #[serde(default = "default_facing_mode")]
    pub facing_mode: String,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            resume_delay_ms: default_resume_delay_ms(),
            facing_mode: default_facing_mode(),
        }
    }
}

/// Local storage key names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageKeys {
    #[serde(default = "default_device_id_key")]
    pub device_id: String,
    #[serde(default = "default_remembered_email_key")]
    pub remembered_email: String,
    #[serde(default = "default_auth_session_key")]
    pub auth_session: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            device_id: default_device_id_key(),
            remembered_email: default_remembered_email_key(),
            auth_session: default_auth_session_key(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Path on the app's origin that email confirmation links redirect to
    #[serde(default = "default_callback_path")]
    pub callback_path: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            callback_path: default_callback_path(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// AppConfig
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub identity: IdentityMode,
    #[serde(default)]
    pub map: PlaneBounds,
    #[serde(default)]
    pub scanner: ScannerConfig,
    #[serde(default)]
    pub storage: StorageKeys,
    #[serde(default)]
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Parse a TOML document. Does not validate; call [`AppConfig::validate`].
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Replace backend fields with non-empty overrides (build-time env vars).
    pub fn with_backend_overrides(mut self, url: Option<&str>, anon_key: Option<&str>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.backend.url = url.trim().to_string();
        }
        if let Some(key) = anon_key.filter(|k| !k.trim().is_empty()) {
            self.backend.anon_key = key.trim().to_string();
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.backend.url.trim();
        if url.is_empty() {
            return Err(ConfigError::MissingBackendUrl);
        }
        if reqwest::Url::parse(url).is_err() {
            return Err(ConfigError::InvalidBackendUrl {
                url: url.to_string(),
            });
        }
        if self.backend.anon_key.trim().is_empty() {
            return Err(ConfigError::MissingAnonKey);
        }
        if self.map.lon_span <= 0.0 || self.map.lat_span <= 0.0 {
            return Err(ConfigError::InvalidMapBounds);
        }
        Ok(())
    }

    pub fn resume_delay(&self) -> Duration {
        Duration::from_millis(self.scanner.resume_delay_ms)
    }

    /// Full email-confirmation redirect for the given page origin.
    pub fn auth_redirect(&self, origin: &str) -> String {
        format!(
            "{}/{}",
            origin.trim_end_matches('/'),
            self.auth.callback_path.trim_start_matches('/')
        )
    }
}
