use serde::{Deserialize, Serialize};

use crate::error::ClientError;

pub const API_URL_ENV: &str = "GLYCO_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Where the prediction service lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL without a trailing slash, e.g. `http://localhost:8000`.
    pub api_base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(api_base_url: &str) -> Result<Self, ClientError> {
        let trimmed = api_base_url.trim().trim_end_matches('/');
        let rest = trimmed
            .strip_prefix("http://")
            .or_else(|| trimmed.strip_prefix("https://"))
            .ok_or_else(|| ClientError::InvalidBaseUrl(format!("{api_base_url} (expected http:// or https://)")))?;
        let host = rest.split('/').next().unwrap_or_default();
        if host.is_empty() {
            return Err(ClientError::InvalidBaseUrl(format!("{api_base_url} (missing host)")));
        }
        Ok(Self {
            api_base_url: trimmed.to_string(),
        })
    }

    /// Config from the value of [`API_URL_ENV`]. Unset or blank values use
    /// [`DEFAULT_API_URL`].
    pub fn from_env_value(value: Option<&str>) -> Result<Self, ClientError> {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => Self::new(v),
            _ => Ok(Self::default()),
        }
    }

    pub fn predict_url(&self) -> String {
        format!("{}/predict", self.api_base_url)
    }

    pub fn health_url(&self) -> String {
        format!("{}/", self.api_base_url)
    }
}
