use anyhow::{bail, Context};
use std::env;

use crate::mtg::api::{DEFAULT_HOST, DEFAULT_PATH};

const DEFAULT_SCHEME: &str = "https";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub scheme: String,
    pub host: String,
    pub path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            scheme: DEFAULT_SCHEME.to_string(),
            host: DEFAULT_HOST.to_string(),
            path: DEFAULT_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// The public API at api.magicthegathering.io.
    Public,
    /// A mirror or stub named by `MTG_API_HOST`.
    Local,
}

impl Platform {
    pub fn detect() -> Self {
        if env::var_os("MTG_API_HOST").is_some() {
            Platform::Local
        } else {
            Platform::Public
        }
    }

    pub fn get_api_config(&self) -> anyhow::Result<ApiConfig> {
        match self {
            Self::Public => Ok(ApiConfig::default()),
            Self::Local => api_config_from(|name| env::var(name).ok()),
        }
    }
}

fn api_config_from<F>(lookup: F) -> anyhow::Result<ApiConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let get_config_string = |name: &str| {
        lookup(name).with_context(|| format!("Required env var \"{}\" was not set", name))
    };
    let get_or_default = |name: &str, default: &str| {
        lookup(name)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| default.to_string())
    };

    let host = get_config_string("MTG_API_HOST")?;
    let scheme = get_or_default("MTG_API_SCHEME", DEFAULT_SCHEME);
    if scheme != "http" && scheme != "https" {
        bail!(
            "MTG_API_SCHEME must be \"http\" or \"https\", got \"{}\"",
            scheme
        );
    }
    let path = get_or_default("MTG_API_PATH", DEFAULT_PATH);

    Ok(ApiConfig { scheme, host, path })
}
