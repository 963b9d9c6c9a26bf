//! Startup configuration: which backend the gateway talks to.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Bundled defaults, compiled in so web and mobile builds need no `.env`.
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

pub const LOCAL_API_BASE: &str = "http://localhost:5000";
pub const DEFAULT_REMOTE_API_BASE: &str = "https://parley-api.herokuapp.com";

const REMOTE_API_KEY: &str = "PARLEY_REMOTE_API";
#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
const HOST_KEY: &str = "PARLEY_HOST";

static BUNDLED: Lazy<HashMap<String, String>> = Lazy::new(|| parse_env_file(BUNDLED_CONFIG));

/// Load `.env` into the process environment (native builds only).
pub fn load_dotenv() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(err) = dotenvy::dotenv() {
            tracing::debug!("no .env loaded: {}", err);
        }
    }
}

/// Parse `KEY=VALUE` lines, skipping comments and blanks.
pub fn parse_env_file(contents: &str) -> HashMap<String, String> {
    let mut values = HashMap::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim();
            if !value.is_empty() {
                values.insert(key.trim().to_string(), value.to_string());
            }
        }
    }
    values
}

/// Process environment first, then the bundled file.
pub fn config_value(key: &str) -> Option<String> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Ok(value) = std::env::var(key)
            && !value.trim().is_empty()
        {
            return Some(value);
        }
    }
    BUNDLED.get(key).cloned()
}

pub fn is_local_host(host: &str) -> bool {
    let host = host.trim().trim_start_matches('[').trim_end_matches(']');
    host.eq_ignore_ascii_case("localhost") || host == "127.0.0.1" || host == "::1"
}

/// Name of the host the app is running on.
pub fn current_host() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|window| window.location().hostname().ok())
            .unwrap_or_default()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        config_value(HOST_KEY).unwrap_or_else(|| "localhost".to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    /// Local backend for local hosts, the remote one otherwise.
    pub fn for_host(host: &str, remote_base: &str) -> Self {
        let base_url = if is_local_host(host) {
            LOCAL_API_BASE
        } else {
            remote_base
        };
        Self {
            base_url: base_url.to_string(),
        }
    }

    /// Resolve once at startup from the running host.
    pub fn detect() -> Self {
        let host = current_host();
        let remote =
            config_value(REMOTE_API_KEY).unwrap_or_else(|| DEFAULT_REMOTE_API_BASE.to_string());
        let config = Self::for_host(&host, &remote);
        tracing::info!(%host, base_url = %config.base_url, "selected API endpoint");
        config
    }
}
