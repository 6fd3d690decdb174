use crate::error::FixerError;
use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use url::Url;

pub const SUPABASE_URL_VAR: &str = "SUPABASE_URL";
pub const SERVICE_ROLE_KEY_VAR: &str = "SUPABASE_SERVICE_ROLE_KEY";

/// Credentials are opaque and bypass figment's value parsing.
const RAW_KEYS: [(&str, &str); 2] = [
    (SUPABASE_URL_VAR, "supabase_url"),
    (SERVICE_ROLE_KEY_VAR, "supabase_service_role_key"),
];

const ENV_KEYS: &[&str] = &["LOGLEVEL", "PROXY", "REQUEST_TIMEOUT_SECS"];

/// Raw view of the environment before validation.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    supabase_url: Option<String>,
    #[serde(default)]
    supabase_service_role_key: Option<String>,
    #[serde(default = "default_loglevel")]
    loglevel: String,
    #[serde(default)]
    proxy: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,
}

fn default_loglevel() -> String {
    "info".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Service-role secret. Never printed in full.
#[derive(Clone)]
pub struct ServiceRoleKey(String);

impl ServiceRoleKey {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ServiceRoleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ServiceRoleKey(<redacted>)")
    }
}

/// Validated runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Service endpoint. Path always ends with `/` so REST paths join under it.
    pub supabase_url: Url,
    pub service_role_key: ServiceRoleKey,
    pub loglevel: String,
    pub proxy: Option<Url>,
    /// Must be at least one second; zero is rejected at load time.
    pub request_timeout: Duration,
}

impl Config {
    /// Load from the process environment (after `.env` has been applied).
    pub fn from_env() -> Result<Self, FixerError> {
        let figment = RAW_KEYS.iter().fold(
            Figment::new().merge(Env::raw().only(ENV_KEYS)),
            |fig, (var, key)| match dotenvy::var(var) {
                Ok(value) => fig.merge(Serialized::default(key, value)),
                Err(_) => fig,
            },
        );
        Self::from_figment(figment)
    }

    pub fn from_figment(figment: Figment) -> Result<Self, FixerError> {
        let raw: RawConfig = figment.extract()?;

        let url = non_empty(raw.supabase_url);
        let key = non_empty(raw.supabase_service_role_key);
        let (Some(url), Some(key)) = (url, key) else {
            return Err(FixerError::MissingCredentials);
        };

        let mut supabase_url = Url::parse(&url)?;
        if !supabase_url.path().ends_with('/') {
            let path = format!("{}/", supabase_url.path());
            supabase_url.set_path(&path);
        }

        if raw.request_timeout_secs == 0 {
            return Err(FixerError::ZeroTimeout);
        }

        let proxy = non_empty(raw.proxy)
            .map(|p| Url::parse(&p))
            .transpose()?;

        Ok(Self {
            supabase_url,
            service_role_key: ServiceRoleKey(key),
            loglevel: raw.loglevel,
            proxy,
            request_timeout: Duration::from_secs(raw.request_timeout_secs),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
