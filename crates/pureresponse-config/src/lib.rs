//! Profile configuration for the PureResponse client.
//!
//! TOML profiles layered with `PURERESPONSE_` environment overrides,
//! password resolution (env var, system keyring, plaintext) and translation
//! to `pureresponse_core::ClientConfig`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use pureresponse_core::{AccountTier, ClientConfig, Endpoint, ScheduleDelay};

const KEYRING_SERVICE: &str = "pureresponse";
const ENV_PREFIX: &str = "PURERESPONSE_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named account profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Look up `name`, or the default profile when `name` is `None`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get_key_value(name)
            .map(|(k, p)| (k.as_str(), p))
            .ok_or_else(|| ConfigError::Validation {
                field: "profile".into(),
                reason: format!("no profile named '{name}'"),
            })
    }
}

/// Values a profile inherits when it does not set its own.
#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_tier")]
    pub tier: String,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_schedule_delay")]
    pub schedule_delay_minutes: i64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            tier: default_tier(),
            endpoint: default_endpoint(),
            schedule_delay_minutes: default_schedule_delay(),
        }
    }
}

fn default_tier() -> String {
    AccountTier::default().to_string()
}
fn default_endpoint() -> String {
    "rpc-literal-unbranded".into()
}
fn default_schedule_delay() -> i64 {
    3
}

/// A named PureResponse account.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// API username.
    pub username: Option<String>,

    /// Password (plaintext, prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Account tier: "lite", "pro" or "expert", any case.
    pub tier: Option<String>,

    /// Named endpoint (e.g. "rpc-encoded-branded") or a WSDL URL.
    pub endpoint: Option<String>,

    /// Default delay before a list delivery goes out.
    pub schedule_delay_minutes: Option<i64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("uk.co", "pure360", "pureresponse").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("pureresponse");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file plus environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load Config from `path` plus environment. A missing file is not an
/// error; defaults and environment still apply.
///
/// Nested keys use a double underscore, e.g.
/// `PURERESPONSE_PROFILES__DEFAULT__TIER=pro`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Username from the profile, falling back to `PURERESPONSE_USERNAME`.
pub fn resolve_username(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    profile
        .username
        .clone()
        .or_else(|| std::env::var(format!("{ENV_PREFIX}USERNAME")).ok())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// Resolve the account password from the credential chain.
pub fn resolve_password(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env -> env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password")) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `ClientConfig` from a profile, filling gaps from `defaults`.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let tier_str = profile.tier.as_deref().unwrap_or(&defaults.tier);
    let tier: AccountTier = tier_str.parse().map_err(|_| ConfigError::Validation {
        field: "tier".into(),
        reason: format!("expected 'lite', 'pro', or 'expert', got '{tier_str}'"),
    })?;

    let endpoint_str = profile.endpoint.as_deref().unwrap_or(&defaults.endpoint);
    let endpoint: Endpoint = endpoint_str
        .parse()
        .map_err(|e: url::ParseError| ConfigError::Validation {
            field: "endpoint".into(),
            reason: format!("'{endpoint_str}' is neither a known endpoint nor a URL ({e})"),
        })?;

    let delay_minutes = profile
        .schedule_delay_minutes
        .unwrap_or(defaults.schedule_delay_minutes);
    if delay_minutes < 0 {
        return Err(ConfigError::Validation {
            field: "schedule_delay_minutes".into(),
            reason: format!("must not be negative, got {delay_minutes}"),
        });
    }

    let username = resolve_username(profile, profile_name)?;
    let password = resolve_password(profile, profile_name)?;

    Ok(ClientConfig::new(username, password)
        .with_tier(tier)
        .with_endpoint(endpoint)
        .with_schedule_delay(ScheduleDelay::minutes(delay_minutes)))
}

/// Load config and resolve `name` (or the default profile) in one go.
pub fn load_client_config(name: Option<&str>) -> Result<ClientConfig, ConfigError> {
    let config = load_config()?;
    let (profile_name, profile) = config.profile(name)?;
    profile_to_client_config(profile, profile_name, &config.defaults)
}
