use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use url::Url;

use crate::client::Credentials;

/// Control-plane connection settings managed by Figment.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleConfig {
    /// Base URL of the console, e.g. `https://jitsu.example.com`.
    /// TOML: `console.url`. Env: `JITSU_CONSOLE_URL`. Required.
    #[serde(default)]
    pub url: Option<Url>,

    /// Session login name.
    /// TOML: `console.username`. Env: `JITSU_USERNAME`.
    #[serde(default, deserialize_with = "deserialize_opt_string_lax")]
    pub username: Option<String>,

    /// Session password.
    /// TOML: `console.password`. Env: `JITSU_PASSWORD`.
    #[serde(default, deserialize_with = "deserialize_opt_string_lax")]
    pub password: Option<String>,

    /// `User-Agent` sent with every request.
    /// TOML: `console.user_agent`. Default: `jitsu-console/<version>`.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout, including credential exchange calls.
    /// TOML: `console.request_timeout_secs`. Default: `30`.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// TCP connect timeout.
    /// TOML: `console.connect_timeout_secs`. Default: `10`.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Optional HTTP proxy for all console traffic.
    /// TOML: `console.proxy`. Example: `http://127.0.0.1:1080`.
    #[serde(default)]
    pub proxy: Option<Url>,
}

impl ConsoleConfig {
    /// Username and password, when both are present and non-empty.
    pub fn credentials(&self) -> Option<Credentials> {
        let username = self.username.as_deref().filter(|s| !s.trim().is_empty())?;
        let password = self.password.as_deref().filter(|s| !s.is_empty())?;
        Some(Credentials::new(username, password))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(1))
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            url: None,
            username: None,
            password: None,
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            proxy: None,
        }
    }
}

impl fmt::Debug for ConsoleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleConfig")
            .field("url", &self.url.as_ref().map(Url::as_str))
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("proxy", &self.proxy.as_ref().map(Url::as_str))
            .finish()
    }
}

fn deserialize_opt_string_lax<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;

    match v {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        _ => Err(serde::de::Error::custom(
            "expected a string or a number for console credentials",
        )),
    }
}

fn default_user_agent() -> String {
    format!("jitsu-console/{}", env!("CARGO_PKG_VERSION"))
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}
