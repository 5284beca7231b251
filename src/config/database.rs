use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Direct database access to the console's backing store.
///
/// Only the soft-delete reconciler uses it; leaving `url` unset disables recovery.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Connection string (`postgres://...`).
    /// TOML: `database.url`. Env: `JITSU_DATABASE_URL`.
    #[serde(default)]
    pub url: Option<String>,

    /// Schema that qualifies the console tables; empty means unqualified.
    /// TOML: `database.schema`. Env: `JITSU_DATABASE_SCHEMA`. Default: `newjitsu`.
    #[serde(default = "default_schema")]
    pub schema: String,

    /// Pool size cap.
    /// TOML: `database.max_connections`. Default: `2`.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// How long a purge waits for a pooled connection.
    /// TOML: `database.acquire_timeout_secs`. Default: `10`.
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Non-empty connection string, if one was supplied.
    pub fn connection_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn qualified_schema(&self) -> Option<&str> {
        let schema = self.schema.trim();
        (!schema.is_empty()).then_some(schema)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs.max(1))
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            schema: default_schema(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("schema", &self.schema)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .finish()
    }
}

fn default_schema() -> String {
    "newjitsu".to_string()
}

fn default_max_connections() -> u32 {
    2
}

fn default_acquire_timeout_secs() -> u64 {
    10
}
