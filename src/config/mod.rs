mod console;
mod database;

pub use console::ConsoleConfig;
pub use database::DatabaseConfig;

use crate::error::ConsoleError;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Client configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Control-plane endpoint and credentials (see `console` table in jitsu.toml).
    #[serde(default)]
    pub console: ConsoleConfig,

    /// Optional direct database access used for soft-delete recovery
    /// (see `database` table in jitsu.toml).
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Log level for `utils::logging::init_tracing` (e.g. "error", "warn", "info", "debug").
    /// TOML: `loglevel`. Env: `JITSU_LOGLEVEL`. Default: `info`.
    #[serde(default = "default_loglevel")]
    pub loglevel: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            console: ConsoleConfig::default(),
            database: DatabaseConfig::default(),
            loglevel: default_loglevel(),
        }
    }
}

pub const DEFAULT_CONFIG_FILE: &str = "jitsu.toml";

const ENV_PREFIX: &str = "JITSU_";

impl Config {
    /// Builds a Figment that merges defaults, an optional TOML file and `JITSU_*` env vars.
    ///
    /// The flat env names are the ones operators already export for the provider
    /// (`JITSU_CONSOLE_URL`, `JITSU_USERNAME`, `JITSU_PASSWORD`, `JITSU_DATABASE_URL`).
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        let file = config_file.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        if file.is_file() {
            figment = figment.merge(Toml::file(file));
        }

        // Keys reach `map` in their original case; figment lowercases them afterwards.
        figment.merge(Env::prefixed(ENV_PREFIX).map(|key| {
            match key.as_str().to_ascii_lowercase().as_str() {
                "console_url" => "console.url".into(),
                "username" => "console.username".into(),
                "password" => "console.password".into(),
                "user_agent" => "console.user_agent".into(),
                "proxy" => "console.proxy".into(),
                "request_timeout_secs" => "console.request_timeout_secs".into(),
                "database_url" => "database.url".into(),
                "database_schema" => "database.schema".into(),
                other => other.to_string().into(),
            }
        }))
    }

    /// Loads configuration (defaults + optional `jitsu.toml` + env) and validates it.
    pub fn load() -> Result<Self, ConsoleError> {
        Self::load_from(None)
    }

    /// Like [`Config::load`], reading the TOML layer from `config_file` instead.
    pub fn load_from(config_file: Option<&Path>) -> Result<Self, ConsoleError> {
        let cfg: Self = Self::figment(config_file)
            .extract()
            .map_err(|err| ConsoleError::Configuration(format!("invalid configuration: {err}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks the fields every session needs. The database URL stays optional.
    pub fn validate(&self) -> Result<(), ConsoleError> {
        let Some(url) = self.console.url.as_ref() else {
            return Err(ConsoleError::Configuration(
                "missing console url: set console.url or JITSU_CONSOLE_URL".to_string(),
            ));
        };

        if url.scheme() != "https" {
            warn!(
                console_url = %url,
                "console url does not use HTTPS; credentials will be sent unencrypted"
            );
        }

        if self.console.credentials().is_none() {
            return Err(ConsoleError::Configuration(
                "missing authentication: set console.username/console.password or \
                 JITSU_USERNAME/JITSU_PASSWORD"
                    .to_string(),
            ));
        }

        Ok(())
    }
}

fn default_loglevel() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn flat_env_names_land_in_their_tables() {
        Jail::expect_with(|jail| {
            jail.set_env("JITSU_CONSOLE_URL", "https://console.example.com");
            jail.set_env("JITSU_USERNAME", "admin@example.com");
            jail.set_env("JITSU_PASSWORD", "hunter2");
            jail.set_env("JITSU_DATABASE_URL", "postgres://u:p@db/jitsu");

            let cfg = Config::load().expect("config loads");
            assert_eq!(
                cfg.console.url.as_ref().map(|u| u.as_str()),
                Some("https://console.example.com/")
            );
            assert_eq!(cfg.console.username.as_deref(), Some("admin@example.com"));
            assert_eq!(cfg.database.url.as_deref(), Some("postgres://u:p@db/jitsu"));
            assert_eq!(cfg.database.schema, "newjitsu");
            assert_eq!(cfg.console.request_timeout_secs, 30);
            Ok(())
        });
    }

    #[test]
    fn toml_file_is_merged_under_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_FILE,
                r#"
                loglevel = "debug"

                [console]
                url = "http://localhost:3000"
                username = "file-user"
                password = "file-pass"
                request_timeout_secs = 5

                [database]
                schema = ""
                "#,
            )?;
            jail.set_env("JITSU_USERNAME", "env-user");

            let cfg = Config::load().expect("config loads");
            assert_eq!(cfg.loglevel, "debug");
            assert_eq!(cfg.console.username.as_deref(), Some("env-user"));
            assert_eq!(cfg.console.password.as_deref(), Some("file-pass"));
            assert_eq!(cfg.console.request_timeout_secs, 5);
            assert!(cfg.database.url.is_none());
            assert!(cfg.database.qualified_schema().is_none());
            Ok(())
        });
    }

    #[test]
    fn uppercase_env_keys_are_remapped_without_validation() {
        Jail::expect_with(|jail| {
            jail.set_env("JITSU_DATABASE_URL", "postgres://db/x");
            jail.set_env("JITSU_DATABASE_SCHEMA", "jitsu_prod");
            jail.set_env("JITSU_LOGLEVEL", "warn");

            let cfg: Config = Config::figment(None).extract()?;
            assert_eq!(cfg.database.url.as_deref(), Some("postgres://db/x"));
            assert_eq!(cfg.database.qualified_schema(), Some("jitsu_prod"));
            assert_eq!(cfg.loglevel, "warn");
            Ok(())
        });
    }

    #[test]
    fn missing_credentials_is_a_configuration_error() {
        Jail::expect_with(|jail| {
            jail.set_env("JITSU_CONSOLE_URL", "https://console.example.com");
            jail.set_env("JITSU_USERNAME", "admin@example.com");

            let err = Config::load().expect_err("password is missing");
            assert!(matches!(err, ConsoleError::Configuration(_)), "{err}");
            Ok(())
        });
    }

    #[test]
    fn missing_console_url_is_a_configuration_error() {
        Jail::expect_with(|_jail| {
            let err = Config::load().expect_err("url is missing");
            assert!(err.to_string().contains("console url"), "{err}");
            Ok(())
        });
    }
}
