//! Database configuration - environment and override file loading
//!
//! Configuration is loaded from environment variables:
//! - `DB_IP`: database host
//! - `DB_PORT`: database port
//! - `DB_USER` / `DB_PASSWORD`: credentials
//! - `DB_NAME`: database name
//! - `DB_SSLMODE`: TLS mode (default: `disable`)
//!
//! An optional `.env` file is loaded first; variables already present in the
//! process environment take precedence over it.

use std::fmt;
use std::path::Path;

use tracing::{debug, info, warn};

/// Default override file, relative to the working directory
pub const DEFAULT_ENV_FILE: &str = ".env";

/// SSL mode used when `DB_SSLMODE` is unset or empty.
///
/// WARNING: this disables TLS to the database. It is kept as the default for
/// compatibility with existing deployments; set `DB_SSLMODE=require` (or
/// stricter) anywhere the database is not on a trusted network.
pub const DEFAULT_SSLMODE: &str = "disable";

pub const ENV_HOST: &str = "DB_IP";
pub const ENV_PORT: &str = "DB_PORT";
pub const ENV_USER: &str = "DB_USER";
pub const ENV_PASSWORD: &str = "DB_PASSWORD";
pub const ENV_NAME: &str = "DB_NAME";
pub const ENV_SSLMODE: &str = "DB_SSLMODE";

/// Load key/value pairs from an override file into the process environment.
///
/// A missing or unreadable file is not an error; a warning is logged and the
/// system environment is used as-is. Returns whether the file was loaded.
pub fn load_env_file(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();

    match dotenvy::from_path(path) {
        Ok(()) => {
            info!(path = %path.display(), "Loaded environment override file");
            true
        }
        Err(e) if e.not_found() => {
            warn!(
                path = %path.display(),
                "Environment override file not found, using system environment"
            );
            false
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Failed to load environment override file, using system environment"
            );
            false
        }
    }
}

/// Connection descriptor for the PostgreSQL store.
///
/// Values are carried verbatim from the environment: nothing here checks that
/// they are non-empty or well-formed. Bad values surface when connecting.
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: String,
    pub user: String,
    pub password: String,
    pub dbname: String,
    pub sslmode: String,
}

impl DbConfig {
    /// Resolve the descriptor: load the override file, then read the environment.
    pub fn resolve(env_file: impl AsRef<Path>) -> Self {
        load_env_file(env_file);
        Self::from_env()
    }

    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable lookup.
    ///
    /// Absent variables become empty strings, except `sslmode` which falls
    /// back to [`DEFAULT_SSLMODE`] when absent or empty.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).unwrap_or_default();

        let sslmode = match get(ENV_SSLMODE) {
            mode if mode.is_empty() => DEFAULT_SSLMODE.to_string(),
            mode => mode,
        };

        let config = Self {
            host: get(ENV_HOST),
            port: get(ENV_PORT),
            user: get(ENV_USER),
            password: get(ENV_PASSWORD),
            dbname: get(ENV_NAME),
            sslmode,
        };
        debug!(?config, "Resolved database configuration");
        config
    }

    /// Whether TLS to the database is turned off
    pub fn is_insecure(&self) -> bool {
        self.sslmode == DEFAULT_SSLMODE
    }

    /// Key/value connection string: `host=.. user=.. password=.. dbname=.. port=.. sslmode=..`
    ///
    /// The driver is configured from the fields directly; this rendering is
    /// what gets logged, via [`DbConfig::redacted_connection_string`].
    pub fn connection_string(&self) -> String {
        self.render(&self.password)
    }

    /// Connection string with the password masked, for logs
    pub fn redacted_connection_string(&self) -> String {
        self.render(REDACTED)
    }

    fn render(&self, password: &str) -> String {
        format!(
            "host={} user={} password={} dbname={} port={} sslmode={}",
            self.host, self.user, password, self.dbname, self.port, self.sslmode
        )
    }
}

const REDACTED: &str = "<redacted>";

// Keeps the password out of logs.
impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &REDACTED)
            .field("dbname", &self.dbname)
            .field("sslmode", &self.sslmode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn reads_all_fields() {
        let config = DbConfig::from_lookup(lookup_from(&[
            ("DB_IP", "10.0.0.5"),
            ("DB_PORT", "5433"),
            ("DB_USER", "reader"),
            ("DB_PASSWORD", "s3cret"),
            ("DB_NAME", "bench"),
            ("DB_SSLMODE", "require"),
        ]));

        assert_eq!(config.host, "10.0.0.5");
        assert_eq!(config.port, "5433");
        assert_eq!(config.user, "reader");
        assert_eq!(config.password, "s3cret");
        assert_eq!(config.dbname, "bench");
        assert_eq!(config.sslmode, "require");
        assert!(!config.is_insecure());
    }

    #[test]
    fn sslmode_defaults_to_disable_when_absent() {
        let config = DbConfig::from_lookup(lookup_from(&[("DB_IP", "localhost")]));
        assert_eq!(config.sslmode, "disable");
        assert!(config.is_insecure());
    }

    #[test]
    fn sslmode_defaults_to_disable_when_empty() {
        let config = DbConfig::from_lookup(lookup_from(&[("DB_SSLMODE", "")]));
        assert_eq!(config.sslmode, "disable");
    }

    #[test]
    fn missing_values_become_empty_strings() {
        let config = DbConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.host, "");
        assert_eq!(config.port, "");
        assert_eq!(config.user, "");
        assert_eq!(config.password, "");
        assert_eq!(config.dbname, "");
    }

    #[test]
    fn connection_string_preserves_values_verbatim() {
        let config = DbConfig::from_lookup(lookup_from(&[
            ("DB_IP", "db.internal"),
            ("DB_PORT", "5432"),
            ("DB_USER", "app"),
            ("DB_PASSWORD", "pw"),
            ("DB_NAME", "prod"),
            ("DB_SSLMODE", "verify-full"),
        ]));

        assert_eq!(
            config.connection_string(),
            "host=db.internal user=app password=pw dbname=prod port=5432 sslmode=verify-full"
        );
    }

    #[test]
    fn redacted_connection_string_masks_only_password() {
        let config = DbConfig::from_lookup(lookup_from(&[
            ("DB_IP", "db.internal"),
            ("DB_PORT", "5432"),
            ("DB_USER", "app"),
            ("DB_PASSWORD", "hunter2"),
            ("DB_NAME", "prod"),
        ]));

        assert_eq!(
            config.redacted_connection_string(),
            "host=db.internal user=app password=<redacted> dbname=prod port=5432 sslmode=disable"
        );
    }

    #[test]
    fn debug_redacts_password() {
        let config = DbConfig::from_lookup(lookup_from(&[("DB_PASSWORD", "hunter2")]));
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn missing_env_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!load_env_file(dir.path().join("absent.env")));
    }

    #[test]
    fn env_file_populates_environment() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "DATAQ_TEST_ENV_FILE_VALUE=from-file").unwrap();

        assert!(load_env_file(file.path()));
        assert_eq!(
            std::env::var("DATAQ_TEST_ENV_FILE_VALUE").as_deref(),
            Ok("from-file")
        );
    }
}
