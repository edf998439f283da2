//! API server configuration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Duration;
use jsonwebtoken::Algorithm;
use pos_core::auth::TokenCodec;
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use thiserror::Error;
use tracing::{info, warn};

/// Default token lifetime in minutes.
pub const DEFAULT_LOGIN_MINUTES: i64 = 60;

/// Longest accepted token lifetime: one year.
pub const MAX_LOGIN_MINUTES: i64 = 366 * 24 * 60;

/// Configuration errors; any of them aborts startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unsupported signing method: {0}")]
    InvalidSigningMethod(String),

    #[error("Invalid login time (minutes): {0}")]
    InvalidLoginTime(String),
}

/// Configuration for the API server.
#[derive(Clone)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "0.0.0.0:8080").
    pub bind_addr: String,
    /// MySQL connection URL.
    pub database_url: String,
    /// Token signing secret.
    pub jwt_secret: String,
    /// HMAC algorithm used to sign and verify tokens.
    pub signing_algorithm: Algorithm,
    /// Token lifetime in minutes.
    pub login_minutes: i64,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("signing_algorithm", &self.signing_algorithm)
            .field("login_minutes", &self.login_minutes)
            .finish_non_exhaustive()
    }
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable              | Default                                         |
    /// |-----------------------|-------------------------------------------------|
    /// | `BIND_ADDR`           | `0.0.0.0:$APP_PORT`, port defaulting to `8080`  |
    /// | `DATABASE_URL`        | built from `DB_HOST`/`DB_USERNAME`/`DB_PASSWORD`/`DB_NAME` |
    /// | `AUTH_SECRET_TOKEN`   | generated & persisted to file                   |
    /// | `AUTH_SIGNING_METHOD` | `HS256`                                         |
    /// | `AUTH_LOGIN_TIME`     | `60` (minutes)                                  |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok().filter(|v| !v.is_empty()))
    }

    /// Same as [`ApiConfig::from_env`] with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| {
            format!("0.0.0.0:{}", lookup("APP_PORT").unwrap_or_else(|| "8080".into()))
        });

        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| {
            let host = lookup("DB_HOST").unwrap_or_else(|| "localhost:3306".into());
            let user = lookup("DB_USERNAME").unwrap_or_else(|| "root".into());
            let name = lookup("DB_NAME").unwrap_or_else(|| "pos".into());
            match lookup("DB_PASSWORD") {
                Some(password) => format!("mysql://{user}:{password}@{host}/{name}"),
                None => format!("mysql://{user}@{host}/{name}"),
            }
        });

        let signing_algorithm =
            parse_signing_method(&lookup("AUTH_SIGNING_METHOD").unwrap_or_else(|| "HS256".into()))?;

        let login_minutes = match lookup("AUTH_LOGIN_TIME") {
            Some(raw) => parse_login_minutes(&raw)?,
            None => DEFAULT_LOGIN_MINUTES,
        };

        let jwt_secret = lookup("AUTH_SECRET_TOKEN").unwrap_or_else(resolve_jwt_secret);

        Ok(Self {
            bind_addr,
            database_url,
            jwt_secret,
            signing_algorithm,
            login_minutes,
        })
    }

    /// Codec keyed by this configuration's secret and algorithm.
    pub fn token_codec(&self) -> TokenCodec {
        TokenCodec::new(&self.jwt_secret, self.signing_algorithm)
    }

    pub fn login_duration(&self) -> Duration {
        Duration::minutes(self.login_minutes)
    }
}

/// Parse an HMAC algorithm name such as `HS256`.
pub fn parse_signing_method(name: &str) -> Result<Algorithm, ConfigError> {
    match Algorithm::from_str(name) {
        Ok(alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => Ok(alg),
        _ => Err(ConfigError::InvalidSigningMethod(name.to_string())),
    }
}

fn parse_login_minutes(raw: &str) -> Result<i64, ConfigError> {
    match raw.trim().parse::<i64>() {
        Ok(minutes) if (1..=MAX_LOGIN_MINUTES).contains(&minutes) => Ok(minutes),
        _ => Err(ConfigError::InvalidLoginTime(raw.to_string())),
    }
}

/// Resolve the signing secret from the persisted file, generating it on first use.
pub fn resolve_jwt_secret() -> String {
    load_or_create_secret(&jwt_secret_path())
}

/// Read the secret stored at `path`, or generate and persist a new one.
pub fn load_or_create_secret(path: &Path) -> String {
    if let Ok(existing) = std::fs::read_to_string(path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    if let Some(parent) = path.parent()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        warn!(path = %parent.display(), error = %e, "could not create secret directory");
    }
    match std::fs::write(path, &secret) {
        Ok(()) => info!(path = %path.display(), "generated new token secret"),
        Err(e) => warn!(path = %path.display(), error = %e, "could not persist token secret"),
    }
    secret
}

/// Path to the persisted token secret file.
fn jwt_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pos")
        .join("jwt-secret")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn reads_explicit_values() {
        let config = ApiConfig::from_lookup(lookup_from(&[
            ("APP_PORT", "9000"),
            ("DB_USERNAME", "pos"),
            ("DB_PASSWORD", "pw"),
            ("DB_NAME", "stone_work"),
            ("AUTH_SECRET_TOKEN", "s3cret"),
            ("AUTH_SIGNING_METHOD", "HS512"),
            ("AUTH_LOGIN_TIME", "15"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.database_url, "mysql://pos:pw@localhost:3306/stone_work");
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.signing_algorithm, Algorithm::HS512);
        assert_eq!(config.login_duration(), Duration::minutes(15));
    }

    #[test]
    fn explicit_urls_win() {
        let config = ApiConfig::from_lookup(lookup_from(&[
            ("BIND_ADDR", "127.0.0.1:3100"),
            ("DATABASE_URL", "mysql://db/pos"),
            ("APP_PORT", "9000"),
            ("AUTH_SECRET_TOKEN", "s3cret"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:3100");
        assert_eq!(config.database_url, "mysql://db/pos");
        assert_eq!(config.signing_algorithm, Algorithm::HS256);
        assert_eq!(config.login_minutes, DEFAULT_LOGIN_MINUTES);
    }

    #[test]
    fn rejects_bad_login_time() {
        let too_long = (MAX_LOGIN_MINUTES + 1).to_string();
        let cases = [
            "abc",
            "0",
            "-5",
            "1000000000000",
            "9223372036854775807",
            too_long.as_str(),
        ];
        for raw in cases {
            let err = ApiConfig::from_lookup(lookup_from(&[
                ("AUTH_SECRET_TOKEN", "s3cret"),
                ("AUTH_LOGIN_TIME", raw),
            ]))
            .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidLoginTime(_)), "{raw}");
        }
    }

    #[test]
    fn accepts_login_time_up_to_one_year() {
        let max = MAX_LOGIN_MINUTES.to_string();
        let config = ApiConfig::from_lookup(lookup_from(&[
            ("AUTH_SECRET_TOKEN", "s3cret"),
            ("AUTH_LOGIN_TIME", max.as_str()),
        ]))
        .unwrap();
        assert_eq!(config.login_duration(), Duration::days(366));
    }

    #[test]
    fn rejects_non_hmac_signing_methods() {
        assert!(parse_signing_method("HS384").is_ok());
        for name in ["RS256", "none", "hs256", ""] {
            assert!(parse_signing_method(name).is_err(), "{name}");
        }
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let config =
            ApiConfig::from_lookup(lookup_from(&[("AUTH_SECRET_TOKEN", "s3cret")])).unwrap();
        assert!(!format!("{config:?}").contains("s3cret"));
    }

    #[test]
    fn secret_is_generated_once_and_reused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("jwt-secret");

        let first = load_or_create_secret(&path);
        assert_eq!(first.len(), 64);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), first);
        assert_eq!(load_or_create_secret(&path), first);
    }
}
