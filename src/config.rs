use std::{env, fmt::Display, net::IpAddr, path::PathBuf, str::FromStr};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Set DATABASE_URL or DB_HOST/DB_USER/DB_NAME to configure the database")]
    MissingDatabase,

    #[error("AUTH_REQUIRED is set but JWT_SECRET is empty")]
    MissingJwtSecret,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub database_url: String,
    /// Log every SQL statement; on when `ENV=development`.
    pub sql_logging: bool,
    pub jwt_secret: Option<String>,
    pub require_auth: bool,
    /// Empty means the request origin is mirrored back. A `*` entry also
    /// mirrors, since a literal wildcard cannot be sent with credentials.
    pub cors_origins: Vec<String>,
    pub frontend_dir: Option<PathBuf>,
    pub log_filter: String,
    pub log_format: LogFormat,
    pub otlp_endpoint: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = match var("DATABASE_URL") {
            Some(url) => url,
            None => compose_database_url(&var)?,
        };

        let jwt_secret = var("JWT_SECRET");
        let require_auth = parse_or("AUTH_REQUIRED", var("AUTH_REQUIRED"), false)?;
        if require_auth && jwt_secret.is_none() {
            return Err(ConfigError::MissingJwtSecret);
        }

        let log_format = match var("RUST_LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            host: parse_or("HOST", var("HOST"), IpAddr::from([0, 0, 0, 0]))?,
            port: parse_or("PORT", var("PORT"), 8081)?,
            database_url,
            sql_logging: var("ENV").as_deref() == Some("development"),
            jwt_secret,
            require_auth,
            cors_origins: var("CORS_ALLOWED_ORIGINS")
                .map(|v| cors_origins(&v))
                .unwrap_or_default(),
            frontend_dir: var("FRONTEND_DIR").map(PathBuf::from),
            log_filter: var("RUST_LOG").unwrap_or_else(|| {
                "info,floodrelief_server=info,sqlx=warn,sea_orm=warn".to_string()
            }),
            log_format,
            otlp_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }
}

fn cors_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect();

    if origins.iter().any(|o| o == "*") {
        Vec::new()
    } else {
        origins
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}

fn compose_database_url<F>(var: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let (Some(host), Some(user), Some(name)) = (var("DB_HOST"), var("DB_USER"), var("DB_NAME"))
    else {
        return Err(ConfigError::MissingDatabase);
    };

    let port: u16 = parse_or("DB_PORT", var("DB_PORT"), 5432)?;
    let password = var("DB_PASSWORD")
        .map(|p| format!(":{p}"))
        .unwrap_or_default();
    let sslmode = var("DB_SSLMODE").unwrap_or_else(|| "disable".to_string());

    Ok(format!(
        "postgres://{user}{password}@{host}:{port}/{name}?sslmode={sslmode}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = load(&[("DATABASE_URL", "sqlite::memory:")]).unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.host.to_string(), "0.0.0.0");
        assert!(!config.require_auth);
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(!config.sql_logging);
    }

    #[test]
    fn database_url_is_composed_from_parts() {
        let config = load(&[
            ("DB_HOST", "db"),
            ("DB_USER", "relief"),
            ("DB_PASSWORD", "pw"),
            ("DB_NAME", "flood"),
            ("DB_PORT", "5433"),
            ("DB_SSLMODE", "require"),
        ])
        .unwrap();
        assert_eq!(
            config.database_url,
            "postgres://relief:pw@db:5433/flood?sslmode=require"
        );
    }

    #[test]
    fn missing_database_is_an_error() {
        assert!(matches!(load(&[]), Err(ConfigError::MissingDatabase)));
    }

    #[test]
    fn auth_requires_a_secret() {
        let err = load(&[("DATABASE_URL", "sqlite::memory:"), ("AUTH_REQUIRED", "true")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingJwtSecret));
    }

    #[test]
    fn bad_port_is_reported() {
        let err = load(&[("DATABASE_URL", "sqlite::memory:"), ("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }

    #[test]
    fn cors_origins_are_split() {
        let config = load(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test,"),
        ])
        .unwrap();
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn wildcard_origin_mirrors() {
        let config = load(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, *"),
        ])
        .unwrap();
        assert!(config.cors_origins.is_empty());
    }
}
