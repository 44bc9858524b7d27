//! Load settings from the process environment (and `.env`, if present).

use crate::config::types::*;
use crate::config::validate;
use crate::error::ConfigError;

/// Reads `.env` into the environment, then builds settings from it.
pub fn load_from_env() -> Result<Settings, ConfigError> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "loaded .env");
    }
    load_from(|key| std::env::var(key).ok())
}

/// Builds settings from any key lookup. Empty values count as unset.
pub fn load_from<F>(lookup: F) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let test_mode = get("APP_ENV")
        .or_else(|| get("NODE_ENV"))
        .map(|v| v.eq_ignore_ascii_case("test"))
        .unwrap_or(false);

    let database = if test_mode {
        DatabaseSettings::in_memory()
    } else {
        let url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let backend = Backend::from_url(&url).ok_or_else(|| ConfigError::UnsupportedScheme(scheme_of(&url)))?;
        let require = parse_bool("DATABASE_SSL_REQUIRE", get("DATABASE_SSL_REQUIRE"), true)?;
        let reject = parse_bool(
            "DATABASE_SSL_REJECT_UNAUTHORIZED",
            get("DATABASE_SSL_REJECT_UNAUTHORIZED"),
            false,
        )?;
        let max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                key: "DATABASE_MAX_CONNECTIONS",
                value: v,
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        DatabaseSettings {
            url,
            backend,
            ssl: SslMode::from_flags(require, reject),
            max_connections,
        }
    };

    let port = match get("PORT") {
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid { key: "PORT", value: v })?,
        None => DEFAULT_PORT,
    };

    let settings = Settings {
        database,
        port,
        domain: get("DOMAIN"),
        test_mode,
    };
    validate(&settings)?;
    Ok(settings)
}

fn scheme_of(url: &str) -> String {
    url.split(':').next().unwrap_or_default().to_string()
}

fn parse_bool(key: &'static str, value: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(v) = value else {
        return Ok(default);
    };
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { key, value: v }),
    }
}
