//! Settings validation, run before any connection is attempted.

use crate::config::{Backend, Settings};
use crate::error::ConfigError;

pub fn validate(settings: &Settings) -> Result<(), ConfigError> {
    let db = &settings.database;
    if db.max_connections == 0 {
        return Err(ConfigError::Invalid {
            key: "DATABASE_MAX_CONNECTIONS",
            value: "0".into(),
        });
    }
    if db.is_in_memory() && db.max_connections != 1 {
        // Every pooled connection would open its own empty database.
        return Err(ConfigError::Invalid {
            key: "DATABASE_MAX_CONNECTIONS",
            value: db.max_connections.to_string(),
        });
    }
    if Backend::from_url(&db.url) != Some(db.backend) {
        return Err(ConfigError::UnsupportedScheme(db.url.split(':').next().unwrap_or_default().to_string()));
    }
    if settings.port == 0 {
        return Err(ConfigError::Invalid { key: "PORT", value: "0".into() });
    }
    Ok(())
}
