//! Typed runtime settings.

/// URL used when the process runs in test mode.
pub const IN_MEMORY_URL: &str = "sqlite::memory:";

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl Backend {
    /// Detects the backend from a connection string's scheme.
    pub fn from_url(url: &str) -> Option<Backend> {
        let scheme = url.split(':').next()?;
        match scheme {
            "postgres" | "postgresql" => Some(Backend::Postgres),
            "sqlite" => Some(Backend::Sqlite),
            _ => None,
        }
    }

    /// Positional bind parameter `n` (1-based).
    pub fn placeholder(self, n: usize) -> String {
        match self {
            Backend::Postgres => format!("${}", n),
            Backend::Sqlite => format!("?{}", n),
        }
    }
}

/// TLS requirement for PostgreSQL connections.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SslMode {
    Prefer,
    /// Encrypt but do not verify the server certificate.
    Require,
    VerifyFull,
}

impl SslMode {
    pub fn from_flags(require: bool, reject_unauthorized: bool) -> SslMode {
        match (require, reject_unauthorized) {
            (_, true) => SslMode::VerifyFull,
            (true, false) => SslMode::Require,
            (false, false) => SslMode::Prefer,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SslMode::Prefer => "prefer",
            SslMode::Require => "require",
            SslMode::VerifyFull => "verify-full",
        }
    }
}

#[derive(Clone, Debug)]
pub struct DatabaseSettings {
    pub url: String,
    pub backend: Backend,
    pub ssl: SslMode,
    pub max_connections: u32,
}

impl DatabaseSettings {
    /// Settings for a private in-memory SQLite database.
    pub fn in_memory() -> Self {
        DatabaseSettings {
            url: IN_MEMORY_URL.to_string(),
            backend: Backend::Sqlite,
            ssl: SslMode::Prefer,
            max_connections: 1,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.backend == Backend::Sqlite && self.url.contains(":memory:")
    }

    /// Connection string with the TLS mode applied. SQLite URLs are returned unchanged,
    /// as are PostgreSQL URLs that already name an `sslmode`.
    pub fn connect_url(&self) -> String {
        if self.backend != Backend::Postgres || self.url.contains("sslmode=") {
            return self.url.clone();
        }
        let sep = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{}sslmode={}", self.url, sep, self.ssl.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub port: u16,
    /// Only used to describe the listening address in logs.
    pub domain: Option<String>,
    pub test_mode: bool,
}
