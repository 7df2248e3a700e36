//! Configuration for the MEGA backend server.
//!
//! All configuration is loaded from environment variables (optionally seeded
//! from a `.env` file by the binary). No secrets are logged.

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default PostgreSQL port.
pub const DEFAULT_DB_PORT: u16 = 5432;

/// Deployment environment, selected by `NODE_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    /// In-memory storage, request logging disabled
    Test,
    /// Database connections require TLS
    Production,
}

impl Environment {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "test" => Self::Test,
            "production" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }
}

/// PostgreSQL connection settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Require TLS (production only)
    pub ssl: bool,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,

    /// Server port
    pub port: u16,

    pub environment: Environment,

    pub database: DatabaseConfig,

    /// Secret used to sign and verify bearer tokens (`JWT_SECRET`)
    pub jwt_secret: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = get("NODE_ENV")
            .map(|v| Environment::parse(&v))
            .unwrap_or_default();
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        Self {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: get("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            environment,
            database: DatabaseConfig {
                host: non_empty("DB_HOST").unwrap_or_else(|| "db".to_string()),
                port: get("DB_PORT")
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(DEFAULT_DB_PORT),
                name: non_empty("POSTGRES_DB"),
                user: non_empty("POSTGRES_USER"),
                password: get("POSTGRES_PASSWORD"),
                ssl: environment == Environment::Production,
            },
            jwt_secret: non_empty("JWT_SECRET"),
        }
    }

    /// `NODE_ENV=test` with every other value at its default.
    pub fn for_tests() -> Self {
        Self::from_lookup(|key| match key {
            "NODE_ENV" => Some("test".to_string()),
            _ => None,
        })
    }

    /// Whether the in-memory store backs this process
    pub fn in_memory(&self) -> bool {
        self.environment == Environment::Test
    }

    /// Access logging and route listing are disabled under test
    pub fn request_logging(&self) -> bool {
        self.environment != Environment::Test
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
