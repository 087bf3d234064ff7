//! Database connection settings.
//!
//! Settings come from the libpq-style `PG*` environment variables, with
//! `DATABASE_URL` taking precedence when present.

use sqlx::postgres::PgConnectOptions;

use crate::DbError;

/// Default pool ceiling.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Where and how to connect to the LightBnB database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    /// Full connection string; overrides the discrete fields above.
    pub url: Option<String>,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "vagrant".to_string(),
            password: "123".to_string(),
            database: "lightbnb".to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            url: None,
        }
    }
}

impl DbConfig {
    /// Build a config from the process environment.
    pub fn from_env() -> Result<Self, DbError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Missing keys keep their
    /// default value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DbError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("PGHOST") {
            config.host = host;
        }
        if let Some(port) = lookup("PGPORT") {
            config.port = port
                .parse()
                .map_err(|_| DbError::Config(format!("PGPORT is not a port number: {port}")))?;
        }
        if let Some(user) = lookup("PGUSER") {
            config.user = user;
        }
        if let Some(password) = lookup("PGPASSWORD") {
            config.password = password;
        }
        if let Some(database) = lookup("PGDATABASE") {
            config.database = database;
        }
        if let Some(max) = lookup("DB_MAX_CONNECTIONS") {
            config.max_connections = match max.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(DbError::Config(format!(
                        "DB_MAX_CONNECTIONS must be a positive integer, got {max}"
                    )))
                }
            };
        }
        config.url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        Ok(config)
    }

    /// Replace the connection string, keeping the pool settings.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Translate into sqlx connect options.
    pub fn connect_options(&self) -> Result<PgConnectOptions, DbError> {
        match &self.url {
            Some(url) => url
                .parse::<PgConnectOptions>()
                .map_err(|e| DbError::Config(format!("bad DATABASE_URL: {e}"))),
            None => Ok(PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .username(&self.user)
                .password(&self.password)
                .database(&self.database)),
        }
    }
}
