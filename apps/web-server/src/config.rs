//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use yatube_infra::auth::{JwtConfig, PasswordConfig};
use yatube_infra::database::DatabaseConfig;

/// Login cookie settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "yatube_session".to_string(),
            secure: false,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
    pub session: SessionConfig,
}

fn parsed<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(%key, value = %raw, "Ignoring unparsable setting");
            default
        }),
        Err(_) => default,
    }
}

fn flag(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let defaults = DatabaseConfig::new(url);
            DatabaseConfig {
                max_connections: parsed("DB_MAX_CONNECTIONS", defaults.max_connections),
                min_connections: parsed("DB_MIN_CONNECTIONS", defaults.min_connections),
                sqlx_logging: flag("DB_SQL_LOGGING", defaults.sqlx_logging),
                ..defaults
            }
        });

        let jwt_defaults = JwtConfig::default();
        let jwt = JwtConfig {
            secret: env::var("JWT_SECRET").unwrap_or(jwt_defaults.secret),
            expiration_hours: parsed("JWT_EXPIRATION_HOURS", jwt_defaults.expiration_hours),
            issuer: env::var("JWT_ISSUER").unwrap_or(jwt_defaults.issuer),
        };

        let password_defaults = PasswordConfig::default();
        let password = PasswordConfig {
            memory_kib: parsed("ARGON2_MEMORY_KIB", password_defaults.memory_kib),
            iterations: parsed("ARGON2_ITERATIONS", password_defaults.iterations),
            parallelism: parsed("ARGON2_PARALLELISM", password_defaults.parallelism),
        };

        let session_defaults = SessionConfig::default();
        let session = SessionConfig {
            cookie_name: env::var("SESSION_COOKIE_NAME").unwrap_or(session_defaults.cookie_name),
            secure: flag("SESSION_COOKIE_SECURE", session_defaults.secure),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT", 8080),
            database,
            jwt,
            password,
            session,
        }
    }
}
