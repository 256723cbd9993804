use crate::service::jwt_service::JwtService;
use crate::util::validation::RequestValidator;
use derive_more::Display;
use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const MIN_PRODUCTION_SECRET_LEN: usize = 32;
const DEFAULT_DUMMY_HASHED_PASSWORD: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXJhbmRvbXNhbHQ$2INNARqrDRWDs6P3h/0lNTVJQgUOjr10OjVLQ36Qz+M";

#[derive(Debug, Display, derive_more::Error)]
pub enum ConfigError {
    #[display("{name} must be set")]
    Missing { name: String },
    #[display("{name} has an invalid value: {value}")]
    Invalid { name: String, value: String },
    #[display("JWT_SECRET must be at least {min_len} bytes in production")]
    WeakSecret { min_len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Environment {
    #[display("development")]
    Development,
    #[display("test")]
    Test,
    #[display("production")]
    Production,
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Environment::Development),
            "test" | "testing" => Ok(Environment::Test),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(()),
        }
    }
}

/// Runtime configuration read from the process environment (and `.env` via dotenvy).
#[derive(Debug)]
pub struct AppConfig {
    pub database_url: SecretString,
    pub jwt_secret: SecretString,
    pub jwt_issuer: String,
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
    pub reset_token_ttl_secs: i64,
    pub allowed_origins: Vec<String>,
    pub server_host: String,
    pub server_port: u16,
    pub environment: Environment,
    pub uploads_dir: PathBuf,
    pub db_max_connections: u32,
    pub request_timeout_secs: u64,
    pub run_migrations: bool,
    pub argon_pepper: Option<SecretString>,
    pub dummy_hashed_password: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a required variable is missing, a numeric or boolean
    /// value cannot be parsed, or the JWT secret is too short for a production deployment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &str| {
            get(name).ok_or_else(|| ConfigError::Missing {
                name: name.to_string(),
            })
        };

        let environment = match get("ENVIRONMENT").or_else(|| get("APP_ENV")) {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "ENVIRONMENT".to_string(),
                value,
            })?,
            None => Environment::Development,
        };

        let jwt_secret = required("JWT_SECRET")?;
        if environment == Environment::Production && jwt_secret.len() < MIN_PRODUCTION_SECRET_LEN {
            return Err(ConfigError::WeakSecret {
                min_len: MIN_PRODUCTION_SECRET_LEN,
            });
        }

        let allowed_origins = get("ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            database_url: SecretString::from(required("DATABASE_URL")?),
            jwt_secret: SecretString::from(jwt_secret),
            jwt_issuer: get("JWT_ISSUER").unwrap_or_else(|| "internship-api".to_string()),
            access_token_ttl_secs: parse_or(&get, "JWT_ACCESS_TTL_SECS", 24 * 60 * 60)?,
            refresh_token_ttl_secs: parse_or(&get, "JWT_REFRESH_TTL_SECS", 7 * 24 * 60 * 60)?,
            reset_token_ttl_secs: parse_or(&get, "JWT_RESET_TTL_SECS", 60 * 60)?,
            allowed_origins,
            server_host: get("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port: match get("SERVER_PORT") {
                Some(_) => parse_or(&get, "SERVER_PORT", 8080)?,
                None => parse_or(&get, "PORT", 8080)?,
            },
            environment,
            uploads_dir: PathBuf::from(get("UPLOADS_DIR").unwrap_or_else(|| "uploads/pdf".to_string())),
            db_max_connections: parse_or(&get, "DB_MAX_CONNECTIONS", 10)?,
            request_timeout_secs: parse_or(&get, "REQUEST_TIMEOUT_SECS", 30)?,
            run_migrations: parse_or(&get, "RUN_MIGRATIONS", true)?,
            argon_pepper: get("ARGON_PEPPER").map(SecretString::from),
            dummy_hashed_password: get("DUMMY_HASHED_PASSWORD")
                .unwrap_or_else(|| DEFAULT_DUMMY_HASHED_PASSWORD.to_string()),
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }
}

fn parse_or<T, G>(get: &G, name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name: name.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

/// Shared state handed to every handler and middleware.
pub struct AppState {
    pub pg_pool: PgPool,
    pub config: AppConfig,
    pub jwt: JwtService,
    pub validator: RequestValidator,
}

impl AppState {
    pub fn new(config: AppConfig, pg_pool: PgPool) -> Self {
        let jwt = JwtService::from_config(&config);
        Self {
            pg_pool,
            config,
            jwt,
            validator: RequestValidator::new(),
        }
    }
}

/// Connects the PostgreSQL pool, runs pending migrations and builds the application state.
///
/// # Errors
///
/// Returns a `DbError` if the pool cannot connect or a migration fails.
pub async fn initialize_app_state(
    config: AppConfig,
) -> Result<Arc<AppState>, crate::db::db_error::DbError> {
    let pg_pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(5))
        .connect(config.database_url.expose_secret())
        .await?;

    if config.run_migrations {
        sqlx::migrate!("./migrations").run(&pg_pool).await?;
        info!("Database migrations applied");
    }

    Ok(Arc::new(AppState::new(config, pg_pool)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_are_applied() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/internship"),
            ("JWT_SECRET", "dev-secret"),
        ]))
        .unwrap();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.access_token_ttl_secs, 86_400);
        assert_eq!(config.refresh_token_ttl_secs, 604_800);
        assert_eq!(config.reset_token_ttl_secs, 3_600);
        assert_eq!(config.allowed_origins, vec!["http://localhost:3000"]);
        assert!(config.run_migrations);
        assert_eq!(config.server_address(), "0.0.0.0:8080");
    }

    #[test]
    fn missing_database_url_is_reported() {
        let err = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "dev-secret")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { ref name } if name == "DATABASE_URL"));
    }

    #[test]
    fn allowed_origins_are_split_and_trimmed() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/internship"),
            ("JWT_SECRET", "dev-secret"),
            ("ALLOWED_ORIGINS", "http://a.example, http://b.example ,"),
            ("PORT", "9000"),
        ]))
        .unwrap();
        assert_eq!(
            config.allowed_origins,
            vec!["http://a.example", "http://b.example"]
        );
        assert_eq!(config.server_port, 9000);
        assert!(!config.allows_any_origin());
    }

    #[test]
    fn invalid_number_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/internship"),
            ("JWT_SECRET", "dev-secret"),
            ("SERVER_PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref name, .. } if name == "SERVER_PORT"));
    }

    #[test]
    fn production_requires_a_long_secret() {
        let err = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/internship"),
            ("JWT_SECRET", "short"),
            ("ENVIRONMENT", "production"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::WeakSecret { .. }));
    }
}
