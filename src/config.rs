use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub app: AppConfig,
    pub telemetry: TelemetrySettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
}

/// Headers the upstream authentication layer uses to hand over the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub user_header: String,
    pub role_header: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            user_header: "x-auth-user".to_string(),
            role_header: "x-auth-role".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,
    pub environment: Environment,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    pub otlp_endpoint: Option<String>,
    pub traces_enabled: bool,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Environment::Production),
            "staging" => Ok(Environment::Staging),
            "development" => Ok(Environment::Development),
            _ => Err(format!("Unknown environment: {}", s)),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server configuration
        let host = lookup("SERVER_HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string())
            .parse::<IpAddr>()
            .context("Failed to parse SERVER_HOST")?;

        let port = lookup("SERVER_PORT")
            .unwrap_or_else(|| "8000".to_string())
            .parse::<u16>()
            .context("Failed to parse SERVER_PORT")?;

        // Database configuration
        let db_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        let db_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(val) => Some(val.parse().context("Failed to parse DATABASE_MAX_CONNECTIONS")?),
            None => Some(10),
        };
        let db_min_connections = match lookup("DATABASE_MIN_CONNECTIONS") {
            Some(val) => Some(val.parse().context("Failed to parse DATABASE_MIN_CONNECTIONS")?),
            None => Some(1),
        };

        // Principal headers
        let defaults = AuthConfig::default();
        let auth = AuthConfig {
            user_header: lookup("AUTH_USER_HEADER")
                .map(|h| h.to_lowercase())
                .unwrap_or(defaults.user_header),
            role_header: lookup("AUTH_ROLE_HEADER")
                .map(|h| h.to_lowercase())
                .unwrap_or(defaults.role_header),
        };

        // App configuration
        let environment = match lookup("APP_ENVIRONMENT") {
            Some(val) => val.parse::<Environment>().map_err(anyhow::Error::msg)?,
            None => Environment::default(),
        };
        let app_name = lookup("APP_NAME").unwrap_or_else(|| "Training Center".to_string());

        // Telemetry
        let traces_enabled = match lookup("OTEL_TRACES_ENABLED") {
            Some(val) => val.parse().context("Failed to parse OTEL_TRACES_ENABLED")?,
            None => true,
        };

        Ok(Config {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url: db_url,
                max_connections: db_max_connections,
                min_connections: db_min_connections,
            },
            auth,
            app: AppConfig {
                name: app_name,
                environment,
            },
            telemetry: TelemetrySettings {
                otlp_endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT"),
                traces_enabled,
            },
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == Environment::Production
    }
}

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Loads the process configuration once; later calls return the same instance.
pub fn init() -> Result<&'static Config> {
    CONFIG.get_or_try_init(Config::from_env)
}
