use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::documents::DocumentConfig;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the document service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub documents: DocumentConfig,
    pub templates: TemplateConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let support_email =
            env::var("DOCS_SUPPORT_EMAIL").unwrap_or_else(|_| "support@example.com".to_string());
        let signature =
            env::var("DOCS_SIGNATURE").unwrap_or_else(|_| "The Client Services Team".to_string());
        let tax_rate = parse_tax_rate(
            &env::var("DOCS_TAX_RATE").unwrap_or_else(|_| "0.85".to_string()),
        )?;

        let base_uri = env::var("DOCS_TEMPLATE_BASE_URI")
            .unwrap_or_else(|_| format!("http://{host}:{port}/templates"));

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            documents: DocumentConfig {
                support_email,
                signature,
                tax_rate,
            },
            templates: TemplateConfig { base_uri },
        })
    }
}

fn parse_tax_rate(raw: &str) -> Result<Decimal, ConfigError> {
    let rate = Decimal::from_str(raw.trim()).map_err(|_| ConfigError::InvalidTaxRate {
        value: raw.to_string(),
    })?;

    if rate.is_sign_negative() || rate > Decimal::ONE {
        return Err(ConfigError::InvalidTaxRate {
            value: raw.to_string(),
        });
    }

    Ok(rate)
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where document templates are served from when callers do not supply a base URI.
#[derive(Debug, Clone)]
pub struct TemplateConfig {
    pub base_uri: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTaxRate { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTaxRate { value } => write!(
                f,
                "DOCS_TAX_RATE must be a decimal between 0 and 1 (got '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidTaxRate { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
