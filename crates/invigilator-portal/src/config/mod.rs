use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

const DEVELOPMENT_JWT_SECRET: &str = "invigilator-portal-development-secret";
const BYTES_PER_MIB: usize = 1024 * 1024;

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

/// Top-level configuration for the portal.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub auth: AuthConfig,
    pub export: ExportConfig,
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

        let jwt_secret = match env::var("APP_JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if environment == AppEnvironment::Production => {
                return Err(ConfigError::MissingJwtSecret)
            }
            _ => DEVELOPMENT_JWT_SECRET.to_string(),
        };

        let token_ttl_days = env::var("APP_TOKEN_TTL_DAYS")
            .unwrap_or_else(|_| "7".to_string())
            .parse::<i64>()
            .ok()
            .filter(|days| *days > 0)
            .ok_or(ConfigError::InvalidTokenTtl)?;

        let admin = match (env::var("APP_ADMIN_EMAIL"), env::var("APP_ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) if !email.trim().is_empty() && !password.is_empty() => {
                Some(AdminSeed {
                    email: email.trim().to_string(),
                    password,
                })
            }
            _ => None,
        };

        let font_dir = env::var("APP_PDF_FONT_DIR").unwrap_or_else(|_| "./fonts".to_string());
        let font_family =
            env::var("APP_PDF_FONT_FAMILY").unwrap_or_else(|_| "LiberationSans".to_string());
        let upload_limit_mib = env::var("APP_EXPORT_UPLOAD_LIMIT_MB")
            .unwrap_or_else(|_| "32".to_string())
            .parse::<usize>()
            .ok()
            .filter(|mib| *mib > 0)
            .ok_or(ConfigError::InvalidUploadLimit)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            auth: AuthConfig {
                jwt_secret,
                token_ttl_days,
                admin,
            },
            export: ExportConfig {
                font_dir: PathBuf::from(font_dir),
                font_family,
                upload_limit_bytes: upload_limit_mib.saturating_mul(BYTES_PER_MIB),
            },
        })
    }
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Token signing and the optional bootstrap administrator.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    pub admin: Option<AdminSeed>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_days", &self.token_ttl_days)
            .field("admin", &self.admin.as_ref().map(|seed| seed.email.as_str()))
            .finish()
    }
}

#[derive(Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

/// Font lookup for agreement packet rendering and the size cap on uploaded section bitmaps.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub font_dir: PathBuf,
    pub font_family: String,
    pub upload_limit_bytes: usize,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    MissingJwtSecret,
    InvalidTokenTtl,
    InvalidUploadLimit,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::MissingJwtSecret => {
                write!(f, "APP_JWT_SECRET must be set in production")
            }
            ConfigError::InvalidTokenTtl => {
                write!(f, "APP_TOKEN_TTL_DAYS must be a positive number of days")
            }
            ConfigError::InvalidUploadLimit => {
                write!(f, "APP_EXPORT_UPLOAD_LIMIT_MB must be a positive number of MiB")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::MissingJwtSecret
            | ConfigError::InvalidTokenTtl
            | ConfigError::InvalidUploadLimit => None,
        }
    }
}
