//! Configuration module for NetLink.

use serde::Deserialize;
use std::path::Path;
use url::Url;

use crate::{NetlinkError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Base URL of the web client, used for links in emails.
    #[serde(default = "default_client_url")]
    pub client_url: String,
    /// Production mode (enables secure cookies).
    #[serde(default)]
    pub production: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_client_url() -> String {
    "http://localhost:5173".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            client_url: default_client_url(),
            production: false,
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/netlink.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Session/authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign session tokens (must be set).
    #[serde(default)]
    pub jwt_secret: String,
    /// Session token lifetime in days.
    #[serde(default = "default_token_expiry_days")]
    pub token_expiry_days: u64,
    /// Name of the session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

fn default_token_expiry_days() -> u64 {
    7
}

fn default_cookie_name() -> String {
    "token".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_expiry_days: default_token_expiry_days(),
            cookie_name: default_cookie_name(),
        }
    }
}

/// Image storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ImagesConfig {
    /// Directory where uploaded images are written.
    #[serde(default = "default_images_path")]
    pub storage_path: String,
    /// Public URL prefix under which stored images are served.
    #[serde(default = "default_images_base_url")]
    pub public_base_url: String,
    /// Maximum decoded image size in megabytes.
    #[serde(default = "default_max_image_size")]
    pub max_size_mb: u64,
}

fn default_images_path() -> String {
    "data/images".to_string()
}

fn default_images_base_url() -> String {
    "http://localhost:5000/images".to_string()
}

fn default_max_image_size() -> u64 {
    5
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            storage_path: default_images_path(),
            public_base_url: default_images_base_url(),
            max_size_mb: default_max_image_size(),
        }
    }
}

/// Outbound email configuration.
///
/// An empty `smtp_host` puts the mailer in no-op mode.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// SMTP relay host.
    #[serde(default)]
    pub smtp_host: String,
    /// SMTP port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username.
    #[serde(default)]
    pub smtp_username: Option<String>,
    /// SMTP password.
    #[serde(default)]
    pub smtp_password: Option<String>,
    /// Use STARTTLS instead of implicit TLS.
    #[serde(default = "default_use_starttls")]
    pub use_starttls: bool,
    /// Sender address.
    #[serde(default = "default_sender_email")]
    pub sender_email: String,
    /// Sender display name.
    #[serde(default = "default_sender_name")]
    pub sender_name: String,
}

fn default_smtp_port() -> u16 {
    587
}

fn default_use_starttls() -> bool {
    true
}

fn default_sender_email() -> String {
    "noreply@netlink.local".to_string()
}

fn default_sender_name() -> String {
    "NetLink".to_string()
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: String::new(),
            smtp_port: default_smtp_port(),
            smtp_username: None,
            smtp_password: None,
            use_starttls: default_use_starttls(),
            sender_email: default_sender_email(),
            sender_name: default_sender_name(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/netlink.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Web layer configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Rate limit for signup/login endpoints (requests per minute per IP).
    #[serde(default = "default_auth_rate_limit")]
    pub auth_rate_limit: u32,
    /// Take the client IP from `X-Forwarded-For`/`X-Real-IP`.
    ///
    /// Only enable behind a reverse proxy that overwrites these headers.
    #[serde(default)]
    pub trust_proxy: bool,
}

fn default_auth_rate_limit() -> u32 {
    10
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            cors_origins: vec![],
            auth_rate_limit: default_auth_rate_limit(),
            trust_proxy: false,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Session configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Image storage configuration.
    #[serde(default)]
    pub images: ImagesConfig,
    /// Email configuration.
    #[serde(default)]
    pub mail: MailConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Web layer configuration.
    #[serde(default)]
    pub web: WebConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(NetlinkError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| NetlinkError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `NETLINK_JWT_SECRET`: session signing secret
    /// - `NETLINK_DATABASE_PATH`: SQLite database path
    /// - `NETLINK_PORT`: listening port
    /// - `NETLINK_CLIENT_URL`: web client base URL
    /// - `NETLINK_SMTP_PASSWORD`: SMTP password
    /// - `NETLINK_ENV`: `production` enables secure cookies
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(secret) = get("NETLINK_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(path) = get("NETLINK_DATABASE_PATH") {
            self.database.path = path;
        }
        if let Some(port) = get("NETLINK_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(url) = get("NETLINK_CLIENT_URL") {
            self.server.client_url = url;
        }
        if let Some(password) = get("NETLINK_SMTP_PASSWORD") {
            self.mail.smtp_password = Some(password);
        }
        if let Some(env) = get("NETLINK_ENV") {
            self.server.production = env.eq_ignore_ascii_case("production");
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the JWT secret is not set
    /// - the client URL or the image base URL cannot be parsed
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(NetlinkError::Config(
                "jwt_secret is not set. \
                 Set it in config.toml or via NETLINK_JWT_SECRET environment variable."
                    .to_string(),
            ));
        }
        Url::parse(&self.server.client_url)
            .map_err(|e| NetlinkError::Config(format!("invalid client_url: {e}")))?;
        Url::parse(&self.images.public_base_url)
            .map_err(|e| NetlinkError::Config(format!("invalid images.public_base_url: {e}")))?;
        Ok(())
    }
}
