//! Web configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Server
//! - `JANGADA_HOST` - Bind address (default: 127.0.0.1)
//! - `JANGADA_PORT` - Listen port (default: 3000)
//! - `JANGADA_BASE_URL` - Public URL (default: `http://localhost:3000`)
//!
//! ## Catalog store
//! - `JANGADA_STORE` - `local` (default) or `remote`
//! - `JANGADA_DATA_DIR` - Directory for the local JSON store (default: data)
//! - `TABLE_SERVICE_URL` - Base URL of the remote table service (remote only)
//! - `TABLE_SERVICE_KEY` - API key for the table service (remote only)
//!
//! ## Admin authentication
//! - `JANGADA_AUTH` - `static` (default) or `delegated`
//! - `ADMIN_EMAIL` / `ADMIN_PASSWORD` - Static credential pair (static only)
//! - `IDENTITY_SERVICE_URL` - Base URL of the identity service (delegated only)
//! - `IDENTITY_SERVICE_KEY` - API key for the identity service (delegated only)
//! - `ADMIN_REGISTRATION_CODE` - Shared secret required to register (delegated only)
//!
//! ## Chat assistant (optional - feature disabled when unset)
//! - `ASSISTANT_API_KEY` - Completion service API key
//! - `ASSISTANT_MODEL` - Model name (default: gemini-2.5-flash)
//! - `ASSISTANT_API_URL` - Base URL override (default: the hosted service)
//!
//! ## Observability
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Default base URL of the hosted completion service.
const DEFAULT_ASSISTANT_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Default completion model.
const DEFAULT_ASSISTANT_MODEL: &str = "gemini-2.5-flash";

/// Blocklist of common placeholder patterns (case-insensitive).
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// IP address to bind the server to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Public base URL of the site.
    pub base_url: String,
    /// Catalog store variant.
    pub store: StoreConfig,
    /// Admin authentication variant.
    pub auth: AuthConfig,
    /// Chat assistant configuration, absent when the feature is disabled.
    pub assistant: Option<AssistantConfig>,
    /// Sentry DSN for error tracking.
    pub sentry_dsn: Option<String>,
    /// Sentry environment name.
    pub sentry_environment: Option<String>,
}

/// Where the catalog and settings live.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    /// Two JSON documents in a local data directory.
    Local {
        /// Directory holding `menu.json` and `settings.json`.
        data_dir: PathBuf,
    },
    /// Remote table service with optimistic local updates.
    Remote {
        /// Base URL of the table service.
        base_url: String,
        /// API key sent with every request.
        api_key: SecretString,
    },
}

/// How admins are authenticated.
#[derive(Clone)]
pub enum AuthConfig {
    /// Single configured credential pair, compared exactly.
    Static {
        email: String,
        password: SecretString,
    },
    /// Delegated to a remote identity service.
    Delegated {
        base_url: String,
        api_key: SecretString,
        /// Shared secret required before a sign-up request is forwarded.
        registration_code: SecretString,
    },
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static { email, .. } => f
                .debug_struct("Static")
                .field("email", email)
                .field("password", &"[REDACTED]")
                .finish(),
            Self::Delegated { base_url, .. } => f
                .debug_struct("Delegated")
                .field("base_url", base_url)
                .field("api_key", &"[REDACTED]")
                .field("registration_code", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Completion service configuration.
#[derive(Clone)]
pub struct AssistantConfig {
    /// API key for the completion service.
    pub api_key: SecretString,
    /// Model name.
    pub model: String,
    /// Base URL of the service.
    pub base_url: String,
}

impl std::fmt::Debug for AssistantConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl WebConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail placeholder/entropy validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("JANGADA_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("JANGADA_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("JANGADA_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("JANGADA_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("JANGADA_BASE_URL", "http://localhost:3000");

        let store = StoreConfig::from_env()?;
        let auth = AuthConfig::from_env()?;
        let assistant = AssistantConfig::from_env();
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            base_url,
            store,
            auth,
            assistant,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl StoreConfig {
    fn from_env() -> Result<Self, ConfigError> {
        match get_env_or_default("JANGADA_STORE", "local").as_str() {
            "local" => Ok(Self::Local {
                data_dir: PathBuf::from(get_env_or_default("JANGADA_DATA_DIR", "data")),
            }),
            "remote" => Ok(Self::Remote {
                base_url: get_required_env("TABLE_SERVICE_URL")?,
                api_key: get_validated_secret("TABLE_SERVICE_KEY")?,
            }),
            other => Err(ConfigError::InvalidEnvVar(
                "JANGADA_STORE".to_string(),
                format!("expected 'local' or 'remote', got '{other}'"),
            )),
        }
    }
}

impl AuthConfig {
    fn from_env() -> Result<Self, ConfigError> {
        match get_env_or_default("JANGADA_AUTH", "static").as_str() {
            "static" => {
                let password = get_required_env("ADMIN_PASSWORD")?;
                validate_not_placeholder(&password, "ADMIN_PASSWORD")?;
                Ok(Self::Static {
                    email: get_required_env("ADMIN_EMAIL")?,
                    password: SecretString::from(password),
                })
            }
            "delegated" => {
                let registration_code = get_required_env("ADMIN_REGISTRATION_CODE")?;
                validate_not_placeholder(&registration_code, "ADMIN_REGISTRATION_CODE")?;
                Ok(Self::Delegated {
                    base_url: get_required_env("IDENTITY_SERVICE_URL")?,
                    api_key: get_validated_secret("IDENTITY_SERVICE_KEY")?,
                    registration_code: SecretString::from(registration_code),
                })
            }
            other => Err(ConfigError::InvalidEnvVar(
                "JANGADA_AUTH".to_string(),
                format!("expected 'static' or 'delegated', got '{other}'"),
            )),
        }
    }
}

impl AssistantConfig {
    fn from_env() -> Option<Self> {
        let api_key = get_optional_env("ASSISTANT_API_KEY")?;
        Some(Self {
            api_key: SecretString::from(api_key),
            model: get_env_or_default("ASSISTANT_MODEL", DEFAULT_ASSISTANT_MODEL),
            base_url: get_env_or_default("ASSISTANT_API_URL", DEFAULT_ASSISTANT_API_URL),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Reject secrets that look like placeholders left in from setup docs.
fn validate_not_placeholder(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }
    Ok(())
}

/// Load a service key from environment and reject placeholders.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_not_placeholder(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_placeholder_rejects_template_values() {
        let result = validate_not_placeholder("your-api-key-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
        assert!(validate_not_placeholder("changeme123", "TEST_VAR").is_err());
    }

    #[test]
    fn test_validate_not_placeholder_accepts_real_values() {
        assert!(validate_not_placeholder("JANGADEIRO2025", "TEST_VAR").is_ok());
        assert!(validate_not_placeholder("aB3$xY9!mK2@nL5#", "TEST_VAR").is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = WebConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            store: StoreConfig::Local {
                data_dir: PathBuf::from("data"),
            },
            auth: AuthConfig::Static {
                email: "dona@jangada.rest".to_string(),
                password: SecretString::from("mare-cheia-forte"),
            },
            assistant: None,
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_auth_config_debug_redacts_secrets() {
        let config = AuthConfig::Delegated {
            base_url: "https://id.example.test".to_string(),
            api_key: SecretString::from("super_secret_key"),
            registration_code: SecretString::from("super_secret_code"),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_key"));
        assert!(!debug_output.contains("super_secret_code"));
    }
}
