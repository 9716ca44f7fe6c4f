//! Configuration types for registry client.

use std::fmt;
use std::time::Duration;

use crate::error::RegistryError;

/// Token realm used when none is configured.
pub const DEFAULT_REALM: &str = "https://container-registry.oracle.com/auth";

/// Token service name used when none is configured.
pub const DEFAULT_SERVICE: &str = "Oracle Registry";

/// Registry host used when none is configured.
pub const DEFAULT_REGISTRY: &str = "container-registry.oracle.com";

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variables the configuration is read from.
pub mod env {
    /// Token realm URL.
    pub const REALM: &str = "OCR_REALM";
    /// Token service name.
    pub const SERVICE: &str = "OCR_SERVICE";
    /// Registry host or base URL.
    pub const REGISTRY: &str = "BASE_IMAGE_REGISTRY";
    /// Repository path inside the registry.
    pub const REPOSITORY: &str = "BASE_IMAGE_REPOSITORY";
    /// Username for the token exchange.
    pub const USERNAME: &str = "OCR_USERNAME";
    /// Password for the token exchange.
    pub const PASSWORD: &str = "OCR_PASSWORD";
    /// Per-request timeout in seconds.
    pub const TIMEOUT: &str = "TAGSCOUT_TIMEOUT";
}

/// Returns the value of a required setting.
///
/// Absent and empty values are both rejected.
///
/// # Errors
///
/// Returns [`RegistryError::MissingConfig`] naming the environment variable.
///
/// # Examples
///
/// ```
/// use tagscout_registry::config::{env, require};
///
/// assert_eq!(require(env::REPOSITORY, Some("os/oraclelinux".into())).unwrap(), "os/oraclelinux");
/// assert!(require(env::REPOSITORY, Some(String::new())).is_err());
/// assert!(require(env::REPOSITORY, None).is_err());
/// ```
pub fn require(name: &'static str, value: Option<String>) -> Result<String, RegistryError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(RegistryError::MissingConfig { name })
}

/// Basic credentials exchanged for a pull-scoped bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Username.
    pub username: String,
    /// Password or token.
    pub password: String,
}

impl Credentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Configuration for the registry client.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Registry host (e.g., "container-registry.oracle.com") or base URL.
    pub registry: String,

    /// Repository path (e.g., "os/oraclelinux").
    pub repository: String,

    /// Token realm URL.
    pub realm: String,

    /// Token service name.
    pub service: String,

    /// Credentials for the token exchange.
    pub credentials: Credentials,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,
}

impl RegistryConfig {
    /// Creates a configuration for `repository` with default registry, realm and service.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagscout_registry::{Credentials, RegistryConfig};
    ///
    /// let config = RegistryConfig::new("os/oraclelinux", Credentials::new("user", "pass"));
    /// assert_eq!(config.registry, "container-registry.oracle.com");
    /// assert_eq!(config.service, "Oracle Registry");
    /// ```
    #[must_use]
    pub fn new(repository: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            registry: DEFAULT_REGISTRY.to_string(),
            repository: repository.into(),
            realm: DEFAULT_REALM.to_string(),
            service: DEFAULT_SERVICE.to_string(),
            credentials,
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("tagscout/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Sets the registry host or base URL.
    #[must_use]
    pub fn with_registry(mut self, registry: impl Into<String>) -> Self {
        self.registry = registry.into();
        self
    }

    /// Sets the token realm URL.
    #[must_use]
    pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = realm.into();
        self
    }

    /// Sets the token service name.
    #[must_use]
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the registry base URL that `/v2/...` paths are appended to.
    ///
    /// A bare host is addressed over HTTPS; a value that already carries a
    /// scheme is used as is.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagscout_registry::{Credentials, RegistryConfig};
    ///
    /// let config = RegistryConfig::new("os/oraclelinux", Credentials::new("u", "p"));
    /// assert_eq!(config.base_url(), "https://container-registry.oracle.com");
    ///
    /// let local = config.with_registry("http://127.0.0.1:5000/");
    /// assert_eq!(local.base_url(), "http://127.0.0.1:5000");
    /// ```
    #[must_use]
    pub fn base_url(&self) -> String {
        let registry = self.registry.trim_end_matches('/');
        if registry.starts_with("http://") || registry.starts_with("https://") {
            registry.to_string()
        } else {
            format!("https://{registry}")
        }
    }

    /// Returns the token scope requested for the repository.
    #[must_use]
    pub fn pull_scope(&self) -> String {
        format!("repository:{}:pull", self.repository)
    }
}
