//! Error types for registry operations.

use thiserror::Error;

/// Errors that can occur while resolving the latest tag of a repository.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A required configuration value is missing or empty.
    #[error("Environment variable {name} is required")]
    MissingConfig {
        /// Name of the environment variable backing the setting.
        name: &'static str,
    },

    /// Failed to connect to registry.
    #[error("Failed to connect to registry at {url}: {source}")]
    ConnectionFailed {
        /// Registry URL.
        url: String,
        /// Underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// Token exchange failed or returned no token.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed {
        /// Error message.
        message: String,
    },

    /// HTTP error from registry.
    #[error("HTTP error from registry: {status} - {message}")]
    HttpError {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// JSON deserialization error.
    #[error("JSON error: {source}")]
    JsonError {
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// A request URL could not be built.
    #[error("Invalid URL: {url}")]
    InvalidUrl {
        /// URL string.
        url: String,
    },

    /// The registry returned an empty tag list.
    #[error("No tags returned from registry for {repository}")]
    NoTags {
        /// Repository path.
        repository: String,
    },

    /// The scan finished without a winning tag and digest.
    #[error("Unable to determine latest tag and digest for {repository}")]
    NoWinner {
        /// Repository path.
        repository: String,
    },
}

impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::ConnectionFailed {
                url: err
                    .url()
                    .map_or_else(|| "unknown".to_string(), ToString::to_string),
                source: err,
            }
        } else if err.is_status() {
            let status = err.status().map_or(0, |s| s.as_u16());
            Self::HttpError {
                status,
                message: err.to_string(),
            }
        } else {
            Self::HttpError {
                status: 0,
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError { source: err }
    }
}
