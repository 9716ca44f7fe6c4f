//! Basic-to-bearer token exchange helpers.

use base64::Engine as _;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use url::Url;

use crate::config::{Credentials, RegistryConfig};
use crate::error::RegistryError;

/// Builds the pull-scoped token request URL for the configured realm.
///
/// # Errors
///
/// Returns [`RegistryError::InvalidUrl`] if the realm is not a valid URL.
///
/// # Examples
///
/// ```
/// use tagscout_registry::{auth::token_url, Credentials, RegistryConfig};
///
/// let config = RegistryConfig::new("os/oraclelinux", Credentials::new("u", "p"));
/// let url = token_url(&config).unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://container-registry.oracle.com/auth?service=Oracle+Registry&scope=repository%3Aos%2Foraclelinux%3Apull"
/// );
/// ```
pub fn token_url(config: &RegistryConfig) -> Result<Url, RegistryError> {
    Url::parse_with_params(
        &config.realm,
        &[
            ("service", config.service.clone()),
            ("scope", config.pull_scope()),
        ],
    )
    .map_err(|_| RegistryError::InvalidUrl {
        url: config.realm.clone(),
    })
}

/// Creates the `Authorization: Basic` header for the token request.
pub(crate) fn basic_headers(credentials: &Credentials) -> Result<HeaderMap, RegistryError> {
    let encoded = base64::engine::general_purpose::STANDARD.encode(format!(
        "{}:{}",
        credentials.username, credentials.password
    ));

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Basic {encoded}")).map_err(|_| {
            RegistryError::AuthenticationFailed {
                message: "Invalid credentials".to_string(),
            }
        })?,
    );
    Ok(headers)
}

/// Creates the `Authorization: Bearer` header for registry calls.
pub(crate) fn bearer_headers(token: &str) -> Result<HeaderMap, RegistryError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
        RegistryError::AuthenticationFailed {
            message: "Invalid token".to_string(),
        }
    })?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_url_encodes_query() {
        let config = RegistryConfig::new("team/app", Credentials::new("u", "p"))
            .with_realm("https://auth.example.com/token")
            .with_service("registry.example.com");

        let url = token_url(&config).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("service".to_string(), "registry.example.com".to_string()),
                ("scope".to_string(), "repository:team/app:pull".to_string()),
            ]
        );
        assert_eq!(url.path(), "/token");
    }

    #[test]
    fn test_token_url_invalid_realm() {
        let config =
            RegistryConfig::new("app", Credentials::new("u", "p")).with_realm("not a url");
        assert!(matches!(
            token_url(&config),
            Err(RegistryError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_basic_headers() {
        let headers = basic_headers(&Credentials::new("user", "pass")).unwrap();
        let auth = headers.get(AUTHORIZATION).unwrap().to_str().unwrap();
        assert_eq!(auth, "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn test_bearer_headers() {
        let headers = bearer_headers("my-token").unwrap();
        let auth = headers.get(AUTHORIZATION).unwrap();
        assert_eq!(auth.to_str().unwrap(), "Bearer my-token");
        assert!(auth.is_sensitive());
    }

    #[test]
    fn test_bearer_headers_rejects_control_chars() {
        assert!(bearer_headers("bad\ntoken").is_err());
    }
}
