//! Registry v2 API client.
//!
//! Every call is issued and awaited in turn; a run makes one token request,
//! one tag-list request, and up to two requests per tag.

use reqwest::header::ACCEPT;
use reqwest::Response;
use tracing::{debug, info};
use url::Url;

use crate::auth::{basic_headers, bearer_headers, token_url};
use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::oci::{Manifest, MediaType, TagList, TokenResponse, DOCKER_CONTENT_DIGEST};
use crate::report::LatestTagReport;
use crate::select::{Selector, TagCandidate};
use crate::timestamp::created_from_config;

/// Manifest details needed to rank a tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestInfo {
    /// Digest from the `Docker-Content-Digest` response header.
    pub digest: Option<String>,

    /// Digest of the config blob referenced by the manifest.
    pub config_digest: Option<String>,
}

/// Client for resolving the latest tag of one repository.
#[derive(Debug)]
pub struct RegistryClient {
    config: RegistryConfig,
    http: reqwest::Client,
}

impl RegistryClient {
    /// Creates a new registry client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tagscout_registry::{Credentials, RegistryClient, RegistryConfig};
    ///
    /// let config = RegistryConfig::new("os/oraclelinux", Credentials::new("user", "pass"));
    /// let client = RegistryClient::new(config)?;
    /// # Ok::<(), tagscout_registry::RegistryError>(())
    /// ```
    pub fn new(config: RegistryConfig) -> Result<Self, RegistryError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| RegistryError::ConnectionFailed {
                url: config.base_url(),
                source: e,
            })?;

        Ok(Self { config, http })
    }

    /// Returns the registry configuration.
    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Scans every tag of the repository and returns the latest one.
    ///
    /// # Errors
    ///
    /// Fails if the token exchange fails, the repository has no tags, any
    /// registry call fails, or no tag with a digest could be chosen.
    pub async fn find_latest(&self) -> Result<LatestTagReport, RegistryError> {
        let repository = &self.config.repository;

        let token = self.request_token().await?;
        info!(repository = %repository, "Obtained registry token");

        let tags = self.list_tags(&token).await?;
        if tags.is_empty() {
            return Err(RegistryError::NoTags {
                repository: repository.clone(),
            });
        }
        info!(repository = %repository, count = tags.len(), "Fetched tag list");

        let mut selector = Selector::new();
        for tag in tags {
            let candidate = self.inspect_tag(&token, &tag).await?;
            debug!(
                tag = %candidate.tag,
                created = ?candidate.created,
                digest = ?candidate.digest,
                "Inspected tag"
            );
            if selector.offer(candidate) {
                if let Some(best) = selector.best() {
                    debug!(tag = %best.tag, created = ?best.created, "New latest candidate");
                }
            }
        }

        let report = LatestTagReport::from_winner(selector.into_best(), repository)?;
        info!(tag = %report.tag, digest = %report.digest, "Selected latest tag");
        Ok(report)
    }

    /// Exchanges the configured basic credentials for a pull-scoped bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AuthenticationFailed`] if the realm rejects the
    /// request or answers without a token.
    pub async fn request_token(&self) -> Result<String, RegistryError> {
        let url = token_url(&self.config)?;

        let response = self
            .http
            .get(url)
            .headers(basic_headers(&self.config.credentials)?)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RegistryError::AuthenticationFailed {
                message: format!("token request returned {}", response.status()),
            });
        }

        let body: TokenResponse = response.json().await.map_err(|e| {
            RegistryError::AuthenticationFailed {
                message: format!("invalid token response: {e}"),
            }
        })?;

        body.into_token()
            .ok_or_else(|| RegistryError::AuthenticationFailed {
                message: "Unable to obtain registry token".to_string(),
            })
    }

    /// Lists the repository's tags in registry order.
    ///
    /// # Errors
    ///
    /// Returns an error if the tags cannot be retrieved.
    pub async fn list_tags(&self, token: &str) -> Result<Vec<String>, RegistryError> {
        let url = self.repository_url(&["tags", "list"])?;

        let response = self
            .http
            .get(url)
            .headers(bearer_headers(token)?)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let tag_list: TagList = response.json().await?;
        Ok(tag_list.into_tags())
    }

    /// Fetches the manifest for `tag`.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be fetched or parsed.
    pub async fn fetch_manifest(
        &self,
        token: &str,
        tag: &str,
    ) -> Result<ManifestInfo, RegistryError> {
        let url = self.repository_url(&["manifests", tag])?;

        let response = self
            .http
            .get(url)
            .headers(bearer_headers(token)?)
            .header(ACCEPT, MediaType::DOCKER_MANIFEST_V2)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let digest = response
            .headers()
            .get(DOCKER_CONTENT_DIGEST)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);

        let body = response.bytes().await?;
        let manifest: Manifest = serde_json::from_slice(&body)?;

        Ok(ManifestInfo {
            digest,
            config_digest: manifest.config_digest().map(ToString::to_string),
        })
    }

    /// Fetches a blob by digest.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob cannot be fetched.
    pub async fn fetch_blob(&self, token: &str, digest: &str) -> Result<Vec<u8>, RegistryError> {
        let url = self.repository_url(&["blobs", digest])?;

        let response = self
            .http
            .get(url)
            .headers(bearer_headers(token)?)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        response.bytes().await.map(|b| b.to_vec()).map_err(Into::into)
    }

    /// Gathers digest and creation time for one tag.
    ///
    /// A config blob whose creation time cannot be read leaves the timestamp
    /// empty instead of failing.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest or config blob request fails.
    pub async fn inspect_tag(
        &self,
        token: &str,
        tag: &str,
    ) -> Result<TagCandidate, RegistryError> {
        let manifest = self.fetch_manifest(token, tag).await?;

        let created = match manifest.config_digest.as_deref() {
            Some(config_digest) => {
                let blob = self.fetch_blob(token, config_digest).await?;
                let created = created_from_config(&blob);
                if created.is_none() {
                    debug!(tag, config_digest, "No usable creation time in config blob");
                }
                created
            }
            None => None,
        };

        Ok(TagCandidate {
            tag: tag.to_string(),
            created,
            digest: manifest.digest,
        })
    }

    /// Builds `<base>/v2/<repository>/<segments...>`, percent-encoding each segment.
    fn repository_url(&self, segments: &[&str]) -> Result<Url, RegistryError> {
        let base = format!("{}/v2/{}", self.config.base_url(), self.config.repository);
        let invalid = || RegistryError::InvalidUrl { url: base.clone() };

        let mut url = Url::parse(&base).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Maps a non-success response to [`RegistryError::HttpError`].
    async fn check_status(response: Response) -> Result<Response, RegistryError> {
        if response.status().is_success() {
            return Ok(response);
        }

        Err(RegistryError::HttpError {
            status: response.status().as_u16(),
            message: response.text().await.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;

    fn client(registry: &str, repository: &str) -> RegistryClient {
        let config = RegistryConfig::new(repository, Credentials::new("user", "pass"))
            .with_registry(registry);
        RegistryClient::new(config).unwrap()
    }

    #[test]
    fn test_client_creation() {
        let config = RegistryConfig::new("os/oraclelinux", Credentials::new("u", "p"));
        let client = RegistryClient::new(config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_exposes_config() {
        let client = client("http://127.0.0.1:5000/", "team/app");
        assert_eq!(client.config().repository, "team/app");
        assert_eq!(client.config().base_url(), "http://127.0.0.1:5000");
    }

    #[test]
    fn test_repository_url_tags() {
        let client = client("container-registry.oracle.com", "os/oraclelinux");
        let url = client.repository_url(&["tags", "list"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://container-registry.oracle.com/v2/os/oraclelinux/tags/list"
        );
    }

    #[test]
    fn test_repository_url_quotes_tag() {
        let client = client("http://127.0.0.1:5000", "app");
        let url = client.repository_url(&["manifests", "v1 beta"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/v2/app/manifests/v1%20beta");
    }

    #[test]
    fn test_repository_url_blob_digest() {
        let client = client("registry.example.com", "team/app");
        let url = client.repository_url(&["blobs", "sha256:abc"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://registry.example.com/v2/team/app/blobs/sha256:abc"
        );
    }
}
