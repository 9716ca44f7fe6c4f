//! Registry v2 distribution API types.
//!
//! Only the fields needed to resolve a tag's digest and creation time are
//! modelled; everything else in the registry responses is ignored.

use serde::Deserialize;

/// Media types and headers used by the registry v2 API.
#[derive(Debug, Clone, Copy)]
pub struct MediaType;

impl MediaType {
    /// Docker image manifest, schema 2.
    pub const DOCKER_MANIFEST_V2: &'static str =
        "application/vnd.docker.distribution.manifest.v2+json";
}

/// Response header carrying the registry-assigned manifest digest.
pub const DOCKER_CONTENT_DIGEST: &str = "docker-content-digest";

/// Response from the token realm.
///
/// Token servers return the credential as `token`, `access_token`, or both.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResponse {
    /// Bearer token.
    #[serde(default)]
    pub token: Option<String>,

    /// OAuth2-compatible alias of `token`.
    #[serde(default)]
    pub access_token: Option<String>,
}

impl TokenResponse {
    /// Returns the first non-empty token field.
    #[must_use]
    pub fn into_token(self) -> Option<String> {
        self.token
            .filter(|t| !t.is_empty())
            .or_else(|| self.access_token.filter(|t| !t.is_empty()))
    }
}

/// Response from the `/v2/<name>/tags/list` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TagList {
    /// Repository name.
    #[serde(default)]
    pub name: Option<String>,

    /// List of tags. Registries answer `null` for a repository without tags.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl TagList {
    /// Returns the tags in registry order, empty when none were listed.
    #[must_use]
    pub fn into_tags(self) -> Vec<String> {
        self.tags.unwrap_or_default()
    }
}

/// Content descriptor; every field is optional so partial manifests still parse.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    /// Media type of the referenced content.
    #[serde(default)]
    pub media_type: Option<String>,

    /// Digest of the targeted content.
    #[serde(default)]
    pub digest: Option<String>,

    /// Size in bytes of the content.
    #[serde(default)]
    pub size: Option<u64>,
}

/// Image manifest as returned by `/v2/<name>/manifests/<reference>`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Schema version.
    #[serde(default)]
    pub schema_version: Option<u32>,

    /// Media type of this manifest.
    #[serde(default)]
    pub media_type: Option<String>,

    /// Configuration blob descriptor.
    #[serde(default)]
    pub config: Option<Descriptor>,
}

impl Manifest {
    /// Returns the config blob digest, if the manifest references one.
    #[must_use]
    pub fn config_digest(&self) -> Option<&str> {
        self.config
            .as_ref()
            .and_then(|c| c.digest.as_deref())
            .filter(|d| !d.is_empty())
    }
}

/// Image config blob. Only the creation time is read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageConfig {
    /// Creation time as written by the image builder.
    #[serde(default)]
    pub created: Option<String>,
}
