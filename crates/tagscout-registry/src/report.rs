//! Result record written for the automation pipeline.

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::select::TagCandidate;
use crate::timestamp::format_created;

/// The winning tag, its creation time and its manifest digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestTagReport {
    /// Tag name.
    pub tag: String,

    /// ISO 8601 creation time, or an empty string when unknown.
    pub created: String,

    /// Manifest digest.
    pub digest: String,
}

impl LatestTagReport {
    /// Builds the report from the scan winner.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NoWinner`] if there is no winner or the
    /// winner carries no digest.
    pub fn from_winner(
        winner: Option<TagCandidate>,
        repository: &str,
    ) -> Result<Self, RegistryError> {
        let no_winner = || RegistryError::NoWinner {
            repository: repository.to_string(),
        };

        let winner = winner.ok_or_else(no_winner)?;
        let digest = winner
            .digest
            .filter(|d| !d.is_empty())
            .ok_or_else(no_winner)?;
        if winner.tag.is_empty() {
            return Err(no_winner());
        }

        Ok(Self {
            created: winner.created.as_ref().map(format_created).unwrap_or_default(),
            tag: winner.tag,
            digest,
        })
    }

    /// Serializes the report as a single line of JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, RegistryError> {
        serde_json::to_string(self).map_err(Into::into)
    }
}
