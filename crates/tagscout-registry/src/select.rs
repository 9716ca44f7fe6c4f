//! Latest-tag selection.
//!
//! Candidates are compared by creation time. A candidate with a timestamp
//! always beats one without; when neither side has one, the lexically
//! greater tag name wins. Tag names are compared as plain strings, so `"v9"`
//! ranks above `"v10"`.

use chrono::{DateTime, FixedOffset};

/// A tag together with the metadata gathered for it during the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCandidate {
    /// Tag name.
    pub tag: String,

    /// Creation time from the config blob, if one could be parsed.
    pub created: Option<DateTime<FixedOffset>>,

    /// Manifest digest reported by the registry.
    pub digest: Option<String>,
}

impl TagCandidate {
    /// Creates a candidate without a timestamp or digest.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            created: None,
            digest: None,
        }
    }

    /// Sets the creation time.
    #[must_use]
    pub fn with_created(mut self, created: DateTime<FixedOffset>) -> Self {
        self.created = Some(created);
        self
    }

    /// Sets the manifest digest.
    #[must_use]
    pub fn with_digest(mut self, digest: impl Into<String>) -> Self {
        self.digest = Some(digest.into());
        self
    }
}

/// Returns `true` when `candidate` should replace the current `best`.
///
/// # Examples
///
/// ```
/// use tagscout_registry::{should_replace, TagCandidate};
///
/// let a = TagCandidate::new("a");
/// let b = TagCandidate::new("b");
///
/// assert!(should_replace(None, &a));
/// assert!(should_replace(Some(&a), &b));
/// assert!(!should_replace(Some(&b), &a));
/// ```
#[must_use]
pub fn should_replace(best: Option<&TagCandidate>, candidate: &TagCandidate) -> bool {
    let Some(best) = best else {
        return true;
    };

    match (candidate.created, best.created) {
        (Some(candidate_created), Some(best_created)) => candidate_created > best_created,
        (Some(_), None) => true,
        (None, Some(_)) => false,
        (None, None) => candidate.tag > best.tag,
    }
}

/// Running selection over a sequence of candidates.
#[derive(Debug, Default)]
pub struct Selector {
    best: Option<TagCandidate>,
}

impl Selector {
    /// Creates an empty selector.
    #[must_use]
    pub const fn new() -> Self {
        Self { best: None }
    }

    /// Offers a candidate, returning `true` if it became the new best.
    pub fn offer(&mut self, candidate: TagCandidate) -> bool {
        if should_replace(self.best.as_ref(), &candidate) {
            self.best = Some(candidate);
            true
        } else {
            false
        }
    }

    /// Returns the current best candidate.
    #[must_use]
    pub const fn best(&self) -> Option<&TagCandidate> {
        self.best.as_ref()
    }

    /// Consumes the selector, returning the winner.
    #[must_use]
    pub fn into_best(self) -> Option<TagCandidate> {
        self.best
    }
}

impl FromIterator<TagCandidate> for Selector {
    fn from_iter<I: IntoIterator<Item = TagCandidate>>(iter: I) -> Self {
        let mut selector = Self::new();
        for candidate in iter {
            selector.offer(candidate);
        }
        selector
    }
}
