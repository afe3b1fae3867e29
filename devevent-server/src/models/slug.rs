//! Event slugs
//!
//! Slugs are derived from titles when events are written and validated
//! when they arrive in a request path.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("invalid whitespace regex"));

/// Anything that is not a lowercase word character or hyphen.
static DISALLOWED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9_-]").expect("invalid slug charset regex"));

static HYPHEN_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").expect("invalid hyphen regex"));

/// Lookup pattern for slugs arriving in URLs
static LOOKUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").expect("invalid slug regex"));

/// Derive a slug from an event title.
///
/// Lowercases and trims the title, turns whitespace runs into a single
/// hyphen, drops everything outside `[a-z0-9_-]` and collapses hyphen runs.
/// The result is a pure function of the title and applying it to its own
/// output is a no-op.
///
/// # Example
/// ```
/// use devevent_server::models::slugify;
///
/// assert_eq!(slugify("DevOps Days NY!!"), "devops-days-ny");
/// assert_eq!(slugify("  React   Meetup "), "react-meetup");
/// ```
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let hyphenated = WHITESPACE_RE.replace_all(lowered.trim(), "-");
    let stripped = DISALLOWED_RE.replace_all(&hyphenated, "");
    HYPHEN_RUN_RE.replace_all(&stripped, "-").into_owned()
}

/// Slug taken from a request path, normalized for lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventSlug(String);

impl EventSlug {
    /// Trim and lowercase `raw`, then require `[a-z0-9-]+`.
    ///
    /// # Example
    /// ```
    /// use devevent_server::models::EventSlug;
    ///
    /// assert_eq!(EventSlug::parse(" React-Meetup ").unwrap().as_str(), "react-meetup");
    /// assert!(EventSlug::parse("react meetup").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let normalized = raw.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(ValidationError::Empty { field: "slug" });
        }

        if !LOOKUP_RE.is_match(&normalized) {
            return Err(ValidationError::InvalidFormat {
                field: "slug",
                reason: "slug contains invalid characters",
            });
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
