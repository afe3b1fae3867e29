//! Event documents
//!
//! `EventInput` is what a submission carries, `NewEvent` is the validated
//! and normalized form handed to the store, and `Event` is the stored record.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slug::slugify;
use super::validation::{require, require_min_len};
use super::{FieldErrors, ValidationError};

const MIN_TITLE_LEN: usize = 3;
const MIN_TEXT_LEN: usize = 10;

/// 24-hour `HH:mm`, hour may be a single digit
static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$").expect("invalid time regex"));

/// Calendar formats accepted for `date`, tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%A, %B %d, %Y",
];

/// Timestamp formats without an offset; the date part is kept.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// How an event is attended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventMode {
    Online,
    Offline,
    Hybrid,
}

impl EventMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Hybrid => "hybrid",
        }
    }

    /// Parse a stored or submitted mode. Matching is exact.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "online" => Some(Self::Online),
            "offline" => Some(Self::Offline),
            "hybrid" => Some(Self::Hybrid),
            _ => None,
        }
    }
}

/// Event fields as submitted by an admin.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventInput {
    pub title: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub mode: String,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
}

/// Validated, normalized event ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: NaiveDate,
    pub time: String,
    pub mode: EventMode,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
}

/// Stored event record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    /// Serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
    pub time: String,
    pub mode: EventMode,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// True if this event shares at least one tag with `other`.
    pub fn shares_tag_with(&self, other: &Event) -> bool {
        self.tags.iter().any(|tag| other.tags.contains(tag))
    }
}

impl EventInput {
    /// Validate every field, then normalize the derived ones.
    ///
    /// `previous` is the currently stored version when re-submitting an
    /// event. Slug, date and time are only recomputed for fields that differ
    /// from it; on create (`None`) every field counts as changed.
    ///
    /// Returns all field errors at once rather than stopping at the first.
    pub fn prepare(&self, previous: Option<&Event>) -> Result<NewEvent, FieldErrors> {
        let mut errors = FieldErrors::default();

        let title = self.title.trim();
        require_min_len(&mut errors, "title", title, MIN_TITLE_LEN);
        require_min_len(&mut errors, "description", &self.description, MIN_TEXT_LEN);
        require_min_len(&mut errors, "overview", &self.overview, MIN_TEXT_LEN);
        require(&mut errors, "image", &self.image);
        require(&mut errors, "venue", &self.venue);
        require(&mut errors, "location", &self.location);
        require(&mut errors, "audience", &self.audience);
        require(&mut errors, "organizer", &self.organizer);

        let mode = EventMode::parse(self.mode.trim());
        if mode.is_none() {
            errors.push(if self.mode.trim().is_empty() {
                ValidationError::Empty { field: "mode" }
            } else {
                ValidationError::InvalidVariant {
                    field: "mode",
                    value: self.mode.clone(),
                }
            });
        }

        let agenda = check_list(&mut errors, "agenda", &self.agenda);
        let tags = check_list(&mut errors, "tags", &self.tags);

        let slug = match previous {
            Some(prev) if prev.title == title => prev.slug.clone(),
            _ => slugify(title),
        };
        if title.chars().count() >= MIN_TITLE_LEN && slug.is_empty() {
            errors.push(ValidationError::InvalidFormat {
                field: "title",
                reason: "must contain at least one letter or digit",
            });
        }

        let date = self.normalized_date(previous, &mut errors);
        let time = self.checked_time(previous, &mut errors);

        match (mode, date, time) {
            (Some(mode), Some(date), Some(time)) if errors.is_empty() => Ok(NewEvent {
                title: title.to_owned(),
                slug,
                description: self.description.clone(),
                overview: self.overview.clone(),
                image: self.image.trim().to_owned(),
                venue: self.venue.clone(),
                location: self.location.clone(),
                date,
                time,
                mode,
                audience: self.audience.clone(),
                agenda,
                organizer: self.organizer.clone(),
                tags,
            }),
            _ => Err(errors),
        }
    }

    fn normalized_date(
        &self,
        previous: Option<&Event>,
        errors: &mut FieldErrors,
    ) -> Option<NaiveDate> {
        let raw = self.date.trim();
        if let Some(prev) = previous {
            if prev.date.format("%Y-%m-%d").to_string() == raw {
                return Some(prev.date);
            }
        }

        if raw.is_empty() {
            errors.push(ValidationError::Empty { field: "date" });
            return None;
        }

        let date = normalize_date(raw);
        if date.is_none() {
            errors.push(ValidationError::InvalidFormat {
                field: "date",
                reason: "invalid date",
            });
        }
        date
    }

    fn checked_time(&self, previous: Option<&Event>, errors: &mut FieldErrors) -> Option<String> {
        let raw = self.time.trim();
        if let Some(prev) = previous {
            if prev.time == raw {
                return Some(prev.time.clone());
            }
        }

        if raw.is_empty() {
            errors.push(ValidationError::Empty { field: "time" });
            return None;
        }

        if !is_valid_time(raw) {
            errors.push(ValidationError::InvalidFormat {
                field: "time",
                reason: "must be in HH:mm format (24-hour)",
            });
            return None;
        }
        Some(raw.to_owned())
    }
}

/// Keep the order of `items`; every entry must be non-blank and the list non-empty.
fn check_list(errors: &mut FieldErrors, field: &'static str, items: &[String]) -> Vec<String> {
    if items.is_empty() {
        errors.push(ValidationError::Empty { field });
    } else if items.iter().any(|item| item.trim().is_empty()) {
        errors.push(ValidationError::InvalidFormat {
            field,
            reason: "items cannot be empty",
        });
    }
    items.iter().map(|item| item.trim().to_owned()).collect()
}

/// Parse a calendar date from any supported format.
///
/// Timestamps with an offset are converted to UTC before the date is taken.
///
/// # Example
/// ```
/// use devevent_server::models::normalize_date;
///
/// let date = normalize_date("March 5, 2026").unwrap();
/// assert_eq!(date.to_string(), "2026-03-05");
/// assert!(normalize_date("next tuesday").is_none());
/// ```
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// True if `raw` is a 24-hour `HH:mm` time.
pub fn is_valid_time(raw: &str) -> bool {
    TIME_RE.is_match(raw)
}
