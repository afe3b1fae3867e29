//! Booking documents

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::require;
use super::{FieldErrors, ValidationError};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email regex"));

/// Booking request from an attendee
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingInput {
    pub event_id: String,
    pub email: String,
    pub slug: String,
}

/// Validated booking ready to be inserted.
///
/// The referenced event is not checked here; that needs a store lookup and
/// happens on the write path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub event_id: Uuid,
    pub email: String,
    pub slug: String,
}

/// Stored booking record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub event_id: Uuid,
    pub email: String,
    /// Copy of the booked event's slug
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingInput {
    /// True when event id, email and slug are all present.
    pub fn is_complete(&self) -> bool {
        [&self.event_id, &self.email, &self.slug]
            .iter()
            .all(|value| !value.trim().is_empty())
    }

    /// Validate fields and normalize email and slug (trimmed, lowercased).
    pub fn prepare(&self) -> Result<NewBooking, FieldErrors> {
        let mut errors = FieldErrors::default();

        let event_id = self.event_id.trim();
        let event_id = if event_id.is_empty() {
            errors.push(ValidationError::Empty { field: "eventId" });
            None
        } else {
            let parsed = Uuid::parse_str(event_id).ok();
            if parsed.is_none() {
                errors.push(ValidationError::InvalidFormat {
                    field: "eventId",
                    reason: "invalid event id",
                });
            }
            parsed
        };

        let email = self.email.trim().to_lowercase();
        if email.is_empty() {
            errors.push(ValidationError::Empty { field: "email" });
        } else if !is_valid_email(&email) {
            errors.push(ValidationError::InvalidFormat {
                field: "email",
                reason: "invalid email format",
            });
        }

        require(&mut errors, "slug", &self.slug);
        let slug = self.slug.trim().to_lowercase();

        match event_id {
            Some(event_id) if errors.is_empty() => Ok(NewBooking {
                event_id,
                email,
                slug,
            }),
            _ => Err(errors),
        }
    }
}

/// True if `email` looks like `local@domain.tld`.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}
