//! Custom Axum extractors

use axum::extract::{FromRequest, FromRequestParts, Multipart, Path, Request};
use axum::http::request::Parts;

use super::error::ApiError;
use crate::media::ImageUpload;
use crate::models::{EventInput, EventSlug, ValidationError};

/// Extract and normalize an event slug from the path
pub struct ValidEventSlug(pub EventSlug);

impl<S> FromRequestParts<S> for ValidEventSlug
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(slug): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::from(ValidationError::Empty { field: "slug" }))?;

        Ok(Self(EventSlug::parse(&slug)?))
    }
}

/// Event submission decoded from `multipart/form-data`.
///
/// Text parts map onto [`EventInput`] fields; `agenda` and `tags` carry
/// JSON string arrays. `input.image` stays empty until the image part has
/// been uploaded.
#[derive(Debug)]
pub struct EventForm {
    pub input: EventInput,
    pub image: ImageUpload,
}

impl<S> FromRequest<S> for EventForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| ApiError::rejection(e.status(), e.body_text()))?;

        let mut input = EventInput::default();
        let mut image = None;
        let mut agenda = None;
        let mut tags = None;

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();

            if name == "image" {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if !bytes.is_empty() {
                    image = Some(ImageUpload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
                continue;
            }

            let value = field.text().await.map_err(multipart_error)?;
            match name.as_str() {
                "title" => input.title = value,
                "description" => input.description = value,
                "overview" => input.overview = value,
                "venue" => input.venue = value,
                "location" => input.location = value,
                "date" => input.date = value,
                "time" => input.time = value,
                "mode" => input.mode = value,
                "audience" => input.audience = value,
                "organizer" => input.organizer = value,
                "agenda" => agenda = Some(value),
                "tags" => tags = Some(value),
                other => tracing::debug!(field = other, "ignoring unknown form field"),
            }
        }

        let image = image.ok_or_else(|| ApiError::bad_request("Image is required"))?;
        input.agenda = decode_list(agenda.as_deref())?;
        input.tags = decode_list(tags.as_deref())?;

        Ok(Self { input, image })
    }
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::rejection(e.status(), e.body_text())
}

/// Decode a JSON string array; an absent part decodes to an empty list.
fn decode_list(raw: Option<&str>) -> Result<Vec<String>, ApiError> {
    match raw {
        None => Ok(Vec::new()),
        Some(raw) => serde_json::from_str(raw)
            .map_err(|_| ApiError::bad_request("Invalid agenda or tags format")),
    }
}
