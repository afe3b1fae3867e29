//! Media upload collaborator
//!
//! Event images are stored by an external media host. The server posts the
//! file as multipart form data and keeps the hosted URL it gets back.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::config::MediaConfig;

/// Image file received with an event submission
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("media upload is not configured (set MEDIA_UPLOAD_URL)")]
    NotConfigured,

    #[error("upload request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upload response did not include a hosted URL")]
    MissingUrl,
}

/// Stores an image and returns its public URL.
#[async_trait]
pub trait MediaUploader: Send + Sync {
    async fn upload(&self, image: ImageUpload) -> Result<String, UploadError>;
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

/// Uploads over HTTP to a Cloudinary-style unsigned upload endpoint.
pub struct HttpUploader {
    client: reqwest::Client,
    config: MediaConfig,
}

impl HttpUploader {
    pub fn new(config: MediaConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn form(&self, image: ImageUpload) -> Result<Form, UploadError> {
        let mut part = Part::bytes(image.bytes).file_name(image.file_name);
        if let Some(content_type) = image.content_type.as_deref() {
            part = part.mime_str(content_type)?;
        }

        let mut form = Form::new()
            .part("file", part)
            .text("folder", self.config.folder.clone());
        if let Some(preset) = &self.config.upload_preset {
            form = form.text("upload_preset", preset.clone());
        }
        Ok(form)
    }
}

#[async_trait]
impl MediaUploader for HttpUploader {
    async fn upload(&self, image: ImageUpload) -> Result<String, UploadError> {
        let endpoint = self
            .config
            .upload_url
            .as_deref()
            .ok_or(UploadError::NotConfigured)?;

        let size = image.bytes.len();
        let form = self.form(image)?;
        let response: UploadResponse = self
            .client
            .post(endpoint)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let url = response.secure_url.ok_or(UploadError::MissingUrl)?;
        tracing::debug!(bytes = size, url = %url, "image uploaded");
        Ok(url)
    }
}
