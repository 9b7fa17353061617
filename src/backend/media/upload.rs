/**
 * Image Upload
 *
 * Uploads client-supplied images (base64 data URIs or remote URLs) to a
 * Cloudinary-compatible asset host and returns the hosted `secure_url`.
 * Only that URL is ever stored; raw image data never reaches the database.
 *
 * # Protocol
 *
 * Unsigned upload: a form POST to
 * `{api_base}/v1_1/{cloud_name}/image/upload` with fields `file` and
 * `upload_preset`. The JSON response carries `secure_url`.
 *
 * # Unconfigured hosts
 *
 * Without a cloud name and upload preset the uploader still exists but
 * rejects every upload with `MediaError::NotConfigured`, which handlers
 * surface as 503.
 */
use axum::http::StatusCode;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

/// Asset host settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MediaSettings {
    pub cloud_name: String,
    pub upload_preset: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("image uploads are not configured")]
    NotConfigured,

    #[error("upload request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("asset host rejected upload with {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("asset host response did not include secure_url")]
    MissingUrl,
}

impl MediaError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            Self::NotConfigured => "Image uploads are not configured",
            _ => "Image upload failed",
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

/// Client for the asset host
pub struct MediaUploader {
    client: reqwest::Client,
    settings: Option<MediaSettings>,
}

impl MediaUploader {
    pub fn new(settings: Option<MediaSettings>) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.settings.is_some()
    }

    /// Upload `data` and return its hosted URL
    pub async fn upload(&self, data: &str) -> Result<String, MediaError> {
        let settings = self.settings.as_ref().ok_or(MediaError::NotConfigured)?;
        let endpoint = format!(
            "{}/v1_1/{}/image/upload",
            settings.api_base.trim_end_matches('/'),
            settings.cloud_name
        );

        tracing::debug!("[Media] Uploading {} bytes to {}", data.len(), endpoint);

        let response = self
            .client
            .post(&endpoint)
            .form(&[("file", data), ("upload_preset", settings.upload_preset.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("[Media] Upload rejected with {}", status);
            return Err(MediaError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let uploaded: UploadResponse = response.json().await?;
        let url = uploaded.secure_url.ok_or(MediaError::MissingUrl)?;
        tracing::info!("[Media] Uploaded image to {}", url);
        Ok(url)
    }
}
