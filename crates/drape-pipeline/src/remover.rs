use std::time::Duration;

use async_trait::async_trait;
use image::{DynamicImage, RgbImage, RgbaImage};
use serde::Serialize;

use drape_core::{Error, Result};

use crate::codec::{decode_png_base64, encode_png_base64};
use crate::generator::{BackendResponse, parse_envelope};

/// Background segmentation. Takes one image, returns the cutout with the
/// background stripped to transparent alpha.
#[async_trait]
pub trait BackgroundRemover: Send + Sync {
    async fn remove(&self, image: &RgbImage) -> Result<RgbaImage>;
}

#[derive(Serialize)]
struct BackendRemoveRequest {
    image: String,
}

/// HTTP client for the matting sidecar service. Same `{status, image,
/// error}` envelope as the generator.
pub struct MattingBackend {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl MattingBackend {
    pub fn new(client: reqwest::Client, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            url: url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl BackgroundRemover for MattingBackend {
    async fn remove(&self, image: &RgbImage) -> Result<RgbaImage> {
        let request_body = BackendRemoveRequest {
            image: encode_png_base64(&DynamicImage::ImageRgb8(image.clone()))?,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request_body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Error::backend(format!("failed to reach remover at {}: {e}", self.url)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::backend(format!("HTTP {status}: {body}")));
        }

        let result: BackendResponse = response
            .json()
            .await
            .map_err(|e| Error::backend(format!("failed to parse remover response: {e}")))?;

        let data = parse_envelope(result)?;
        Ok(decode_png_base64(&data)?.to_rgba8())
    }
}
