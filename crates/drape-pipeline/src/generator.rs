use std::time::Duration;

use async_trait::async_trait;
use image::{DynamicImage, RgbImage};
use serde::{Deserialize, Serialize};

use drape_core::{Error, GenerationParams, Result};

use crate::codec::{decode_png_base64, encode_png_base64};

/// Text+image conditioned generation. One call, one output image.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        images: &[RgbImage],
        params: &GenerationParams,
    ) -> Result<RgbImage>;
}

#[derive(Serialize)]
struct BackendGenerateRequest<'a> {
    prompt: &'a str,
    images: Vec<String>,
    height: u32,
    width: u32,
    guidance_scale: f32,
    num_inference_steps: u32,
}

#[derive(Deserialize)]
pub(crate) struct BackendResponse {
    pub(crate) status: String,
    pub(crate) image: Option<String>,
    pub(crate) error: Option<String>,
}

/// HTTP client for the diffusion sidecar service. Input images and the
/// result cross the wire as base64 PNG.
pub struct DiffusionBackend {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl DiffusionBackend {
    pub fn new(client: reqwest::Client, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            url: url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl ImageGenerator for DiffusionBackend {
    async fn generate(
        &self,
        prompt: &str,
        images: &[RgbImage],
        params: &GenerationParams,
    ) -> Result<RgbImage> {
        let request_body = BackendGenerateRequest {
            prompt,
            images: images
                .iter()
                .map(|img| encode_png_base64(&DynamicImage::ImageRgb8(img.clone())))
                .collect::<Result<Vec<_>>>()?,
            height: params.height,
            width: params.width,
            guidance_scale: params.guidance_scale,
            num_inference_steps: params.num_inference_steps,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request_body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Error::backend(format!("failed to reach generator at {}: {e}", self.url)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::backend(format!("HTTP {status}: {body}")));
        }

        let result: BackendResponse = response
            .json()
            .await
            .map_err(|e| Error::backend(format!("failed to parse generator response: {e}")))?;

        let data = parse_envelope(result)?;
        Ok(decode_png_base64(&data)?.to_rgb8())
    }
}

/// Unpack the `{status, image, error}` envelope shared by both backends.
pub(crate) fn parse_envelope(response: BackendResponse) -> Result<String> {
    match response.status.as_str() {
        "success" => response
            .image
            .ok_or_else(|| Error::backend("no image returned")),
        "error" => Err(Error::backend(
            response.error.unwrap_or_else(|| "unknown error".to_string()),
        )),
        other => Err(Error::backend(format!("unexpected status: {other}"))),
    }
}
