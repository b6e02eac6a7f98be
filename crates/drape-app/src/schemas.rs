use serde::{Deserialize, Serialize};

/// Response for `POST /infer`. Exactly one of `image_base64` and
/// `error_message` is set, governed by `success`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InferenceResponse {
    pub success: bool,
    pub image_base64: Option<String>,
    pub error_message: Option<String>,
}

impl InferenceResponse {
    pub fn ok(image_base64: String) -> Self {
        Self {
            success: true,
            image_base64: Some(image_base64),
            error_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            image_base64: None,
            error_message: Some(message.into()),
        }
    }
}

/// Response for `POST /remove_background`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackgroundRemovalResponse {
    pub success: bool,
    pub output_path: Option<String>,
    pub error_message: Option<String>,
}

impl BackgroundRemovalResponse {
    pub fn ok(output_path: String) -> Self {
        Self {
            success: true,
            output_path: Some(output_path),
            error_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            output_path: None,
            error_message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub services: [&'static str; 2],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_response_has_no_payload() {
        let response = InferenceResponse::failed("boom");
        assert!(!response.success);
        assert_eq!(response.image_base64, None);
        assert_eq!(response.error_message.as_deref(), Some("boom"));
    }

    #[test]
    fn test_ok_response_has_no_error() {
        let response = BackgroundRemovalResponse::ok("outputs/bg_removed/top.png".into());
        assert!(response.success);
        assert_eq!(response.error_message, None);
    }
}
