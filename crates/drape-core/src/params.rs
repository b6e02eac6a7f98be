use serde::{Deserialize, Serialize};

/// Numeric knobs for a generate job. Every field has a serde default so a
/// request may specify any subset of them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationParams {
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_guidance_scale")]
    pub guidance_scale: f32,
    #[serde(default = "default_num_inference_steps")]
    pub num_inference_steps: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            height: default_height(),
            width: default_width(),
            guidance_scale: default_guidance_scale(),
            num_inference_steps: default_num_inference_steps(),
        }
    }
}

fn default_height() -> u32 {
    1024
}

fn default_width() -> u32 {
    1024
}

fn default_guidance_scale() -> f32 {
    1.0
}

fn default_num_inference_steps() -> u32 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let params: GenerationParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, GenerationParams::default());
        assert_eq!(params.height, 1024);
        assert_eq!(params.width, 1024);
        assert_eq!(params.guidance_scale, 1.0);
        assert_eq!(params.num_inference_steps, 10);
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let params: GenerationParams =
            serde_json::from_str(r#"{"height": 512, "num_inference_steps": 28}"#).unwrap();
        assert_eq!(params.height, 512);
        assert_eq!(params.width, 1024);
        assert_eq!(params.guidance_scale, 1.0);
        assert_eq!(params.num_inference_steps, 28);
    }
}
