use std::path::PathBuf;
use std::sync::Arc;

use image::DynamicImage;
use serde::Deserialize;
use tracing::debug;

use drape_core::{Error, GenerationParams, MAX_INPUT_IMAGES, RemovalSelector, Result};

use crate::codec::{encode_png, encode_png_base64};
use crate::generator::ImageGenerator;
use crate::loader::load_image;
use crate::output::derive_output_path;
use crate::remover::BackgroundRemover;

/// Input for a generate job, shared verbatim by the HTTP and queue
/// surfaces. `prompt` and `image_paths` stay optional here so a missing
/// field reaches the validation tier instead of failing deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateJob {
    pub prompt: Option<String>,
    pub image_paths: Option<Vec<String>>,
    #[serde(flatten)]
    pub params: GenerationParams,
    #[serde(default)]
    pub remove_background: RemovalSelector,
}

/// Input for a background-removal job.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoveBackgroundJob {
    pub image_path: Option<String>,
    pub output_path: Option<String>,
}

/// One shared handle per process: the fetch client plus the two model
/// backends. Built once on first use and reused for every job after.
pub struct Pipeline {
    http: reqwest::Client,
    generator: Arc<dyn ImageGenerator>,
    remover: Arc<dyn BackgroundRemover>,
    output_dir: PathBuf,
}

impl Pipeline {
    pub fn new(
        http: reqwest::Client,
        generator: Arc<dyn ImageGenerator>,
        remover: Arc<dyn BackgroundRemover>,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            http,
            generator,
            remover,
            output_dir,
        }
    }

    /// Run a generate job: validate, resolve per-image flags, load each
    /// image in order (stripping backgrounds where flagged), invoke the
    /// generator once, and encode the result as base64 PNG.
    pub async fn generate(&self, job: &GenerateJob) -> Result<String> {
        let prompt = job
            .prompt
            .as_deref()
            .filter(|prompt| !prompt.trim().is_empty())
            .ok_or_else(|| Error::validation("'prompt' is required for the infer task"))?;
        let refs = job
            .image_paths
            .as_deref()
            .filter(|refs| !refs.is_empty())
            .ok_or_else(|| Error::validation("'image_paths' is required for the infer task"))?;
        if refs.len() > MAX_INPUT_IMAGES {
            return Err(Error::validation(format!(
                "at most {MAX_INPUT_IMAGES} input images are supported, got {}",
                refs.len()
            )));
        }

        let flags = job.remove_background.resolve(refs.len());
        debug!(images = refs.len(), ?flags, "running generate job");

        // Sequential on purpose: one image at a time, result order matches
        // input order.
        let mut images = Vec::with_capacity(refs.len());
        for (reference, strip) in refs.iter().zip(&flags) {
            let img = load_image(&self.http, reference).await?;
            let img = if *strip {
                let cutout = self.remover.remove(&img).await?;
                DynamicImage::ImageRgba8(cutout).to_rgb8()
            } else {
                img
            };
            images.push(img);
        }

        let result = self.generator.generate(prompt, &images, &job.params).await?;
        encode_png_base64(&DynamicImage::ImageRgb8(result))
    }

    /// Queue-surface variant: remove the background from one image and
    /// return the cutout as base64 PNG.
    pub async fn remove_background_to_base64(&self, job: &RemoveBackgroundJob) -> Result<String> {
        let reference = required_image_path(job)?;
        let img = load_image(&self.http, reference).await?;
        let cutout = self.remover.remove(&img).await?;
        encode_png_base64(&DynamicImage::ImageRgba8(cutout))
    }

    /// HTTP-surface/library variant: remove the background from one image
    /// and write the cutout to `output_path`, or to a path derived from
    /// the input reference when none is given. Returns the written path.
    pub async fn remove_background_to_file(&self, job: &RemoveBackgroundJob) -> Result<PathBuf> {
        let reference = required_image_path(job)?;
        let img = load_image(&self.http, reference).await?;
        let cutout = self.remover.remove(&img).await?;

        let path = match &job.output_path {
            Some(explicit) => PathBuf::from(explicit),
            None => derive_output_path(reference, &self.output_dir),
        };
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let png = encode_png(&DynamicImage::ImageRgba8(cutout))?;
        tokio::fs::write(&path, png).await?;
        Ok(path)
    }
}

fn required_image_path(job: &RemoveBackgroundJob) -> Result<&str> {
    job.image_path
        .as_deref()
        .filter(|path| !path.is_empty())
        .ok_or_else(|| Error::validation("'image_path' is required for the remove_background task"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    use crate::codec::decode_png_base64;

    #[derive(Default)]
    pub(crate) struct StubGenerator {
        pub(crate) calls: AtomicUsize,
    }

    #[async_trait]
    impl ImageGenerator for StubGenerator {
        async fn generate(
            &self,
            _prompt: &str,
            images: &[RgbImage],
            _params: &GenerationParams,
        ) -> Result<RgbImage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(!images.is_empty());
            Ok(RgbImage::from_pixel(8, 8, Rgb([1, 2, 3])))
        }
    }

    #[derive(Default)]
    pub(crate) struct StubRemover {
        pub(crate) calls: AtomicUsize,
    }

    #[async_trait]
    impl BackgroundRemover for StubRemover {
        async fn remove(&self, image: &RgbImage) -> Result<RgbaImage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut cutout = RgbaImage::new(image.width(), image.height());
            for (x, y, pixel) in cutout.enumerate_pixels_mut() {
                let Rgb([r, g, b]) = *image.get_pixel(x, y);
                *pixel = Rgba([r, g, b, 255]);
            }
            Ok(cutout)
        }
    }

    fn test_pipeline() -> (Pipeline, Arc<StubGenerator>, Arc<StubRemover>) {
        let generator = Arc::new(StubGenerator::default());
        let remover = Arc::new(StubRemover::default());
        let output_dir = std::env::temp_dir().join(format!("drape-job-{}", std::process::id()));
        let pipeline = Pipeline::new(
            reqwest::Client::new(),
            generator.clone(),
            remover.clone(),
            output_dir,
        );
        (pipeline, generator, remover)
    }

    fn temp_png(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("drape-job-{}-{name}", std::process::id()));
        RgbImage::from_pixel(4, 4, Rgb([200, 100, 50]))
            .save(&path)
            .unwrap();
        path
    }

    fn generate_job(prompt: Option<&str>, image_paths: Option<Vec<String>>) -> GenerateJob {
        GenerateJob {
            prompt: prompt.map(str::to_string),
            image_paths,
            params: GenerationParams::default(),
            remove_background: RemovalSelector::Absent,
        }
    }

    #[tokio::test]
    async fn test_missing_prompt_fails_before_any_model_call() {
        let (pipeline, generator, remover) = test_pipeline();
        let job = generate_job(None, Some(vec!["person.png".into()]));

        let err = pipeline.generate(&job).await.unwrap_err();
        assert!(err.to_string().contains("prompt"));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(remover.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_image_list_fails_before_any_model_call() {
        let (pipeline, generator, _) = test_pipeline();

        for image_paths in [None, Some(vec![])] {
            let job = generate_job(Some("a red dress"), image_paths);
            let err = pipeline.generate(&job).await.unwrap_err();
            assert!(err.to_string().contains("image_paths"));
        }
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_too_many_images_is_a_validation_error() {
        let (pipeline, generator, _) = test_pipeline();
        let refs = (0..5).map(|i| format!("img_{i}.png")).collect();
        let job = generate_job(Some("prompt"), Some(refs));

        let err = pipeline.generate(&job).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_generate_strips_backgrounds_for_flagged_images_only() {
        let (pipeline, generator, remover) = test_pipeline();
        let person = temp_png("person.png");
        let top = temp_png("top.png");
        let mut job = generate_job(
            Some("wearing the top"),
            Some(vec![
                person.to_str().unwrap().to_string(),
                top.to_str().unwrap().to_string(),
            ]),
        );
        job.remove_background = RemovalSelector::PerImage(vec![true]);

        let encoded = pipeline.generate(&job).await.unwrap();
        let result = decode_png_base64(&encoded).unwrap().to_rgb8();
        assert_eq!((result.width(), result.height()), (8, 8));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        // Only the first image was flagged; the second padded to false.
        assert_eq!(remover.calls.load(Ordering::SeqCst), 1);

        std::fs::remove_file(&person).ok();
        std::fs::remove_file(&top).ok();
    }

    #[tokio::test]
    async fn test_missing_image_path_fails_without_invoking_remover() {
        let (pipeline, _, remover) = test_pipeline();
        let job = RemoveBackgroundJob {
            image_path: None,
            output_path: None,
        };

        let err = pipeline.remove_background_to_base64(&job).await.unwrap_err();
        assert!(err.to_string().contains("image_path"));
        let err = pipeline.remove_background_to_file(&job).await.unwrap_err();
        assert!(err.to_string().contains("image_path"));
        assert_eq!(remover.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_remove_background_to_file_derives_png_path() {
        let (pipeline, _, remover) = test_pipeline();
        let input = temp_png("jacket.jpg");
        let job = RemoveBackgroundJob {
            image_path: Some(input.to_str().unwrap().to_string()),
            output_path: None,
        };

        let written = pipeline.remove_background_to_file(&job).await.unwrap();
        assert_eq!(written.extension().unwrap(), "png");
        assert!(written.exists());
        assert_eq!(remover.calls.load(Ordering::SeqCst), 1);

        std::fs::remove_file(&input).ok();
        std::fs::remove_file(&written).ok();
    }

    #[tokio::test]
    async fn test_remove_background_honors_explicit_output_path() {
        let (pipeline, _, _) = test_pipeline();
        let input = temp_png("coat.png");
        let explicit = std::env::temp_dir()
            .join(format!("drape-job-{}-explicit", std::process::id()))
            .join("cutout.png");
        let job = RemoveBackgroundJob {
            image_path: Some(input.to_str().unwrap().to_string()),
            output_path: Some(explicit.to_str().unwrap().to_string()),
        };

        let written = pipeline.remove_background_to_file(&job).await.unwrap();
        assert_eq!(written, explicit);
        assert!(explicit.exists());

        std::fs::remove_file(&input).ok();
        std::fs::remove_file(&explicit).ok();
    }
}
