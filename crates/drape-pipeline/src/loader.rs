use std::time::Duration;

use image::RgbImage;
use tracing::debug;

use drape_core::{Error, Result};

/// Fixed bound on remote image fetches. Not configurable; a slow mirror
/// should fail the job rather than stall it.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// True when the reference points at a remote image rather than a local
/// file. Only `http` and `https` schemes count as remote.
pub fn is_remote(reference: &str) -> bool {
    reqwest::Url::parse(reference)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Load an image from a local path or URL and normalize it to RGB8.
/// Failures are not retried.
pub async fn load_image(client: &reqwest::Client, reference: &str) -> Result<RgbImage> {
    let img = if is_remote(reference) {
        debug!("fetching remote image: {reference}");
        let response = client
            .get(reference)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| Error::Fetch {
                url: reference.to_string(),
                message: e.to_string(),
            })?;
        let bytes = response.bytes().await.map_err(|e| Error::Fetch {
            url: reference.to_string(),
            message: e.to_string(),
        })?;
        image::load_from_memory(&bytes)?
    } else {
        let bytes = tokio::fs::read(reference).await?;
        image::load_from_memory(&bytes)?
    };
    Ok(img.to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_is_remote_classification() {
        assert!(is_remote("http://example.com/person.png"));
        assert!(is_remote("https://example.com/a/b/top.jpg"));
        assert!(!is_remote("person.png"));
        assert!(!is_remote("/data/images/person.png"));
        assert!(!is_remote("file:///data/person.png"));
        assert!(!is_remote(""));
    }

    #[tokio::test]
    async fn test_load_local_image_normalizes_to_rgb() {
        let path = std::env::temp_dir().join(format!(
            "drape-loader-{}-rgb.png",
            std::process::id()
        ));
        RgbImage::from_pixel(4, 2, Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();

        let client = reqwest::Client::new();
        let img = load_image(&client, path.to_str().unwrap()).await.unwrap();
        assert_eq!((img.width(), img.height()), (4, 2));
        assert_eq!(img.get_pixel(0, 0), &Rgb([10, 20, 30]));

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_load_missing_file_is_an_error() {
        let client = reqwest::Client::new();
        let result = load_image(&client, "/definitely/missing/image.png").await;
        assert!(result.is_err());
    }
}
