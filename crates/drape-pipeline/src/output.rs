use std::path::{Path, PathBuf};

use crate::loader::is_remote;

/// Derive the output filename for a background-removal result when the
/// caller gave no explicit path: basename of the reference (URL path
/// basename for remote inputs, `"image"` when empty), extension forced to
/// `.png`, placed under `output_dir`. Deterministic; distinct inputs that
/// share a basename collide, which is accepted.
pub fn derive_output_path(reference: &str, output_dir: &Path) -> PathBuf {
    let base = if is_remote(reference) {
        reqwest::Url::parse(reference)
            .ok()
            .and_then(|url| {
                url.path_segments()
                    .and_then(|mut segments| segments.next_back().map(str::to_string))
            })
            .unwrap_or_default()
    } else {
        Path::new(reference)
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .unwrap_or_default()
    };

    let base = if base.is_empty() {
        "image".to_string()
    } else {
        base
    };
    let stem = Path::new(&base)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("image");

    output_dir.join(format!("{stem}.png"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derive(reference: &str) -> PathBuf {
        derive_output_path(reference, Path::new("outputs/bg_removed"))
    }

    #[test]
    fn test_local_path_forces_png_extension() {
        assert_eq!(derive("photos/person.jpeg"), Path::new("outputs/bg_removed/person.png"));
        assert_eq!(derive("top.png"), Path::new("outputs/bg_removed/top.png"));
        assert_eq!(derive("scan"), Path::new("outputs/bg_removed/scan.png"));
    }

    #[test]
    fn test_url_uses_path_basename() {
        assert_eq!(
            derive("https://cdn.example.com/items/dress.webp?size=large"),
            Path::new("outputs/bg_removed/dress.png")
        );
    }

    #[test]
    fn test_empty_basename_falls_back_to_image() {
        assert_eq!(derive("https://example.com/"), Path::new("outputs/bg_removed/image.png"));
        assert_eq!(derive(""), Path::new("outputs/bg_removed/image.png"));
    }

    #[test]
    fn test_same_reference_derives_same_path() {
        assert_eq!(derive("a/b/c.jpg"), derive("a/b/c.jpg"));
    }
}
