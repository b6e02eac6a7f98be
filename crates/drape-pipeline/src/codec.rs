use std::io::Cursor;

use base64::{Engine, prelude::BASE64_STANDARD};
use image::{DynamicImage, ImageFormat};

use drape_core::Result;

/// Encode an image as PNG bytes.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Encode an image as a base64 PNG string, the transport framing used by
/// both service surfaces and the backend wire format.
pub fn encode_png_base64(img: &DynamicImage) -> Result<String> {
    Ok(BASE64_STANDARD.encode(encode_png(img)?))
}

/// Decode a base64 PNG string back into an image.
pub fn decode_png_base64(data: &str) -> Result<DynamicImage> {
    let bytes = BASE64_STANDARD.decode(data)?;
    Ok(image::load_from_memory(&bytes)?)
}
