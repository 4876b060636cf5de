//! Profile photo handling: file bytes → data URI when a photo is selected, and
//! data URI → decoded raster when the document embeds it.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat};

use crate::errors::AppError;

/// Encodes raw image file bytes as a `data:` URI, sniffing the format from the bytes.
pub fn file_to_data_uri(bytes: &[u8]) -> Result<String, AppError> {
    let format = image::guess_format(bytes)
        .map_err(|e| AppError::RenderAsset(format!("unrecognised image file: {e}")))?;
    let mime = match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        other => {
            return Err(AppError::RenderAsset(format!(
                "unsupported image format {other:?}"
            )))
        }
    };
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

/// Decodes a `data:<mime>;base64,<payload>` URI into a raster image.
///
/// Fails with `RenderAsset` for anything malformed, undecodable, or whose
/// decoded payload exceeds `max_bytes`.
pub fn decode_data_uri(uri: &str, max_bytes: usize) -> Result<DynamicImage, AppError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| AppError::RenderAsset("photo is not a data URI".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| AppError::RenderAsset("data URI has no payload".to_string()))?;
    if !header.ends_with(";base64") {
        return Err(AppError::RenderAsset(
            "data URI payload is not base64".to_string(),
        ));
    }

    // Reject before allocating: base64 decodes to 3/4 of its length.
    if payload.len() / 4 * 3 > max_bytes {
        return Err(AppError::RenderAsset(format!(
            "photo exceeds {max_bytes} bytes"
        )));
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| AppError::RenderAsset(format!("invalid base64 in photo: {e}")))?;
    if bytes.len() > max_bytes {
        return Err(AppError::RenderAsset(format!(
            "photo exceeds {max_bytes} bytes"
        )));
    }

    image::load_from_memory(&bytes)
        .map_err(|e| AppError::RenderAsset(format!("photo could not be decoded: {e}")))
}

#[cfg(test)]
pub(crate) fn sample_png() -> Vec<u8> {
    let mut buf = std::io::Cursor::new(Vec::new());
    DynamicImage::new_rgb8(4, 4)
        .write_to(&mut buf, ImageFormat::Png)
        .expect("encode png");
    buf.into_inner()
}
