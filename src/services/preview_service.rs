use crate::error::AppError;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::ImageReader;
use std::io::Cursor;
use std::path::Path;

const PREVIEW_SIZE: u32 = 300;
const PREVIEW_QUALITY: u8 = 70;

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff", "tif",
];

/// Whether a path looks like an image. This is only a hint for the user;
/// the backend does the real content check.
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Decode the image and shrink it to fit a `PREVIEW_SIZE` box, as JPEG bytes.
pub fn generate_preview_bytes(path: &Path) -> Result<Vec<u8>, AppError> {
    let mut img = ImageReader::open(path)
        .map_err(|e| AppError {
            kind: crate::error::ErrorKind::Io,
            message: format!("Failed to open image {}: {}", path.display(), e),
        })?
        .with_guessed_format()?
        .decode()
        .map_err(|e| AppError {
            kind: crate::error::ErrorKind::Io,
            message: format!("Failed to decode image {}: {}", path.display(), e),
        })?;

    // Two-step resize: nearest down to ~4x, then a proper filter.
    let intermediate = PREVIEW_SIZE * 4;
    if img.width() > intermediate * 2 || img.height() > intermediate * 2 {
        img = img.resize(intermediate, intermediate, FilterType::Nearest);
    }
    if img.width() > PREVIEW_SIZE || img.height() > PREVIEW_SIZE {
        img = img.resize(PREVIEW_SIZE, PREVIEW_SIZE, FilterType::Triangle);
    }

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, PREVIEW_QUALITY);
    // JPEG has no alpha channel.
    image::DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| AppError {
            kind: crate::error::ErrorKind::Internal,
            message: format!("Failed to encode preview: {}", e),
        })?;
    Ok(buffer.into_inner())
}

/// Preview as a `data:` URI, suitable for embedding in saved result state.
pub fn generate_preview(path: &Path) -> Result<String, AppError> {
    let bytes = generate_preview_bytes(path)?;
    let b64 = base64::engine::general_purpose::STANDARD.encode(&bytes);
    Ok(format!("data:image/jpeg;base64,{}", b64))
}

/// `file://` reference to the image itself, for when no preview could be
/// decoded. Relative paths are resolved against the working directory.
pub fn file_uri(path: &Path) -> String {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    format!("file://{}", absolute.display())
}
