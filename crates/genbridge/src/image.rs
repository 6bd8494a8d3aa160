use std::error::Error;
use std::fmt::{self, Display};
use std::io;
use std::path::Path;

use genbridge_service::ImagePayload;
use mime::Mime;

/// An error returned when an image file can't be picked.
#[derive(Debug)]
pub enum LoadImageError {
    /// The file has no extension of a supported image type.
    Unsupported(String),
    /// The file couldn't be read.
    Io(io::Error),
}

impl Display for LoadImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadImageError::Unsupported(name) => {
                write!(f, "{name} is not a PNG, JPEG, GIF or WebP image")
            }
            LoadImageError::Io(err) => write!(f, "failed to read image: {err}"),
        }
    }
}

impl Error for LoadImageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LoadImageError::Io(err) => Some(err),
            LoadImageError::Unsupported(_) => None,
        }
    }
}

impl From<io::Error> for LoadImageError {
    fn from(err: io::Error) -> Self {
        LoadImageError::Io(err)
    }
}

/// Guesses the image type from the file extension.
pub fn image_mime(path: &Path) -> Option<Mime> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some(mime::IMAGE_PNG),
        "jpg" | "jpeg" => Some(mime::IMAGE_JPEG),
        "gif" => Some(mime::IMAGE_GIF),
        "webp" => "image/webp".parse().ok(),
        _ => None,
    }
}

/// Reads an image file into memory.
pub async fn load_image(
    path: impl AsRef<Path>,
) -> Result<ImagePayload, LoadImageError> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_owned());
    let Some(mime) = image_mime(path) else {
        return Err(LoadImageError::Unsupported(file_name));
    };

    let bytes = tokio::fs::read(path).await?;
    debug!("loaded {file_name} ({} bytes)", bytes.len());
    Ok(ImagePayload::new(file_name, mime, bytes))
}
