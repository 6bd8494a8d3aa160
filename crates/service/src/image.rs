use bytes::Bytes;
use mime::Mime;

/// An image picked from local storage, kept in memory for captioning.
///
/// The payload is cheap to clone, since the bytes are reference counted.
/// Widgets keep it around so that a caption can be regenerated without
/// uploading again.
#[derive(Clone, Debug, PartialEq)]
pub struct ImagePayload {
    file_name: String,
    mime: Mime,
    bytes: Bytes,
}

impl ImagePayload {
    /// Creates a new `ImagePayload`.
    #[inline]
    pub fn new<S: Into<String>, B: Into<Bytes>>(
        file_name: S,
        mime: Mime,
        bytes: B,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime,
            bytes: bytes.into(),
        }
    }

    /// Returns the original file name.
    #[inline]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the MIME type of the image.
    #[inline]
    pub fn mime(&self) -> &Mime {
        &self.mime
    }

    /// Returns the raw image bytes.
    #[inline]
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Returns the size of the image in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the image has no data.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
