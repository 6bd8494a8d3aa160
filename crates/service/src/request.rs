use serde::{Deserialize, Serialize};

use crate::ImagePayload;

/// A chat request to be sent to the service.
///
/// The service is stateless: each request carries exactly one message,
/// and no prior conversation history.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The message text.
    pub message: String,
}

impl ChatRequest {
    /// Creates a new `ChatRequest`.
    #[inline]
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A request for captioning an image.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptionRequest {
    /// The image to describe.
    pub image: ImagePayload,
}
