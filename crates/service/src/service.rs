use std::error::Error;

use crate::error::ErrorKind;
use crate::request::{CaptionRequest, ChatRequest};
use crate::response::{CaptionReply, ChatReply};

/// The error type for a service.
pub trait ServiceError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// A type that represents the remote service, which is an entry for
/// chatting and captioning images.
///
/// Once the service is created, it should behave like a stateless object.
/// It can still have internal state, but callers should not rely on it,
/// and the service should be prepared for being dropped anytime.
pub trait Service: Send + Sync {
    /// The error type that may be returned by the service.
    type Error: ServiceError;

    /// Sends a chat message and waits for the reply.
    fn chat(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatReply, Self::Error>> + Send + 'static;

    /// Uploads an image and waits for its caption.
    fn caption(
        &self,
        req: &CaptionRequest,
    ) -> impl Future<Output = Result<CaptionReply, Self::Error>> + Send + 'static;
}
