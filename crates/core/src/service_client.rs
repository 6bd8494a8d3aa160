use std::pin::Pin;
use std::sync::Arc;

use genbridge_service::{
    CaptionRequest, ChatRequest, ImagePayload, Service, ServiceError,
};
use tracing::Instrument;

/// A failed call to the service, with the concrete error type erased.
pub type Failure = Box<dyn ServiceError>;

type CallResult = Result<String, Failure>;
type BoxedCallFuture = Pin<Box<dyn Future<Output = CallResult> + Send>>;

trait ServiceObject: Send + Sync + 'static {
    fn chat(&self, req: ChatRequest) -> BoxedCallFuture;

    fn caption(&self, req: CaptionRequest) -> BoxedCallFuture;
}

struct AnyService<S: Service>(S);

impl<S: Service + 'static> ServiceObject for AnyService<S> {
    fn chat(&self, req: ChatRequest) -> BoxedCallFuture {
        let fut = self.0.chat(&req);
        Box::pin(async move {
            trace!("sending chat message: {:?}", req.message);
            match fut.await {
                Ok(reply) => Ok(reply.response),
                Err(err) => {
                    warn!("chat call failed: {err}");
                    Err(Box::new(err) as Failure)
                }
            }
        })
    }

    fn caption(&self, req: CaptionRequest) -> BoxedCallFuture {
        let fut = self.0.caption(&req);
        Box::pin(async move {
            trace!("sending image: {}", req.image.file_name());
            match fut.await {
                Ok(reply) => Ok(reply.caption),
                Err(err) => {
                    warn!("caption call failed: {err}");
                    Err(Box::new(err) as Failure)
                }
            }
        })
    }
}

/// A wrapper around a service that provides a type-erased interface for
/// the widgets.
///
/// Widgets only need the text of a reply, so the client unwraps the reply
/// types and boxes the errors.
#[derive(Clone)]
pub struct ServiceClient {
    service: Arc<dyn ServiceObject>,
}

impl ServiceClient {
    /// Creates a new client for `service`.
    #[inline]
    pub fn new<S: Service + 'static>(service: S) -> Self {
        Self {
            service: Arc::new(AnyService(service)),
        }
    }

    /// Sends a single chat message and returns the reply text.
    #[inline]
    pub async fn chat(&self, message: String) -> Result<String, Failure> {
        self.service
            .chat(ChatRequest { message })
            .instrument(trace_span!("service client chat"))
            .await
    }

    /// Uploads an image and returns its caption.
    #[inline]
    pub async fn caption(
        &self,
        image: ImagePayload,
    ) -> Result<String, Failure> {
        self.service
            .caption(CaptionRequest { image })
            .instrument(trace_span!("service client caption"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use genbridge_service::ErrorKind;
    use genbridge_test_service::{PresetReply, TestService};

    use super::*;

    #[tokio::test]
    async fn test_chat() {
        let service = TestService::default();
        service.add_chat_reply(PresetReply::text("bet"));
        let client = ServiceClient::new(service.clone());

        let reply = client.chat("hello".to_owned()).await.unwrap();
        assert_eq!(reply, "bet");
        assert_eq!(service.chat_requests(), [ChatRequest::new("hello")]);
    }

    #[tokio::test]
    async fn test_error_handling() {
        let service = TestService::default();
        service.add_caption_reply(PresetReply::Status(502));
        let client = ServiceClient::new(service);

        let image = ImagePayload::new("a.gif", mime::IMAGE_GIF, vec![1u8]);
        let err = client.caption(image).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Status(502));
    }
}
