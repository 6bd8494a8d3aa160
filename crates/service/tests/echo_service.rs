use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::future::ready;

use genbridge_service::{
    CaptionReply, CaptionRequest, ChatReply, ChatRequest, ErrorKind,
    ImagePayload, Service, ServiceError,
};

#[derive(Debug)]
struct EchoServiceError(ErrorKind);

impl Display for EchoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Error for EchoServiceError {}

impl ServiceError for EchoServiceError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

struct EchoService;

impl Service for EchoService {
    type Error = EchoServiceError;

    fn chat(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatReply, Self::Error>> + Send + 'static
    {
        let result = if req.message.is_empty() {
            Err(EchoServiceError(ErrorKind::Status(422)))
        } else {
            Ok(ChatReply {
                response: format!("You said {}", req.message),
            })
        };
        ready(result)
    }

    fn caption(
        &self,
        req: &CaptionRequest,
    ) -> impl Future<Output = Result<CaptionReply, Self::Error>> + Send + 'static
    {
        let result = if req.image.is_empty() {
            Err(EchoServiceError(ErrorKind::InvalidResponse))
        } else {
            Ok(CaptionReply {
                caption: format!(
                    "{} ({} bytes)",
                    req.image.file_name(),
                    req.image.len()
                ),
            })
        };
        ready(result)
    }
}

mod tests {
    use super::*;

    #[tokio::test]
    async fn test_chat() {
        let service = EchoService;
        let reply = service.chat(&ChatRequest::new("hello")).await.unwrap();
        assert_eq!(reply.response, "You said hello");
    }

    #[tokio::test]
    async fn test_chat_error() {
        let service = EchoService;
        let err = service.chat(&ChatRequest::new("")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Status(422));
        assert_eq!(err.kind().to_string(), "Status 422");
    }

    #[tokio::test]
    async fn test_caption() {
        let service = EchoService;
        let image = ImagePayload::new("cat.jpg", mime::IMAGE_JPEG, vec![0u8; 4]);
        let reply = service.caption(&CaptionRequest { image }).await.unwrap();
        assert_eq!(reply.caption, "cat.jpg (4 bytes)");

        let empty = Vec::<u8>::new();
        let empty = ImagePayload::new("empty.jpg", mime::IMAGE_JPEG, empty);
        let err = service
            .caption(&CaptionRequest { image: empty })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidResponse);
    }
}
