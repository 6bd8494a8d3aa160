use serde::{Deserialize, Serialize};

/// A reply to a [`ChatRequest`](crate::ChatRequest).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatReply {
    /// The generated text.
    pub response: String,
}

/// A reply to a [`CaptionRequest`](crate::CaptionRequest).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaptionReply {
    /// The generated caption.
    ///
    /// Older deployments of the service named this field `description`,
    /// both names are accepted when deserializing.
    #[serde(alias = "description")]
    pub caption: String,
}
