use serde::{Deserialize, Serialize};

/// A preset reply that the test service returns for one call.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetReply {
    /// A successful reply with the given text.
    #[serde(rename = "text")]
    Text(String),
    /// The service answers with a non-success status code.
    #[serde(rename = "status")]
    Status(u16),
    /// The service cannot be reached at all.
    #[serde(rename = "unreachable")]
    Unreachable,
}

impl PresetReply {
    /// Creates a successful `PresetReply`.
    #[inline]
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self::Text(text.into())
    }
}
