use std::time::Duration;

/// The address the service listens on in a local setup.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
/// The path of the chat endpoint, which also serves translations.
pub const DEFAULT_CHAT_PATH: &str = "/chat/";
/// The path of the captioning endpoint.
pub const DEFAULT_CAPTION_PATH: &str = "/caption-image/";

/// Builder for [`ServiceConfig`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ServiceConfigBuilder {
    base_url: String,
    chat_path: Option<String>,
    caption_path: Option<String>,
    timeout: Option<Duration>,
}

impl ServiceConfigBuilder {
    /// Creates a builder with the given base URL.
    #[inline]
    pub fn with_base_url<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            chat_path: None,
            caption_path: None,
            timeout: None,
        }
    }

    /// Sets a custom path for the chat endpoint.
    #[inline]
    pub fn with_chat_path<S: Into<String>>(mut self, path: S) -> Self {
        self.chat_path = Some(path.into());
        self
    }

    /// Sets a custom path for the captioning endpoint.
    #[inline]
    pub fn with_caption_path<S: Into<String>>(mut self, path: S) -> Self {
        self.caption_path = Some(path.into());
        self
    }

    /// Sets a timeout for every request. Requests wait forever if unset.
    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> ServiceConfig {
        let base_url = self.base_url.trim_end_matches('/').to_owned();
        ServiceConfig {
            chat_url: join_url(
                &base_url,
                self.chat_path.as_deref().unwrap_or(DEFAULT_CHAT_PATH),
            ),
            caption_url: join_url(
                &base_url,
                self.caption_path.as_deref().unwrap_or(DEFAULT_CAPTION_PATH),
            ),
            timeout: self.timeout,
        }
    }
}

impl Default for ServiceConfigBuilder {
    #[inline]
    fn default() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }
}

/// Configuration for the HTTP service.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ServiceConfig {
    pub(crate) chat_url: String,
    pub(crate) caption_url: String,
    pub(crate) timeout: Option<Duration>,
}

impl ServiceConfig {
    /// Returns the full URL of the chat endpoint.
    #[inline]
    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    /// Returns the full URL of the captioning endpoint.
    #[inline]
    pub fn caption_url(&self) -> &str {
        &self.caption_url
    }
}

#[inline]
fn join_url(base_url: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{base_url}{path}")
    } else {
        format!("{base_url}/{path}")
    }
}
