//! A local fake service for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use genbridge_service::{
    CaptionReply, CaptionRequest, ChatReply, ChatRequest, ErrorKind, Service,
    ServiceError,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    #[allow(dead_code)]
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

impl StdError for Error {}

impl ServiceError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Default)]
struct Script {
    chat_replies: VecDeque<PresetReply>,
    caption_replies: VecDeque<PresetReply>,
    chat_requests: Vec<ChatRequest>,
    caption_requests: Vec<CaptionRequest>,
}

/// A local fake service for testing purpose.
///
/// Before sending requests, you need to set up the script, which is how
/// the service should reply to each call. Chat and caption calls consume
/// their own queue of presets in order. If a queue runs dry, the call
/// fails with a transport error.
///
/// Clones share the same script, so a test can keep one clone around to
/// push more presets or inspect the received requests after handing the
/// other one to the code under test.
///
/// # Note
///
/// This type is not optimized for production use, every request is
/// recorded and kept in memory. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestService {
    script: Arc<Mutex<Script>>,
    delay: Option<Duration>,
}

impl TestService {
    #[inline]
    pub fn add_chat_reply(&self, reply: PresetReply) {
        self.script().chat_replies.push_back(reply);
    }

    #[inline]
    pub fn add_caption_reply(&self, reply: PresetReply) {
        self.script().caption_replies.push_back(reply);
    }

    /// Delays every reply by `duration`, which is useful for observing
    /// the in-flight state of a widget.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns the chat requests received so far.
    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        self.script().chat_requests.clone()
    }

    /// Returns the caption requests received so far.
    pub fn caption_requests(&self) -> Vec<CaptionRequest> {
        self.script().caption_requests.clone()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        // A test that panicked while holding the lock has already failed.
        self.script.lock().unwrap_or_else(|err| err.into_inner())
    }
}

fn resolve(preset: Option<PresetReply>) -> Result<String, Error> {
    match preset {
        Some(PresetReply::Text(text)) => Ok(text),
        Some(PresetReply::Status(code)) => Err(Error {
            message: "preset status",
            kind: ErrorKind::Status(code),
        }),
        Some(PresetReply::Unreachable) => Err(Error {
            message: "preset unreachable",
            kind: ErrorKind::Transport,
        }),
        None => Err(Error {
            message: "not enough presets",
            kind: ErrorKind::Transport,
        }),
    }
}

impl Service for TestService {
    type Error = crate::Error;

    fn chat(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatReply, Self::Error>> + Send + 'static
    {
        let preset = {
            let mut script = self.script();
            script.chat_requests.push(req.clone());
            script.chat_replies.pop_front()
        };
        let delay = self.delay;
        async move {
            if let Some(delay) = delay {
                sleep(delay).await;
            }
            resolve(preset).map(|response| ChatReply { response })
        }
    }

    fn caption(
        &self,
        req: &CaptionRequest,
    ) -> impl Future<Output = Result<CaptionReply, Self::Error>> + Send + 'static
    {
        let preset = {
            let mut script = self.script();
            script.caption_requests.push(req.clone());
            script.caption_replies.pop_front()
        };
        let delay = self.delay;
        async move {
            if let Some(delay) = delay {
                sleep(delay).await;
            }
            resolve(preset).map(|caption| CaptionReply { caption })
        }
    }
}
