//! The chat widget, a conversation with a bounded number of user turns.

mod message;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::host::{EffectFuture, Perform};
use crate::reducer::{Generation, Reducer};
use crate::service_client::{Failure, ServiceClient};
pub use message::{ChatMessage, MessageId, Sender};

/// How many user messages a session accepts before it must be reset.
pub const DEFAULT_TURN_LIMIT: u32 = 5;

/// The bot message shown in place of a reply when the call fails.
pub const CHAT_APOLOGY: &str =
    "Sorry, I couldn't reach the server. Try again in a bit.";

/// The phase of a chat session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatPhase {
    /// Waiting for the user to send a message.
    #[default]
    Idle,
    /// A message was sent and the reply is outstanding.
    AwaitingReply,
    /// The last allowed turn has been answered, only a reset is accepted.
    LimitReached,
}

/// Events of the chat widget.
#[derive(Debug)]
pub enum ChatEvent {
    /// The text in the input box changed.
    InputChanged(String),
    /// The user pressed send.
    Submit,
    /// The call issued by a submit has resolved.
    ReplyReceived {
        /// The generation that issued the call.
        generation: Generation,
        /// The reply text or the failure.
        result: Result<String, Failure>,
    },
    /// The user asked for a fresh session.
    Reset,
}

/// Effects of the chat widget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatEffect {
    /// Sends one message to the service. No history is included.
    SendChat {
        /// The generation that issued the call.
        generation: Generation,
        /// The message text.
        message: String,
    },
}

/// State of the chat widget.
///
/// The number of user turns always equals the number of messages sent by
/// the user. Once the turn limit is reached and the last turn has been
/// answered, the session stays in [`ChatPhase::LimitReached`] until it is
/// reset.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatState {
    messages: Vec<ChatMessage>,
    input: String,
    user_turns: u32,
    turn_limit: u32,
    phase: ChatPhase,
    #[serde(skip)]
    generation: Generation,
    #[serde(skip)]
    next_id: u64,
}

impl ChatState {
    /// Creates an empty session with the default turn limit.
    #[inline]
    pub fn new() -> Self {
        Self::with_turn_limit(DEFAULT_TURN_LIMIT)
    }

    /// Creates an empty session that accepts `turn_limit` user messages.
    /// A limit of zero is treated as one.
    #[inline]
    pub fn with_turn_limit(turn_limit: u32) -> Self {
        Self {
            messages: vec![],
            input: String::new(),
            user_turns: 0,
            turn_limit: turn_limit.max(1),
            phase: ChatPhase::Idle,
            generation: Generation::default(),
            next_id: 0,
        }
    }

    /// Returns the messages, oldest first.
    #[inline]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Returns the newest message, which the view keeps scrolled into
    /// sight.
    #[inline]
    pub fn latest_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Returns the text in the input box.
    #[inline]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns how many messages the user has sent in this session.
    #[inline]
    pub fn user_turns(&self) -> u32 {
        self.user_turns
    }

    /// Returns how many messages the user may send in a session.
    #[inline]
    pub fn turn_limit(&self) -> u32 {
        self.turn_limit
    }

    /// Returns the current phase.
    #[inline]
    pub fn phase(&self) -> ChatPhase {
        self.phase
    }

    /// Returns the generation of the current session.
    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Returns `true` if the input box accepts typing.
    #[inline]
    pub fn input_enabled(&self) -> bool {
        self.phase != ChatPhase::LimitReached
    }

    /// Returns `true` if pressing send would send a message.
    #[inline]
    pub fn can_submit(&self) -> bool {
        self.phase == ChatPhase::Idle
            && self.user_turns < self.turn_limit
            && !self.input.trim().is_empty()
    }

    /// Returns `true` if the send control should be shown.
    #[inline]
    pub fn show_send(&self) -> bool {
        self.phase != ChatPhase::LimitReached
    }

    /// Returns `true` if the reset control should be shown.
    #[inline]
    pub fn show_reset(&self) -> bool {
        self.phase == ChatPhase::LimitReached
    }

    fn push_message(
        &mut self,
        text: String,
        sender: Sender,
        now: DateTime<Utc>,
    ) {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(ChatMessage::new(id, text, sender, now));
    }

    fn set_input(&mut self, input: String) {
        if !self.input_enabled() {
            trace!("input ignored, the turn limit is reached");
            return;
        }
        self.input = input;
    }

    fn submit(&mut self, now: DateTime<Utc>) -> Option<ChatEffect> {
        if !self.can_submit() {
            trace!("submit ignored in {:?}", self.phase);
            return None;
        }

        // The user message shows up before the call is issued.
        let message = self.input.trim().to_owned();
        self.input.clear();
        self.push_message(message.clone(), Sender::User, now);
        self.user_turns += 1;
        self.phase = ChatPhase::AwaitingReply;

        Some(ChatEffect::SendChat {
            generation: self.generation,
            message,
        })
    }

    fn receive_reply(
        &mut self,
        generation: Generation,
        result: Result<String, Failure>,
        now: DateTime<Utc>,
    ) {
        if generation != self.generation
            || self.phase != ChatPhase::AwaitingReply
        {
            debug!("discard a stale reply from {generation:?}");
            return;
        }

        let text = match result {
            Ok(text) => text,
            Err(err) => {
                debug!("reply failed: {err}");
                CHAT_APOLOGY.to_owned()
            }
        };
        self.push_message(text, Sender::Bot, now);

        self.phase = if self.user_turns >= self.turn_limit {
            ChatPhase::LimitReached
        } else {
            ChatPhase::Idle
        };
    }

    fn reset(&mut self) {
        self.messages.clear();
        self.input.clear();
        self.user_turns = 0;
        self.phase = ChatPhase::Idle;
        self.generation = self.generation.next();
    }
}

impl Default for ChatState {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for ChatState {
    type Event = ChatEvent;
    type Effect = ChatEffect;

    fn reduce(
        mut self,
        event: ChatEvent,
        now: DateTime<Utc>,
    ) -> (Self, Option<ChatEffect>) {
        let effect = match event {
            ChatEvent::InputChanged(input) => {
                self.set_input(input);
                None
            }
            ChatEvent::Submit => self.submit(now),
            ChatEvent::ReplyReceived { generation, result } => {
                self.receive_reply(generation, result, now);
                None
            }
            ChatEvent::Reset => {
                self.reset();
                None
            }
        };
        (self, effect)
    }
}

impl Perform for ChatState {
    fn perform(
        effect: ChatEffect,
        client: &ServiceClient,
    ) -> EffectFuture<ChatEvent> {
        let ChatEffect::SendChat {
            generation,
            message,
        } = effect;
        let client = client.clone();
        Box::pin(async move {
            let result = client.chat(message).await;
            ChatEvent::ReplyReceived { generation, result }
        })
    }
}
