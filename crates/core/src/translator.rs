//! The translator widget, which rewrites text as Gen Z slang.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::host::{EffectFuture, Perform};
use crate::reducer::{Generation, Reducer};
use crate::service_client::{Failure, ServiceClient};

/// The instruction placed in front of the text to translate.
pub const TRANSLATION_INSTRUCTION: &str = "Rewrite the following text as \
    Gen Z slang. Output only the rewritten text, nothing else.";

/// The text shown in the output field when a translation fails.
pub const TRANSLATION_FAILED: &str = "Translation failed. Please try again.";

/// Builds the message sent to the service for translating `input`.
#[inline]
pub fn translation_prompt(input: &str) -> String {
    format!("{TRANSLATION_INSTRUCTION}\n\n{input}")
}

/// What the output field shows.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum TranslationOutput {
    /// Nothing has been translated yet.
    #[default]
    Empty,
    /// The text returned by the service, verbatim.
    Text(String),
    /// The last translation failed.
    Failed,
}

impl TranslationOutput {
    /// Returns the text to display in the output field.
    #[inline]
    pub fn display_text(&self) -> &str {
        match self {
            TranslationOutput::Empty => "",
            TranslationOutput::Text(text) => text,
            TranslationOutput::Failed => TRANSLATION_FAILED,
        }
    }
}

/// Events of the translator widget.
#[derive(Debug)]
pub enum TranslatorEvent {
    /// The text in the input field changed.
    InputChanged(String),
    /// The user asked for a translation.
    Submit,
    /// The call issued by a submit has resolved.
    Completed {
        /// The generation that issued the call.
        generation: Generation,
        /// The translated text or the failure.
        result: Result<String, Failure>,
    },
    /// The user cleared both fields.
    Clear,
}

/// Effects of the translator widget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TranslatorEffect {
    /// Sends the wrapped text to the chat endpoint.
    Translate {
        /// The generation that issued the call.
        generation: Generation,
        /// The instruction followed by the text to translate.
        message: String,
    },
}

/// State of the translator widget.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TranslatorState {
    input: String,
    output: TranslationOutput,
    busy: bool,
    #[serde(skip)]
    generation: Generation,
}

impl TranslatorState {
    /// Creates an empty translator.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the text in the input field.
    #[inline]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns the output.
    #[inline]
    pub fn output(&self) -> &TranslationOutput {
        &self.output
    }

    /// Returns `true` while a translation is outstanding.
    #[inline]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Returns the generation of the current contents.
    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Returns `true` if the input field accepts typing.
    #[inline]
    pub fn input_enabled(&self) -> bool {
        !self.busy
    }

    /// Returns `true` if submitting would issue a translation.
    #[inline]
    pub fn can_submit(&self) -> bool {
        !self.busy && !self.input.trim().is_empty()
    }

    fn submit(&mut self) -> Option<TranslatorEffect> {
        if !self.can_submit() {
            trace!("submit ignored");
            return None;
        }
        self.busy = true;
        Some(TranslatorEffect::Translate {
            generation: self.generation,
            message: translation_prompt(self.input.trim()),
        })
    }

    fn complete(
        &mut self,
        generation: Generation,
        result: Result<String, Failure>,
    ) {
        if generation != self.generation || !self.busy {
            debug!("discard a stale translation from {generation:?}");
            return;
        }
        self.busy = false;
        self.output = match result {
            Ok(text) => TranslationOutput::Text(text),
            Err(err) => {
                debug!("translation failed: {err}");
                TranslationOutput::Failed
            }
        };
    }

    fn clear(&mut self) {
        self.input.clear();
        self.output = TranslationOutput::Empty;
        self.busy = false;
        self.generation = self.generation.next();
    }
}

impl Reducer for TranslatorState {
    type Event = TranslatorEvent;
    type Effect = TranslatorEffect;

    fn reduce(
        mut self,
        event: TranslatorEvent,
        _now: DateTime<Utc>,
    ) -> (Self, Option<TranslatorEffect>) {
        let effect = match event {
            TranslatorEvent::InputChanged(input) => {
                if self.input_enabled() {
                    self.input = input;
                }
                None
            }
            TranslatorEvent::Submit => self.submit(),
            TranslatorEvent::Completed { generation, result } => {
                self.complete(generation, result);
                None
            }
            TranslatorEvent::Clear => {
                self.clear();
                None
            }
        };
        (self, effect)
    }
}

impl Perform for TranslatorState {
    fn perform(
        effect: TranslatorEffect,
        client: &ServiceClient,
    ) -> EffectFuture<TranslatorEvent> {
        let TranslatorEffect::Translate {
            generation,
            message,
        } = effect;
        let client = client.clone();
        Box::pin(async move {
            let result = client.chat(message).await;
            TranslatorEvent::Completed { generation, result }
        })
    }
}
