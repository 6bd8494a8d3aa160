//! The caption widget: upload an image, get a caption, tweak it by hand.

use chrono::{DateTime, Utc};
use genbridge_service::ImagePayload;
use serde::{Serialize, Serializer};

use crate::host::{EffectFuture, Perform};
use crate::reducer::{Generation, Reducer};
use crate::service_client::{Failure, ServiceClient};

/// The text shown in place of a caption when captioning fails.
pub const CAPTION_FAILED: &str = "Couldn't generate a caption for this image.";

/// The caption of the current image.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum CaptionText {
    /// No caption yet.
    #[default]
    Empty,
    /// A caption, either generated or edited by hand.
    Text(String),
    /// Captioning the image failed.
    Failed,
}

impl CaptionText {
    /// Returns the text to display.
    #[inline]
    pub fn display_text(&self) -> &str {
        match self {
            CaptionText::Empty => "",
            CaptionText::Text(text) => text,
            CaptionText::Failed => CAPTION_FAILED,
        }
    }
}

/// Events of the caption widget.
#[derive(Debug)]
pub enum CaptionEvent {
    /// The user picked an image.
    ImageSelected(ImagePayload),
    /// The user asked for another caption of the same image.
    Regenerate,
    /// The captioning call has resolved.
    Completed {
        /// The generation that issued the call.
        generation: Generation,
        /// The caption or the failure.
        result: Result<String, Failure>,
    },
    /// The user started editing the caption.
    Edit,
    /// The text in the edit box changed.
    DraftChanged(String),
    /// The user saved the draft.
    Save,
    /// The user discarded the draft.
    Cancel,
    /// The user removed the image.
    Clear,
}

/// Effects of the caption widget.
#[derive(Clone, Debug, PartialEq)]
pub enum CaptionEffect {
    /// Uploads the image to the captioning endpoint.
    Caption {
        /// The generation that issued the call.
        generation: Generation,
        /// The image to caption.
        image: ImagePayload,
    },
}

/// State of the caption widget.
///
/// While editing, the draft is a scratch copy of the caption. Saving
/// replaces the caption with it, cancelling throws it away.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CaptionState {
    #[serde(serialize_with = "serialize_image")]
    image: Option<ImagePayload>,
    caption: CaptionText,
    draft: Option<String>,
    busy: bool,
    #[serde(skip)]
    generation: Generation,
}

impl CaptionState {
    /// Creates an empty caption widget.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current image, if any.
    #[inline]
    pub fn image(&self) -> Option<&ImagePayload> {
        self.image.as_ref()
    }

    /// Returns the current caption.
    #[inline]
    pub fn caption(&self) -> &CaptionText {
        &self.caption
    }

    /// Returns the draft while editing.
    #[inline]
    pub fn draft(&self) -> Option<&str> {
        self.draft.as_deref()
    }

    /// Returns `true` while the caption is being edited.
    #[inline]
    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    /// Returns `true` while a caption is outstanding.
    #[inline]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Returns the generation of the current image.
    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Returns `true` if the regenerate control is enabled.
    #[inline]
    pub fn can_regenerate(&self) -> bool {
        self.image.is_some() && !self.busy && !self.is_editing()
    }

    /// Returns `true` if the edit control is enabled.
    #[inline]
    pub fn can_edit(&self) -> bool {
        matches!(self.caption, CaptionText::Text(_))
            && !self.busy
            && !self.is_editing()
    }

    fn request_caption(&mut self) -> Option<CaptionEffect> {
        let image = self.image.clone()?;
        self.busy = true;
        Some(CaptionEffect::Caption {
            generation: self.generation,
            image,
        })
    }

    fn select_image(&mut self, image: ImagePayload) -> Option<CaptionEffect> {
        if self.busy {
            trace!("image ignored, a caption is outstanding");
            return None;
        }
        self.image = Some(image);
        self.caption = CaptionText::Empty;
        self.draft = None;
        self.request_caption()
    }

    fn regenerate(&mut self) -> Option<CaptionEffect> {
        if !self.can_regenerate() {
            trace!("regenerate ignored");
            return None;
        }
        self.request_caption()
    }

    fn complete(
        &mut self,
        generation: Generation,
        result: Result<String, Failure>,
    ) {
        if generation != self.generation || !self.busy {
            debug!("discard a stale caption from {generation:?}");
            return;
        }
        self.busy = false;
        self.caption = match result {
            Ok(caption) => CaptionText::Text(caption),
            Err(err) => {
                debug!("captioning failed: {err}");
                CaptionText::Failed
            }
        };
    }

    fn edit(&mut self) {
        if !self.can_edit() {
            trace!("edit ignored");
            return;
        }
        self.draft = Some(self.caption.display_text().to_owned());
    }

    fn save(&mut self) {
        if let Some(draft) = self.draft.take() {
            self.caption = CaptionText::Text(draft);
        }
    }

    fn clear(&mut self) {
        self.image = None;
        self.caption = CaptionText::Empty;
        self.draft = None;
        self.busy = false;
        self.generation = self.generation.next();
    }
}

impl Reducer for CaptionState {
    type Event = CaptionEvent;
    type Effect = CaptionEffect;

    fn reduce(
        mut self,
        event: CaptionEvent,
        _now: DateTime<Utc>,
    ) -> (Self, Option<CaptionEffect>) {
        let effect = match event {
            CaptionEvent::ImageSelected(image) => self.select_image(image),
            CaptionEvent::Regenerate => self.regenerate(),
            CaptionEvent::Completed { generation, result } => {
                self.complete(generation, result);
                None
            }
            CaptionEvent::Edit => {
                self.edit();
                None
            }
            CaptionEvent::DraftChanged(text) => {
                if let Some(draft) = &mut self.draft {
                    *draft = text;
                }
                None
            }
            CaptionEvent::Save => {
                self.save();
                None
            }
            CaptionEvent::Cancel => {
                self.draft = None;
                None
            }
            CaptionEvent::Clear => {
                self.clear();
                None
            }
        };
        (self, effect)
    }
}

impl Perform for CaptionState {
    fn perform(
        effect: CaptionEffect,
        client: &ServiceClient,
    ) -> EffectFuture<CaptionEvent> {
        let CaptionEffect::Caption { generation, image } = effect;
        let client = client.clone();
        Box::pin(async move {
            let result = client.caption(image).await;
            CaptionEvent::Completed { generation, result }
        })
    }
}

fn serialize_image<S: Serializer>(
    image: &Option<ImagePayload>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct Summary<'a> {
        file_name: &'a str,
        mime: &'a str,
        size: usize,
    }

    image
        .as_ref()
        .map(|image| Summary {
            file_name: image.file_name(),
            mime: image.mime().as_ref(),
            size: image.len(),
        })
        .serialize(serializer)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use genbridge_test_service::{PresetReply, TestService};
    use serde_json::json;
    use tokio::time::timeout;

    use super::*;
    use crate::host::Widget;
    use crate::testing::{at, failure};

    fn image(name: &str) -> ImagePayload {
        ImagePayload::new(name, mime::IMAGE_JPEG, vec![0xffu8, 0xd8, 0xff])
    }

    fn captioned(caption: &str) -> CaptionState {
        let (state, _) = CaptionState::new()
            .reduce(CaptionEvent::ImageSelected(image("lake.jpg")), at(0));
        let generation = state.generation();
        state
            .reduce(
                CaptionEvent::Completed {
                    generation,
                    result: Ok(caption.to_owned()),
                },
                at(1),
            )
            .0
    }

    #[test]
    fn test_upload_requests_caption() {
        let state = CaptionState::new();
        assert!(!state.can_regenerate());
        assert!(!state.can_edit());

        let (state, effect) = state
            .reduce(CaptionEvent::ImageSelected(image("lake.jpg")), at(0));
        assert_eq!(
            effect,
            Some(CaptionEffect::Caption {
                generation: state.generation(),
                image: image("lake.jpg"),
            })
        );
        assert!(state.is_busy());
        assert!(!state.can_regenerate());
        assert!(!state.can_edit());
    }

    #[test]
    fn test_caption_arrives() {
        let state = captioned("A lake with mountains");
        assert_eq!(
            state.caption(),
            &CaptionText::Text("A lake with mountains".to_owned())
        );
        assert!(!state.is_busy());
        assert!(state.can_regenerate());
        assert!(state.can_edit());
    }

    #[test]
    fn test_regenerate_reuses_image() {
        let (state, effect) =
            captioned("first").reduce(CaptionEvent::Regenerate, at(2));
        let Some(CaptionEffect::Caption { image: sent, .. }) = effect else {
            panic!("expected a caption effect");
        };
        assert_eq!(sent, image("lake.jpg"));
        // The old caption stays until the new one arrives.
        assert_eq!(state.caption().display_text(), "first");
        assert!(state.is_busy());
    }

    #[test]
    fn test_edit_and_save() {
        let (state, _) = captioned("a lake").reduce(CaptionEvent::Edit, at(2));
        assert!(state.is_editing());
        assert_eq!(state.draft(), Some("a lake"));
        assert!(!state.can_regenerate());

        let (state, _) = state.reduce(
            CaptionEvent::DraftChanged("a lake, lowkey fire".to_owned()),
            at(3),
        );
        let (state, _) = state.reduce(CaptionEvent::Save, at(4));
        assert!(!state.is_editing());
        assert_eq!(state.caption().display_text(), "a lake, lowkey fire");
    }

    #[test]
    fn test_save_commits_empty_draft() {
        let (state, _) = captioned("a lake").reduce(CaptionEvent::Edit, at(2));
        let (state, _) =
            state.reduce(CaptionEvent::DraftChanged(String::new()), at(3));
        let (state, _) = state.reduce(CaptionEvent::Save, at(4));
        assert_eq!(state.caption(), &CaptionText::Text(String::new()));
    }

    #[test]
    fn test_edit_and_cancel() {
        let (state, _) = captioned("a lake").reduce(CaptionEvent::Edit, at(2));
        let (state, _) =
            state.reduce(CaptionEvent::DraftChanged("nah".to_owned()), at(3));
        let (state, _) = state.reduce(CaptionEvent::Cancel, at(4));
        assert!(!state.is_editing());
        assert_eq!(state.caption().display_text(), "a lake");
    }

    #[test]
    fn test_draft_changes_need_edit_mode() {
        let state = captioned("a lake");
        let (next, _) = state
            .clone()
            .reduce(CaptionEvent::DraftChanged("x".to_owned()), at(2));
        assert_eq!(next, state);
        let (next, _) = state.clone().reduce(CaptionEvent::Save, at(2));
        assert_eq!(next, state);
    }

    #[test]
    fn test_failure_is_explicit() {
        let (state, _) = CaptionState::new()
            .reduce(CaptionEvent::ImageSelected(image("lake.jpg")), at(0));
        let generation = state.generation();
        let (state, _) = state.reduce(
            CaptionEvent::Completed {
                generation,
                result: Err(failure()),
            },
            at(1),
        );
        assert_eq!(state.caption(), &CaptionText::Failed);
        assert_eq!(state.caption().display_text(), CAPTION_FAILED);
        assert!(!state.is_busy());
        assert!(state.can_regenerate());
        assert!(!state.can_edit());
    }

    #[test]
    fn test_upload_while_busy_is_ignored() {
        let (state, _) = CaptionState::new()
            .reduce(CaptionEvent::ImageSelected(image("lake.jpg")), at(0));
        let (next, effect) = state
            .clone()
            .reduce(CaptionEvent::ImageSelected(image("cat.jpg")), at(1));
        assert!(effect.is_none());
        assert_eq!(next, state);
    }

    #[test]
    fn test_new_upload_leaves_edit_mode() {
        let (state, _) = captioned("a lake").reduce(CaptionEvent::Edit, at(2));
        let (state, effect) = state
            .reduce(CaptionEvent::ImageSelected(image("cat.jpg")), at(3));
        assert!(effect.is_some());
        assert!(!state.is_editing());
        assert_eq!(state.caption(), &CaptionText::Empty);
        assert_eq!(state.image().unwrap().file_name(), "cat.jpg");
    }

    #[test]
    fn test_clear_discards_late_caption() {
        let (state, _) = CaptionState::new()
            .reduce(CaptionEvent::ImageSelected(image("lake.jpg")), at(0));
        let generation = state.generation();
        let (state, _) = state.reduce(CaptionEvent::Clear, at(1));
        let (state, _) = state.reduce(
            CaptionEvent::Completed {
                generation,
                result: Ok("late".to_owned()),
            },
            at(2),
        );
        assert_eq!(state, CaptionState {
            generation: generation.next(),
            ..CaptionState::new()
        });
    }

    #[test]
    fn test_serialize_summary() {
        let value = serde_json::to_value(captioned("a lake")).unwrap();
        assert_eq!(
            value,
            json!({
                "image": {
                    "file_name": "lake.jpg",
                    "mime": "image/jpeg",
                    "size": 3,
                },
                "caption": { "status": "text", "text": "a lake" },
                "draft": null,
                "busy": false,
            })
        );
    }

    #[tokio::test]
    async fn test_widget_upload() {
        let service = TestService::default();
        service.add_caption_reply(PresetReply::text("a lake at dawn"));
        service.add_caption_reply(PresetReply::Status(500));

        let client = ServiceClient::new(service.clone());
        let widget = Widget::spawn(CaptionState::new(), client, "caption");
        widget
            .dispatch(CaptionEvent::ImageSelected(image("lake.jpg")))
            .unwrap();
        let state = timeout(
            Duration::from_millis(500),
            widget.wait_for(|s| s.caption() != &CaptionText::Empty),
        )
        .await
        .unwrap();
        assert_eq!(state.caption().display_text(), "a lake at dawn");

        widget.dispatch(CaptionEvent::Regenerate).unwrap();
        let state = timeout(
            Duration::from_millis(500),
            widget.wait_for(|s| s.caption() == &CaptionText::Failed),
        )
        .await
        .unwrap();
        assert!(!state.is_busy());
        assert_eq!(service.caption_requests().len(), 2);
    }
}
