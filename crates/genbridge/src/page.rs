use chrono::Utc;
use genbridge_core::caption::CaptionState;
use genbridge_core::chat::{ChatState, DEFAULT_TURN_LIMIT};
use genbridge_core::nav::{
    NavEffect, NavEvent, NavState, Section, SectionObserver,
};
use genbridge_core::translator::TranslatorState;
use genbridge_core::{Reducer, ServiceClient, Widget};
use genbridge_service::Service;
use serde::Serialize;

/// A page builder.
///
/// See [`Page`].
pub struct PageBuilder {
    client: ServiceClient,
    turn_limit: u32,
    hash: String,
}

impl PageBuilder {
    /// Creates a page builder with a specified service.
    pub fn with_service<S: Service + 'static>(service: S) -> Self {
        Self {
            client: ServiceClient::new(service),
            turn_limit: DEFAULT_TURN_LIMIT,
            hash: String::new(),
        }
    }

    /// Sets how many user messages the chat accepts before a reset.
    #[inline]
    pub fn with_turn_limit(mut self, turn_limit: u32) -> Self {
        self.turn_limit = turn_limit;
        self
    }

    /// Sets the URL fragment the page is opened with.
    #[inline]
    pub fn with_hash<S: Into<String>>(mut self, hash: S) -> Self {
        self.hash = hash.into();
        self
    }

    /// Builds the page and starts its widgets. Must be called from within
    /// a tokio runtime.
    pub fn build(self) -> Page {
        let chat = Widget::spawn(
            ChatState::with_turn_limit(self.turn_limit),
            self.client.clone(),
            "chat",
        );
        let translator = Widget::spawn(
            TranslatorState::new(),
            self.client.clone(),
            "translator",
        );
        let caption =
            Widget::spawn(CaptionState::new(), self.client, "caption");
        let nav = NavState::from_hash(&self.hash);
        debug!("page opened at {}", nav.active());

        Page {
            chat,
            translator,
            caption,
            nav,
        }
    }
}

/// The whole page: a navigation bar on top of independent widgets.
///
/// Widgets share nothing but the service client, so that one of them being
/// busy never blocks another.
pub struct Page {
    chat: Widget<ChatState>,
    translator: Widget<TranslatorState>,
    caption: Widget<CaptionState>,
    nav: NavState,
}

/// A serializable copy of every widget's state.
#[derive(Clone, Debug, Serialize)]
pub struct PageSnapshot {
    /// The navigation bar.
    pub nav: NavState,
    /// The chat widget.
    pub chat: ChatState,
    /// The translator widget.
    pub translator: TranslatorState,
    /// The caption widget.
    pub caption: CaptionState,
}

impl Page {
    /// Returns the sections in page order.
    #[inline]
    pub fn sections(&self) -> &'static [Section] {
        &Section::ALL
    }

    /// Returns the chat widget.
    #[inline]
    pub fn chat(&self) -> &Widget<ChatState> {
        &self.chat
    }

    /// Returns the translator widget.
    #[inline]
    pub fn translator(&self) -> &Widget<TranslatorState> {
        &self.translator
    }

    /// Returns the caption widget.
    #[inline]
    pub fn caption(&self) -> &Widget<CaptionState> {
        &self.caption
    }

    /// Returns the navigation state.
    #[inline]
    pub fn nav(&self) -> &NavState {
        &self.nav
    }

    /// Applies a navigation event, returning what the view should do.
    pub fn navigate(&mut self, event: NavEvent) -> Option<NavEffect> {
        let (nav, effect) =
            std::mem::take(&mut self.nav).reduce(event, Utc::now());
        self.nav = nav;
        effect
    }

    /// Updates the active section from `observer`.
    pub fn observe<O: SectionObserver + ?Sized>(
        &mut self,
        observer: &O,
    ) -> Option<NavEffect> {
        let (nav, effect) = std::mem::take(&mut self.nav).sync_with(observer);
        self.nav = nav;
        effect
    }

    /// Returns the latest state of everything on the page.
    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            nav: self.nav.clone(),
            chat: self.chat.snapshot(),
            translator: self.translator.snapshot(),
            caption: self.caption.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use genbridge_core::caption::{CaptionEvent, CaptionText};
    use genbridge_core::chat::{ChatEvent, ChatPhase};
    use genbridge_core::nav::{HashObserver, SCROLL_OFFSET};
    use genbridge_core::translator::TranslatorEvent;
    use genbridge_service::ImagePayload;
    use genbridge_test_service::{PresetReply, TestService};
    use tokio::time::timeout;

    use super::*;

    #[tokio::test]
    async fn test_widgets_are_independent() {
        let mut service = TestService::default();
        service.set_delay(Duration::from_millis(50));
        service.add_chat_reply(PresetReply::text("bet"));
        service.add_caption_reply(PresetReply::text("a cat"));
        let page = PageBuilder::with_service(service).build();

        let image = ImagePayload::new("cat.png", mime::IMAGE_PNG, vec![0u8]);
        page.caption()
            .dispatch(CaptionEvent::ImageSelected(image))
            .unwrap();
        page.translator()
            .dispatch(TranslatorEvent::InputChanged("hi".to_owned()))
            .unwrap();
        page.chat()
            .dispatch(ChatEvent::InputChanged("hello".to_owned()))
            .unwrap();
        page.chat().dispatch(ChatEvent::Submit).unwrap();

        // The translator stays editable while the others are busy.
        let translator = page.translator().settled().await.unwrap();
        assert_eq!(translator.input(), "hi");
        assert!(translator.input_enabled());

        let chat = timeout(
            Duration::from_secs(1),
            page.chat().wait_for(|s| s.messages().len() == 2),
        )
        .await
        .unwrap();
        assert_eq!(chat.phase(), ChatPhase::Idle);

        let captioned = |s: &CaptionState| s.caption() != &CaptionText::Empty;
        let caption = page.caption().wait_for(captioned);
        let caption = timeout(Duration::from_secs(1), caption).await.unwrap();
        assert_eq!(caption.caption(), &CaptionText::Text("a cat".to_owned()));
    }

    #[tokio::test]
    async fn test_turn_limit() {
        let page = PageBuilder::with_service(TestService::default())
            .with_turn_limit(2)
            .build();
        assert_eq!(page.chat().snapshot().turn_limit(), 2);
    }

    #[tokio::test]
    async fn test_navigation() {
        let mut page = PageBuilder::with_service(TestService::default())
            .with_hash("#translator")
            .build();
        assert_eq!(page.sections().len(), 4);
        assert_eq!(page.nav().active(), Section::Translator);

        let effect = page.navigate(NavEvent::LinkClicked(Section::Caption));
        assert_eq!(
            effect,
            Some(NavEffect::ScrollTo {
                section: Section::Caption,
                offset: SCROLL_OFFSET,
            })
        );
        assert_eq!(page.nav().active(), Section::Caption);

        let effect = page.observe(&HashObserver::new("#chat"));
        assert_eq!(effect, Some(NavEffect::ReplaceHash("#chat".to_owned())));
        assert_eq!(page.snapshot().nav.active(), Section::Chat);
    }

    #[tokio::test]
    async fn test_snapshot_serializes() {
        let page = PageBuilder::with_service(TestService::default()).build();
        let value = serde_json::to_value(page.snapshot()).unwrap();
        assert_eq!(value["nav"]["active"], "about");
        assert_eq!(value["chat"]["phase"], "idle");
        assert_eq!(value["translator"]["output"]["status"], "empty");
        assert_eq!(value["caption"]["image"], serde_json::Value::Null);
    }
}
